pub mod focal;
pub mod queue;
