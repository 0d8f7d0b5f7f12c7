pub mod eye;
pub mod grid;
