pub mod blink;
pub mod glyphs;
pub mod grid_build;
pub mod mask;
pub mod projector;
pub mod pupil;
pub mod reveal;
pub mod rng;
pub mod sizer;
