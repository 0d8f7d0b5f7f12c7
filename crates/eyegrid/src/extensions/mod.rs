// extensions/mod.rs
//
// Small math helpers shared by the systems. No dependency on the grid.

pub mod easing;

pub use easing::{Easing, lerp, lerp_vec2, ease};
