pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::SceneConfig;
pub use api::types::{CellId, Phase, Viewport};
pub use components::eye::{EyeCell, LidState, MotionRange};
pub use components::grid::{Grid, Pair};
pub use core::scene::EyeScene;
pub use core::time::{Countdown, SceneClock};
pub use input::focal::{FocalTracker, TiltPermission};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::{EyeRect, HeadlessSurface, Surface, SurfaceError};
pub use systems::blink::{BlinkAnimator, BlinkScheduler, CancelToken};
pub use systems::glyphs::CellCode;
pub use systems::grid_build::{BuildProgress, GridBuilder};
pub use systems::mask::{build_line_mask, build_phrase_mask, LineMask, Mask, PhraseMask};
pub use systems::reveal::RevealSchedule;
pub use systems::rng::Rng;
pub use systems::sizer::{auto_size_eyes, GridFit};

pub use extensions::{Easing, lerp, lerp_vec2, ease};
