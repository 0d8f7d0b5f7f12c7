pub mod headless;
pub mod traits;

pub use headless::{HeadlessCell, HeadlessSurface};
pub use traits::{EyeRect, Surface, SurfaceError};
