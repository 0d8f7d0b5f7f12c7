//! Surface trait: the seam between the headless scene and whatever draws it.
//!
//! The browser implementation lives in `eyegrid-web` and writes DOM classes and
//! styles; `HeadlessSurface` keeps the same state in memory for tests.

use std::fmt::{self, Display};
use glam::Vec2;
use crate::api::types::CellId;
use crate::components::eye::{EyeCell, MotionRange};
use crate::extensions::easing::Easing;
use crate::systems::sizer::GridFit;

/// Failure reported by a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// A node for this cell does not exist on the surface.
    MissingCell(CellId),
    /// The host refused an operation (DOM exception, detached node, ...).
    Host(String),
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::MissingCell(id) => write!(f, "no surface node for cell {}", id.0),
            SurfaceError::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Rendered geometry of one eye, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeRect {
    /// Top-left corner of the eye box.
    pub origin: Vec2,
    /// Eye box size.
    pub size: Vec2,
    /// Pupil box size.
    pub pupil: Vec2,
}

impl EyeRect {
    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    pub fn motion_range(&self) -> MotionRange {
        MotionRange::from_sizes(self.size, self.pupil)
    }
}

/// Everything the scene needs from a rendering host.
pub trait Surface {
    /// Backend identifier (e.g., "dom", "headless").
    fn backend(&self) -> &'static str;

    /// Remove every eye node.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Publish layout parameters (cell size, columns, side margin).
    fn set_layout(&mut self, fit: &GridFit) -> Result<(), SurfaceError>;

    /// Append nodes for a batch of freshly allocated cells, in order.
    fn create_cells(&mut self, cells: &[EyeCell]) -> Result<(), SurfaceError>;

    /// Measure a rendered eye. Only valid once layout has been applied.
    fn measure(&self, id: CellId) -> Result<EyeRect, SurfaceError>;

    fn set_highlighted(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError>;

    fn set_revealed(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError>;

    /// Move a pupil to `offset` pixels from its eye center.
    fn set_pupil(&mut self, id: CellId, offset: Vec2) -> Result<(), SurfaceError>;

    /// Animate a lid to `coverage` (0.0 open, 1.0 closed).
    fn set_lid(&mut self, id: CellId, coverage: f32, duration_ms: f64, easing: Easing) -> Result<(), SurfaceError>;

    /// Dismiss the loading overlay. Must be idempotent.
    fn hide_loader(&mut self);

    /// Bring the loading overlay back for a rebuild. Must be idempotent.
    fn show_loader(&mut self);
}
