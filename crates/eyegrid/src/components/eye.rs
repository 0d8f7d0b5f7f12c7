use glam::Vec2;
use crate::api::types::CellId;
use crate::extensions::easing::{ease, Easing};

/// Maximum distance a pupil may travel from the eye center, per axis, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionRange {
    pub x: f32,
    pub y: f32,
}

impl MotionRange {
    /// Range from the rendered eye box and pupil box sizes.
    /// A pupil larger than its eye gets a zero range rather than a negative one.
    pub fn from_sizes(eye: Vec2, pupil: Vec2) -> Self {
        Self {
            x: ((eye.x - pupil.x) / 2.0).max(0.0),
            y: ((eye.y - pupil.y) / 2.0).max(0.0),
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Clamp an offset into [-range, range] on both axes.
    pub fn clamp(self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x.clamp(-self.x, self.x), offset.y.clamp(-self.y, self.y))
    }

    pub fn contains(self, offset: Vec2) -> bool {
        offset.x.abs() <= self.x + f32::EPSILON && offset.y.abs() <= self.y + f32::EPSILON
    }
}

/// Eyelid coverage and the transition that got it there.
///
/// Coverage is 0.0 (open) to 1.0 (closed). The transition is kept so the
/// headless surface can sample where the lid visually is at any moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidState {
    pub from: f32,
    pub to: f32,
    /// Scene clock time the transition started (ms).
    pub started_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for LidState {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            started_ms: 0.0,
            duration_ms: 0.0,
            easing: Easing::Linear,
        }
    }
}

impl LidState {
    /// Start a transition towards `to` from wherever the lid is at `now_ms`.
    pub fn transition(&mut self, to: f32, now_ms: f64, duration_ms: f64, easing: Easing) {
        self.from = self.coverage_at(now_ms);
        self.to = to;
        self.started_ms = now_ms;
        self.duration_ms = duration_ms;
        self.easing = easing;
    }

    /// Visual coverage at scene time `now_ms`.
    pub fn coverage_at(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = ((now_ms - self.started_ms) / self.duration_ms) as f32;
        ease(self.from, self.to, t, self.easing)
    }

    /// Coverage once the current transition has finished.
    pub fn target(&self) -> f32 {
        self.to
    }
}

/// One eye in the grid.
#[derive(Debug, Clone)]
pub struct EyeCell {
    pub id: CellId,
    pub row: u32,
    pub col: u32,
    /// Part of the phrase overlay.
    pub highlighted: bool,
    /// Exposed by the intro reveal.
    pub revealed: bool,
    /// Cached pupil travel. `None` until measured after layout.
    pub metrics: Option<MotionRange>,
    /// Eye center in viewport coordinates, measured with the metrics.
    pub center: Vec2,
    /// Current pupil offset from the eye center.
    pub pupil: Vec2,
    pub lid: LidState,
}

impl EyeCell {
    pub fn new(id: CellId, row: u32, col: u32) -> Self {
        Self {
            id,
            row,
            col,
            highlighted: false,
            revealed: false,
            metrics: None,
            center: Vec2::ZERO,
            pupil: Vec2::ZERO,
            lid: LidState::default(),
        }
    }

    /// Motion range, or zero if metrics have not been measured yet.
    pub fn range(&self) -> MotionRange {
        self.metrics.unwrap_or_default()
    }
}
