use glam::Vec2;

/// Row-major index of a cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Host viewport dimensions, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Rendered height of the page header.
    pub header_height: f32,
    /// Rendered height of the page footer.
    pub footer_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            header_height: 0.0,
            footer_height: 0.0,
        }
    }

    pub fn with_chrome(mut self, header_height: f32, footer_height: f32) -> Self {
        self.header_height = header_height;
        self.footer_height = footer_height;
        self
    }

    /// Height left for the grid between header and footer.
    pub fn usable_height(&self) -> f32 {
        (self.height - self.header_height - self.footer_height).max(0.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Where the scene pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing built yet, or torn down.
    Idle,
    /// Cells are being created batch by batch.
    Building,
    /// Layout done; waiting a moment before dropping the loader.
    Settling,
    /// Pairs are being revealed one at a time.
    Revealing,
    /// Reveal done; blink timers running.
    Steady,
    /// The pipeline hit a surface error. Whatever was built stays on screen.
    Failed,
}

impl Phase {
    /// Numeric code handed across the wasm boundary.
    pub fn code(self) -> u32 {
        match self {
            Phase::Idle => 0,
            Phase::Building => 1,
            Phase::Settling => 2,
            Phase::Revealing => 3,
            Phase::Steady => 4,
            Phase::Failed => 5,
        }
    }
}
