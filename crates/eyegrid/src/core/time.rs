/// One-shot timer driven by frame deltas.
///
/// Overshoot is carried: re-arming adds to whatever is left (possibly negative),
/// so a chain of short delays keeps its average pace even when a single frame
/// is longer than several delays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f64,
}

impl Countdown {
    pub fn new(ms: f64) -> Self {
        Self { remaining: ms }
    }

    /// Subtract elapsed frame time.
    pub fn advance(&mut self, dt_ms: f64) {
        self.remaining -= dt_ms.max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Schedule the next expiry `ms` after the previous one.
    pub fn rearm(&mut self, ms: f64) {
        self.remaining += ms;
    }

    /// Time left; negative once overdue.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }
}

/// Monotonic scene time, in milliseconds since the scene was created.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneClock {
    now_ms: f64,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add frame time. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }
        self.now_ms
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }
}
