// extensions/easing.rs
//
// Timing curves for lid transitions.
// The DOM surface hands the CSS name to the browser; headless code samples `apply`.

/// Easing curve for a lid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    /// CSS `transition-timing-function` keyword.
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn ease_out_faster_start() {
        let mid = Easing::EaseOut.apply(0.5);
        assert!(mid > 0.5, "EaseOut at 0.5 should be > 0.5, got {}", mid);
        let mid = Easing::EaseIn.apply(0.5);
        assert!(mid < 0.5, "EaseIn at 0.5 should be < 0.5, got {}", mid);
    }

    #[test]
    fn out_of_range_time_is_clamped() {
        assert_eq!(Easing::EaseInOut.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseInOut.apply(3.0), 1.0);
    }

    #[test]
    fn css_names() {
        assert_eq!(Easing::EaseIn.css(), "ease-in");
        assert_eq!(Easing::EaseOut.css(), "ease-out");
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }
}
