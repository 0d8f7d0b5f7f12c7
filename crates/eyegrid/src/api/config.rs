use serde::Deserialize;

/// Configuration for the eye grid scene.
///
/// Every tuning constant of the layout and animation pipeline lives here so the
/// host can override any of them with a JSON blob. Missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Smallest cell size in pixels on wide viewports.
    pub eye_px_min: u32,
    /// Smallest cell size in pixels on compact viewports.
    pub eye_px_min_compact: u32,
    /// Largest cell size in pixels.
    pub eye_px_max: u32,
    /// Viewport widths at or below this are compact (mobile line set, no side margins).
    pub mobile_breakpoint: f32,
    /// Reserved side-margin pair counts tried on wide viewports, widest first.
    pub side_pairs_wide: Vec<u32>,
    /// Reserved side-margin pair counts tried on compact viewports.
    pub side_pairs_compact: Vec<u32>,

    /// Phrase lines used on wide viewports.
    pub lines_desktop: Vec<String>,
    /// Phrase lines used on compact viewports.
    pub lines_mobile: Vec<String>,
    /// Empty mask columns after a letter.
    pub mask_gap_letter: usize,
    /// Empty mask columns after a space.
    pub mask_gap_space: usize,

    /// Minimum cells created per build step.
    pub build_batch_min: usize,
    /// The grid is built in roughly this many steps.
    pub build_batch_divisor: usize,

    /// Delay before the first reveal step (ms).
    pub reveal_initial_delay_ms: f64,
    /// Multiplier applied to the delay after each reveal (< 1 accelerates).
    pub reveal_accel: f64,
    /// Floor for the reveal delay (ms).
    pub reveal_min_delay_ms: f64,

    /// Range for the first blink of each pair (ms).
    pub blink_start_ms: (f64, f64),
    /// Range between blink attempts (ms).
    pub blink_interval_ms: (f64, f64),
    /// Range for how long the lids stay closed (ms).
    pub blink_close_ms: (f64, f64),
    /// Lid closing transition (ms).
    pub lid_close_transition_ms: f64,
    /// Lid opening transition (ms).
    pub lid_open_transition_ms: f64,

    /// Lerp factor applied to device tilt readings.
    pub tilt_smoothing: f32,
    /// Tilt angles are clamped to +/- this many degrees.
    pub tilt_range_deg: f32,

    /// Wait after the first pupil placement before hiding the loader (ms).
    pub settle_delay_ms: f64,
    /// The loader is hidden after this long no matter what (ms).
    pub loader_safety_ms: f64,

    /// Pupil size as a fraction of the eye box (used by the headless surface).
    pub pupil_ratio: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            eye_px_min: 14,
            eye_px_min_compact: 10,
            eye_px_max: 64,
            mobile_breakpoint: 700.0,
            side_pairs_wide: vec![2, 1, 0],
            side_pairs_compact: vec![0],
            lines_desktop: vec![" ALL EYES ".into(), "ON US".into()],
            lines_mobile: vec!["ALL".into(), "EYES".into(), "ON".into(), "US".into()],
            mask_gap_letter: 1,
            mask_gap_space: 1,
            build_batch_min: 50,
            build_batch_divisor: 30,
            reveal_initial_delay_ms: 70.0,
            reveal_accel: 0.78,
            reveal_min_delay_ms: 4.0,
            blink_start_ms: (500.0, 3000.0),
            blink_interval_ms: (1500.0, 6000.0),
            blink_close_ms: (90.0, 130.0),
            lid_close_transition_ms: 90.0,
            lid_open_transition_ms: 120.0,
            tilt_smoothing: 0.15,
            tilt_range_deg: 45.0,
            settle_delay_ms: 50.0,
            loader_safety_ms: 3000.0,
            pupil_ratio: 0.45,
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether a viewport of this width uses the compact layout.
    pub fn is_compact(&self, viewport_width: f32) -> bool {
        viewport_width <= self.mobile_breakpoint
    }

    /// Phrase lines for a viewport of this width.
    pub fn lines_for(&self, viewport_width: f32) -> &[String] {
        if self.is_compact(viewport_width) {
            &self.lines_mobile
        } else {
            &self.lines_desktop
        }
    }

    /// Minimum cell size for a viewport of this width.
    pub fn px_floor(&self, viewport_width: f32) -> u32 {
        if self.is_compact(viewport_width) {
            self.eye_px_min_compact
        } else {
            self.eye_px_min
        }
    }

    /// Side-margin pair counts to try for a viewport of this width.
    pub fn side_pairs_for(&self, viewport_width: f32) -> &[u32] {
        if self.is_compact(viewport_width) {
            &self.side_pairs_compact
        } else {
            &self.side_pairs_wide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SceneConfig::from_json(r#"{ "eye_px_max": 48, "reveal_accel": 0.5 }"#).unwrap();
        assert_eq!(cfg.eye_px_max, 48);
        assert_eq!(cfg.reveal_accel, 0.5);
        assert_eq!(cfg.eye_px_min, 14);
        assert_eq!(cfg.lines_mobile.len(), 4);
    }

    #[test]
    fn ranges_parse_from_arrays() {
        let cfg = SceneConfig::from_json(r#"{ "blink_close_ms": [100, 110] }"#).unwrap();
        assert_eq!(cfg.blink_close_ms, (100.0, 110.0));
    }

    #[test]
    fn breakpoint_selects_compact_settings() {
        let cfg = SceneConfig::default();
        assert!(cfg.is_compact(700.0));
        assert!(!cfg.is_compact(701.0));
        assert_eq!(cfg.px_floor(400.0), 10);
        assert_eq!(cfg.px_floor(1200.0), 14);
        assert_eq!(cfg.side_pairs_for(400.0), &[0]);
        assert_eq!(cfg.lines_for(1200.0)[1], "ON US");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SceneConfig::from_json("{ eye_px_max: }").is_err());
    }
}
