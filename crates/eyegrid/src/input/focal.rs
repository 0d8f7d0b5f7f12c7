//! The shared focal point highlighted pupils follow.
//!
//! Pointer input is the default source. Device tilt takes over once the tilt
//! permission is granted and a reading has actually arrived; tilt readings are
//! smoothed because raw orientation data jitters.

use glam::Vec2;
use crate::api::config::SceneConfig;
use crate::api::types::Viewport;
use crate::extensions::easing::lerp_vec2;
use crate::input::queue::InputEvent;

/// State of the optional device-tilt provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltPermission {
    /// No orientation API on this device.
    #[default]
    Unavailable,
    /// API exists but needs a user gesture before it can be used.
    Pending,
    Granted,
    Denied,
}

impl TiltPermission {
    /// Decode the numeric state passed across the wasm boundary.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => TiltPermission::Pending,
            2 => TiltPermission::Granted,
            3 => TiltPermission::Denied,
            _ => TiltPermission::Unavailable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FocalTracker {
    pointer: Vec2,
    tilt: Vec2,
    tilt_received: bool,
    permission: TiltPermission,
    smoothing: f32,
    tilt_range: f32,
}

impl FocalTracker {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            pointer: Vec2::splat(0.5),
            tilt: Vec2::splat(0.5),
            tilt_received: false,
            permission: TiltPermission::Unavailable,
            smoothing: config.tilt_smoothing,
            tilt_range: config.tilt_range_deg.max(f32::EPSILON),
        }
    }

    pub fn permission(&self) -> TiltPermission {
        self.permission
    }

    pub fn using_tilt(&self) -> bool {
        self.permission == TiltPermission::Granted && self.tilt_received
    }

    /// Current focal point in [0,1]².
    pub fn focal(&self) -> Vec2 {
        if self.using_tilt() { self.tilt } else { self.pointer }
    }

    pub fn apply(&mut self, event: InputEvent, viewport: &Viewport) {
        match event {
            InputEvent::PointerMove { x, y } => {
                let w = if viewport.width > 0.0 { viewport.width } else { 1.0 };
                let h = if viewport.height > 0.0 { viewport.height } else { 1.0 };
                self.pointer = Vec2::new((x / w).clamp(0.0, 1.0), (y / h).clamp(0.0, 1.0));
            }
            InputEvent::Tilt { gamma, beta } => {
                if self.permission != TiltPermission::Granted || !gamma.is_finite() || !beta.is_finite() {
                    return;
                }
                let r = self.tilt_range;
                let target = Vec2::new(
                    (gamma.clamp(-r, r) + r) / (2.0 * r),
                    (beta.clamp(-r, r) + r) / (2.0 * r),
                );
                self.tilt = lerp_vec2(self.tilt, target, self.smoothing);
                self.tilt_received = true;
            }
            InputEvent::Permission(state) => {
                if state != self.permission {
                    log::info!("tilt permission: {:?} -> {:?}", self.permission, state);
                }
                if state == TiltPermission::Denied {
                    log::warn!("device tilt denied; following the pointer");
                }
                self.permission = state;
                if state != TiltPermission::Granted {
                    self.tilt_received = false;
                }
            }
        }
    }
}
