use crate::input::focal::TiltPermission;

/// Input events the scene understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor or first touch moved to viewport coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// Device orientation reading, in degrees.
    Tilt { gamma: f32, beta: f32 },
    /// The tilt permission probe changed state.
    Permission(TiltPermission),
}

/// A queue of input events.
/// JS writes events into the queue; the scene drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
