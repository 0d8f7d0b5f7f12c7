//! wasm-bindgen exports for the eye grid.
//!
//! The host page owns the frame loop and the event listeners; everything it
//! learns is forwarded here:
//!
//! ```js
//! import init, * as eyes from './pkg/eyegrid_web.js';
//! await init();
//! eyes.eyes_init();
//! addEventListener('mousemove', e => eyes.eyes_pointer_move(e.clientX, e.clientY));
//! requestAnimationFrame(function frame(t) { eyes.eyes_tick(dt); requestAnimationFrame(frame); });
//! ```

pub mod dom;
pub mod header;
pub mod motion;
pub mod runner;

pub use runner::SceneRunner;

use std::cell::RefCell;
use eyegrid::{InputEvent, SceneConfig, TiltPermission};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SceneRunner>> = RefCell::new(None);
}

/// Run `f` against the runner. Calls before `eyes_init` are logged and ignored.
fn with_runner<R: Default>(f: impl FnOnce(&mut SceneRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("eyes not initialized; call eyes_init() first");
            R::default()
        }
    })
}

fn init_with(config: SceneConfig) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SceneRunner::new(config)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    with_runner(|r| r.init());
    log::info!("eyegrid: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn eyes_init() -> Result<(), JsValue> {
    init_with(SceneConfig::default())
}

/// Initialize with a JSON object overriding any `SceneConfig` field.
#[wasm_bindgen]
pub fn eyes_init_with_config(json: &str) -> Result<(), JsValue> {
    let config = SceneConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    init_with(config)
}

#[wasm_bindgen]
pub fn eyes_tick(dt_ms: f64) {
    with_runner(|r| r.tick(dt_ms));
}

#[wasm_bindgen]
pub fn eyes_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn eyes_device_orientation(gamma: f32, beta: f32) {
    with_runner(|r| r.push_input(InputEvent::Tilt { gamma, beta }));
}

fn deliver_permission(state: TiltPermission) {
    with_runner(|r| r.set_permission(state));
}

/// Call from the first click/touch. The runner must not be borrowed here:
/// the outcome may be delivered synchronously.
#[wasm_bindgen]
pub fn eyes_request_motion_permission() {
    if let Err(err) = motion::request(deliver_permission) {
        log::warn!("motion permission unavailable: {:?}", err);
        deliver_permission(TiltPermission::Denied);
    }
}

#[wasm_bindgen]
pub fn eyes_rebuild() {
    with_runner(|r| r.rebuild());
}

#[wasm_bindgen]
pub fn eyes_teardown() {
    with_runner(|r| r.teardown());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn eyes_cols() -> u32 {
    with_runner(|r| r.cols())
}

#[wasm_bindgen]
pub fn eyes_rows() -> u32 {
    with_runner(|r| r.rows())
}

#[wasm_bindgen]
pub fn eyes_cell_px() -> u32 {
    with_runner(|r| r.cell_px())
}

/// 0 idle, 1 building, 2 settling, 3 revealing, 4 steady, 5 failed.
#[wasm_bindgen]
pub fn eyes_phase() -> u32 {
    with_runner(|r| r.phase().code())
}
