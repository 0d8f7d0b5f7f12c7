//! Device-orientation permission probe.
//!
//! Some browsers gate `deviceorientation` behind
//! `DeviceOrientationEvent.requestPermission()`, which must be called from a
//! user gesture and resolves to `"granted"` or `"denied"`. Others deliver
//! events without asking. Both are looked up through `Reflect` because
//! neither is in every browser's bindings.

use eyegrid::TiltPermission;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn orientation_ctor() -> Option<JsValue> {
    let window = web_sys::window()?;
    let ctor = Reflect::get(&window, &"DeviceOrientationEvent".into()).ok()?;
    if ctor.is_undefined() || ctor.is_null() {
        None
    } else {
        Some(ctor)
    }
}

fn permission_fn(ctor: &JsValue) -> Option<Function> {
    Reflect::get(ctor, &"requestPermission".into())
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// State of the tilt provider before any gesture.
pub fn probe() -> TiltPermission {
    match orientation_ctor() {
        None => TiltPermission::Unavailable,
        Some(ctor) if permission_fn(&ctor).is_some() => TiltPermission::Pending,
        Some(_) => TiltPermission::Granted,
    }
}

/// Ask for permission. `deliver` is called with the outcome, possibly later
/// from a promise callback.
pub fn request(deliver: fn(TiltPermission)) -> Result<(), JsValue> {
    let Some(ctor) = orientation_ctor() else {
        deliver(TiltPermission::Unavailable);
        return Ok(());
    };
    let Some(ask) = permission_fn(&ctor) else {
        deliver(TiltPermission::Granted);
        return Ok(());
    };

    let promise: Promise = ask.call0(&ctor)?.dyn_into()?;
    let on_ok = Closure::wrap(Box::new(move |state: JsValue| {
        let granted = state.as_string().as_deref() == Some("granted");
        deliver(if granted { TiltPermission::Granted } else { TiltPermission::Denied });
    }) as Box<dyn FnMut(JsValue)>);
    let on_err = Closure::wrap(Box::new(move |err: JsValue| {
        log::warn!("motion permission request failed: {:?}", err);
        deliver(TiltPermission::Denied);
    }) as Box<dyn FnMut(JsValue)>);

    let _ = promise.then(&on_ok).catch(&on_err);
    // Callbacks live for the page; the request happens once.
    on_ok.forget();
    on_err.forget();
    Ok(())
}
