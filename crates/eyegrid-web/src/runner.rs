use eyegrid::{EyeScene, InputEvent, Phase, SceneConfig, TiltPermission};
use wasm_bindgen::JsValue;
use crate::dom::DomSurface;
use crate::{header, motion};

/// Owns the scene and the DOM surface it draws into.
///
/// The bridge keeps one of these in a `thread_local!` and forwards every
/// exported call to it, because wasm-bindgen cannot export the generic
/// scene/surface pair directly.
pub struct SceneRunner {
    scene: EyeScene,
    surface: DomSurface,
}

impl SceneRunner {
    pub fn new(config: SceneConfig) -> Result<Self, JsValue> {
        let surface = DomSurface::new()?;
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
        Ok(Self {
            scene: EyeScene::new(config, seed),
            surface,
        })
    }

    /// Fill the header, probe tilt support and lay out the first scene.
    pub fn init(&mut self) {
        if let Err(err) = header::apply_from_location(self.surface.document()) {
            log::debug!("header params skipped: {:?}", err);
        }
        self.scene.push_input(InputEvent::Permission(motion::probe()));
        self.rebuild();
    }

    pub fn tick(&mut self, dt_ms: f64) {
        self.scene.tick(dt_ms, &mut self.surface);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.scene.push_input(event);
    }

    pub fn set_permission(&mut self, state: TiltPermission) {
        self.scene.push_input(InputEvent::Permission(state));
    }

    /// Tear down and rebuild for the current window size.
    pub fn rebuild(&mut self) {
        let viewport = self.surface.read_viewport();
        log::debug!("rebuilding for {}×{}", viewport.width, viewport.height);
        self.scene.start(viewport, &mut self.surface);
    }

    pub fn teardown(&mut self) {
        self.scene.teardown(&mut self.surface);
    }

    // -- Accessors --

    pub fn cols(&self) -> u32 {
        self.scene.grid().cols
    }

    pub fn rows(&self) -> u32 {
        self.scene.grid().rows
    }

    pub fn cell_px(&self) -> u32 {
        self.scene.fit().map(|f| f.cell_px).unwrap_or(0)
    }

    pub fn phase(&self) -> Phase {
        self.scene.phase()
    }
}
