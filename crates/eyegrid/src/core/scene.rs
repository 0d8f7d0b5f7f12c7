use glam::Vec2;
use crate::api::config::SceneConfig;
use crate::api::types::{Phase, Viewport};
use crate::components::grid::{Grid, Pair};
use crate::core::time::{Countdown, SceneClock};
use crate::input::focal::FocalTracker;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::traits::{Surface, SurfaceError};
use crate::systems::blink::{BlinkAnimator, BlinkScheduler};
use crate::systems::grid_build::{BuildProgress, GridBuilder};
use crate::systems::mask::{phrase_mask_for_viewport, PhraseMask};
use crate::systems::projector::apply_mask_pairs;
use crate::systems::pupil::{invalidate_metrics, place_pupils, position_toward_center, precompute_metrics};
use crate::systems::reveal::RevealSchedule;
use crate::systems::rng::Rng;
use crate::systems::sizer::{auto_size_eyes, GridFit};

/// The whole eye grid: layout, cells, input and every running schedule.
///
/// Driven by `tick` once per animation frame. Layout runs as a strict
/// sequence (size, build in batches, project the mask, measure, aim the plain
/// eyes, settle, reveal); highlighted pupils follow the focal point on every
/// tick once cells are measured. A resize is a full `start` from scratch.
pub struct EyeScene {
    config: SceneConfig,
    viewport: Viewport,
    phase: Phase,
    mask: PhraseMask,
    fit: Option<GridFit>,
    grid: Grid,
    pairs: Vec<Pair>,
    builder: Option<GridBuilder>,
    focal: FocalTracker,
    input: InputQueue,
    rng: Rng,
    clock: SceneClock,
    settle: Countdown,
    safety: Countdown,
    loader_hidden: bool,
    reveal: Option<RevealSchedule>,
    blinks: Option<BlinkScheduler>,
    animator: BlinkAnimator,
}

impl EyeScene {
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let focal = FocalTracker::new(&config);
        let safety = Countdown::new(config.loader_safety_ms);
        let settle = Countdown::new(config.settle_delay_ms);
        Self {
            config,
            viewport: Viewport::default(),
            phase: Phase::Idle,
            mask: PhraseMask::default(),
            fit: None,
            grid: Grid::default(),
            pairs: Vec::new(),
            builder: None,
            focal,
            input: InputQueue::new(),
            rng: Rng::new(seed),
            clock: SceneClock::new(),
            settle,
            safety,
            loader_hidden: false,
            reveal: None,
            blinks: None,
            animator: BlinkAnimator::new(),
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mask(&self) -> &PhraseMask {
        &self.mask
    }

    pub fn fit(&self) -> Option<&GridFit> {
        self.fit.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn focal(&self) -> &FocalTracker {
        &self.focal
    }

    pub fn loader_hidden(&self) -> bool {
        self.loader_hidden
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Blink timers currently running (zero until the reveal finishes).
    pub fn blink_tasks(&self) -> usize {
        self.blinks.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    // -- Lifecycle --

    /// Lay out a fresh scene for `viewport`, discarding whatever was there.
    pub fn start<S: Surface>(&mut self, viewport: Viewport, surface: &mut S) {
        self.teardown(surface);
        self.viewport = viewport;
        self.settle = Countdown::new(self.config.settle_delay_ms);
        self.safety = Countdown::new(self.config.loader_safety_ms);
        self.loader_hidden = false;
        surface.show_loader();
        if let Err(err) = self.begin_layout(surface) {
            self.fail(err, surface);
        }
    }

    fn begin_layout<S: Surface>(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        self.mask = phrase_mask_for_viewport(self.viewport.width, &self.config);
        let fit = auto_size_eyes(self.viewport.width, self.viewport.usable_height(), &self.mask, &self.config);
        surface.set_layout(&fit)?;
        log::debug!("phrase mask:\n{}", self.mask.to_ascii());
        let (builder, grid) = GridBuilder::new(&fit, &self.config);
        log::debug!(
            "layout: {}×{} grid at {}px, mask {}×{}, batch {}",
            grid.rows, grid.cols, fit.cell_px, self.mask.rows, self.mask.cols, builder.batch_size()
        );
        self.fit = Some(fit);
        self.grid = grid;
        self.builder = Some(builder);
        self.phase = Phase::Building;
        Ok(())
    }

    /// Stop every schedule and drop all cells. Blink timers are cancelled
    /// before the grid goes away.
    pub fn teardown<S: Surface>(&mut self, surface: &mut S) {
        if let Some(blinks) = self.blinks.take() {
            blinks.cancel();
        }
        self.reveal = None;
        self.builder = None;
        self.animator.clear();
        self.pairs.clear();
        self.grid = Grid::default();
        self.fit = None;
        if let Err(err) = surface.clear() {
            log::warn!("teardown: {}", err);
        }
        if self.phase != Phase::Idle {
            log::info!("scene torn down");
        }
        self.phase = Phase::Idle;
    }

    /// Queue an input event; it is applied on the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance the scene by one frame.
    pub fn tick<S: Surface>(&mut self, dt_ms: f64, surface: &mut S) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.clock.advance(dt_ms);

        for event in self.input.drain() {
            self.focal.apply(event, &self.viewport);
        }

        if !self.loader_hidden {
            self.safety.advance(dt_ms);
            if self.safety.expired() {
                log::warn!("loader safety timer fired in phase {:?}", self.phase);
                self.hide_loader(surface);
            }
        }

        if let Err(err) = self.step(dt_ms, surface) {
            self.fail(err, surface);
        }
    }

    fn step<S: Surface>(&mut self, dt_ms: f64, surface: &mut S) -> Result<(), SurfaceError> {
        let now = self.clock.now();
        match self.phase {
            Phase::Idle | Phase::Failed => return Ok(()),
            Phase::Building => {
                if let Some(builder) = self.builder.as_mut() {
                    if builder.step(&mut self.grid, surface)? == BuildProgress::Done {
                        self.builder = None;
                        self.finish_layout(surface)?;
                    }
                }
                return Ok(());
            }
            Phase::Settling => {
                self.settle.advance(dt_ms);
                if self.settle.expired() {
                    self.hide_loader(surface);
                    self.reveal = Some(RevealSchedule::new(&self.pairs, &mut self.rng, &self.config));
                    self.phase = Phase::Revealing;
                }
            }
            Phase::Revealing => {
                if let Some(reveal) = self.reveal.as_mut() {
                    reveal.tick(dt_ms, &mut self.grid, now, &mut self.animator, &mut self.rng, &self.config, surface)?;
                    if reveal.is_done() {
                        log::info!("reveal finished: {} pairs in {:.0}ms", reveal.total(), now);
                        self.reveal = None;
                        self.blinks = Some(BlinkScheduler::start(&self.pairs, &mut self.rng, &self.config));
                        self.phase = Phase::Steady;
                    }
                }
            }
            Phase::Steady => {
                if let Some(blinks) = self.blinks.as_mut() {
                    blinks.tick(dt_ms, &mut self.grid, now, &mut self.animator, &mut self.rng, &self.config, surface)?;
                }
            }
        }

        self.animator.tick(dt_ms, &mut self.grid, now, &self.config, surface)?;
        place_pupils(&mut self.grid, self.focal.focal(), surface)
    }

    /// Everything after the last batch: highlight, pair, measure, aim.
    fn finish_layout<S: Surface>(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        self.pairs = apply_mask_pairs(&mut self.grid, &self.mask);
        for cell in self.grid.iter().filter(|c| c.highlighted) {
            surface.set_highlighted(cell.id, true)?;
        }

        invalidate_metrics(&mut self.grid);
        precompute_metrics(&mut self.grid, &*surface)?;
        position_toward_center(&mut self.grid, &self.viewport, surface)?;
        place_pupils(&mut self.grid, self.focal.focal(), surface)?;

        log::info!(
            "scene built on {} surface: {}×{} eyes, {} highlighted, {} pairs",
            surface.backend(), self.grid.rows, self.grid.cols, self.grid.highlighted_count(), self.pairs.len()
        );
        self.phase = Phase::Settling;
        Ok(())
    }

    fn hide_loader<S: Surface>(&mut self, surface: &mut S) {
        if !self.loader_hidden {
            self.loader_hidden = true;
            surface.hide_loader();
        }
    }

    /// Log, stop scheduling, and make sure the loader is gone. Whatever was
    /// already drawn stays.
    fn fail<S: Surface>(&mut self, err: SurfaceError, surface: &mut S) {
        log::error!("scene pipeline failed in phase {:?}: {}", self.phase, err);
        if let Some(blinks) = self.blinks.take() {
            blinks.cancel();
        }
        self.builder = None;
        self.reveal = None;
        self.phase = Phase::Failed;
        self.hide_loader(surface);
    }

    /// Current focal point, for hosts that want to mirror it.
    pub fn focal_point(&self) -> Vec2 {
        self.focal.focal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::focal::TiltPermission;
    use crate::renderer::headless::HeadlessSurface;

    const FRAME: f64 = 16.0;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 800.0).with_chrome(60.0, 40.0)
    }

    fn surface(vp: Viewport) -> HeadlessSurface {
        HeadlessSurface::new(vp, SceneConfig::default().pupil_ratio)
    }

    fn run_until<S: Surface>(scene: &mut EyeScene, s: &mut S, phase: Phase, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            if scene.phase() == phase {
                return frame;
            }
            scene.tick(FRAME, s);
        }
        panic!("scene stuck in {:?}, wanted {:?}", scene.phase(), phase);
    }

    #[test]
    fn pipeline_runs_to_steady_state() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 7);
        scene.start(vp, &mut s);
        assert_eq!(scene.phase(), Phase::Building);

        run_until(&mut scene, &mut s, Phase::Settling, 100);
        let grid = scene.grid();
        assert!(grid.is_complete());
        assert_eq!(s.cells.len(), grid.capacity());
        assert_eq!(grid.cols % 2, 0);
        assert!(grid.iter().all(|c| c.metrics.is_some()));
        assert_eq!(scene.pairs().len(), grid.capacity() / 2);
        assert!(!scene.loader_hidden(), "loader waits for the settle delay");

        run_until(&mut scene, &mut s, Phase::Revealing, 10);
        assert!(scene.loader_hidden());
        assert!(s.loader_hidden);

        run_until(&mut scene, &mut s, Phase::Steady, 100_000);
        assert!(scene.grid().iter().all(|c| c.revealed));
        assert_eq!(scene.blink_tasks(), scene.pairs().len());
    }

    #[test]
    fn highlighted_cells_match_surface() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 1);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Settling, 100);
        let lit = scene.grid().highlighted_count();
        assert!(lit > 0);
        assert_eq!(s.cells.iter().filter(|c| c.highlighted).count(), lit);
    }

    #[test]
    fn building_yields_between_batches() {
        let vp = Viewport::new(1920.0, 1080.0);
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 1);
        scene.start(vp, &mut s);
        scene.tick(FRAME, &mut s);
        assert_eq!(scene.phase(), Phase::Building);
        assert_eq!(s.batches, 1);
        assert!(s.cells.len() < scene.grid().capacity());
    }

    #[test]
    fn plain_eyes_look_at_center_and_highlighted_follow_focus() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 3);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Settling, 100);

        // top-left plain eye looks down and right
        let first = &s.cells[0];
        assert!(!first.highlighted);
        assert!(first.pupil.x > 0.0 && first.pupil.y > 0.0);
        let plain_before: Vec<_> = s.cells.iter().filter(|c| !c.highlighted).map(|c| c.pupil).collect();

        scene.push_input(InputEvent::PointerMove { x: 0.0, y: 0.0 });
        scene.tick(FRAME, &mut s);
        for _ in 0..10 {
            scene.push_input(InputEvent::PointerMove { x: 1280.0, y: 800.0 });
            scene.tick(FRAME, &mut s);
        }
        let plain_after: Vec<_> = s.cells.iter().filter(|c| !c.highlighted).map(|c| c.pupil).collect();
        assert_eq!(plain_before, plain_after, "plain eyes only aim once per layout");

        scene.push_input(InputEvent::PointerMove { x: 0.0, y: 0.0 });
        scene.tick(FRAME, &mut s);
        for cell in scene.grid().iter().filter(|c| c.highlighted) {
            let range = cell.range();
            assert!(range.contains(cell.pupil));
            assert!(cell.pupil.x < 0.0 && cell.pupil.y < 0.0);
            assert_eq!(s.cells[cell.id.index()].pupil, cell.pupil);
        }
    }

    #[test]
    fn tilt_drives_pupils_once_granted() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 3);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Settling, 100);
        scene.push_input(InputEvent::Permission(TiltPermission::Granted));
        for _ in 0..100 {
            scene.push_input(InputEvent::Tilt { gamma: 45.0, beta: 45.0 });
            scene.tick(FRAME, &mut s);
        }
        assert!(scene.focal().using_tilt());
        let f = scene.focal_point();
        assert!(f.x > 0.99 && f.y > 0.99);
    }

    #[test]
    fn restart_discards_old_scene() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 5);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Steady, 100_000);
        let old_cells = scene.grid().capacity();

        let small = Viewport::new(390.0, 844.0);
        s.viewport = small;
        scene.start(small, &mut s);
        assert_eq!(scene.phase(), Phase::Building);
        assert_eq!(scene.blink_tasks(), 0);
        assert!(scene.grid().is_empty());
        assert!(scene.pairs().is_empty());

        run_until(&mut scene, &mut s, Phase::Settling, 100);
        assert_ne!(scene.grid().capacity(), old_cells);
        assert_eq!(s.cells.len(), scene.grid().capacity());
        assert_eq!(scene.mask().rows, 23, "narrow viewport uses the mobile lines");
    }

    #[test]
    fn restart_brings_the_loader_back() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 4);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Steady, 100_000);
        assert!(s.loader_hidden);

        scene.start(vp, &mut s);
        assert_eq!(scene.phase(), Phase::Building);
        assert!(!scene.loader_hidden());
        assert!(!s.loader_hidden, "overlay covers the rebuild");
        assert_eq!(scene.safety.remaining(), 3000.0, "safety timer re-armed");

        run_until(&mut scene, &mut s, Phase::Revealing, 200);
        assert!(s.loader_hidden);
    }

    #[test]
    fn safety_timer_restarts_with_each_rebuild() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 4);
        // stall idle until one frame short of the safety window, then rebuild
        for _ in 0..187 {
            scene.tick(FRAME, &mut s);
        }
        assert!(!s.loader_hidden);
        scene.start(vp, &mut s);
        scene.tick(FRAME, &mut s);
        assert!(!s.loader_hidden, "old countdown does not carry into the new scene");
    }

    #[test]
    fn failure_still_hides_loader() {
        let vp = Viewport::new(1920.0, 1080.0);
        let mut s = surface(vp).failing_after(100);
        let mut scene = EyeScene::new(SceneConfig::default(), 1);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Failed, 10);
        assert!(s.loader_hidden);
        // ticking a failed scene is harmless
        scene.tick(FRAME, &mut s);
        assert_eq!(scene.phase(), Phase::Failed);
    }

    #[test]
    fn safety_timer_hides_a_stalled_loader() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 1);
        // never started: the pipeline sits idle
        for _ in 0..((3000.0 / FRAME) as usize + 1) {
            scene.tick(FRAME, &mut s);
        }
        assert!(s.loader_hidden);
        assert_eq!(scene.phase(), Phase::Idle);
    }

    #[test]
    fn teardown_cancels_blinks() {
        let vp = viewport();
        let mut s = surface(vp);
        let mut scene = EyeScene::new(SceneConfig::default(), 9);
        scene.start(vp, &mut s);
        run_until(&mut scene, &mut s, Phase::Steady, 100_000);
        let token = scene.blinks.as_ref().map(|b| b.token()).unwrap();
        scene.teardown(&mut s);
        assert!(token.is_cancelled());
        assert_eq!(scene.phase(), Phase::Idle);
        assert!(s.cells.is_empty());
        for _ in 0..1000 {
            scene.tick(FRAME, &mut s);
        }
        assert!(s.cells.is_empty());
    }
}
