//! Blinking.
//!
//! A blink closes both lids of a pair with a fast transition, then reopens
//! them slightly slower after a randomized close time. After the intro reveal
//! every pair gets its own perpetual timer; timers share a cancel token that
//! scene teardown trips so no timer outlives the cells it points at.

use std::cell::Cell;
use std::rc::Rc;
use crate::api::config::SceneConfig;
use crate::components::grid::{Grid, Pair};
use crate::core::time::Countdown;
use crate::extensions::easing::Easing;
use crate::renderer::traits::{Surface, SurfaceError};
use crate::systems::rng::Rng;

/// Shared cancellation flag for a family of tasks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

fn set_pair_lids<S: Surface>(
    grid: &mut Grid,
    pair: &Pair,
    coverage: f32,
    now_ms: f64,
    duration_ms: f64,
    easing: Easing,
    surface: &mut S,
) -> Result<(), SurfaceError> {
    for id in pair.cells() {
        if let Some(cell) = grid.get_mut(id) {
            cell.lid.transition(coverage, now_ms, duration_ms, easing);
            surface.set_lid(id, coverage, duration_ms, easing)?;
        }
    }
    Ok(())
}

/// Lid animations in flight: pairs waiting to reopen.
#[derive(Debug, Default)]
pub struct BlinkAnimator {
    reopening: Vec<(Pair, Countdown)>,
}

impl BlinkAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close a pair's lids now and schedule them to reopen.
    pub fn blink<S: Surface>(
        &mut self,
        grid: &mut Grid,
        pair: Pair,
        now_ms: f64,
        rng: &mut Rng,
        config: &SceneConfig,
        surface: &mut S,
    ) -> Result<(), SurfaceError> {
        set_pair_lids(grid, &pair, 1.0, now_ms, config.lid_close_transition_ms, Easing::EaseIn, surface)?;
        let (lo, hi) = config.blink_close_ms;
        let close_for = rng.range(lo, hi);
        // A pair already mid-blink just gets its reopen pushed back.
        if let Some(entry) = self.reopening.iter_mut().find(|(p, _)| *p == pair) {
            entry.1 = Countdown::new(close_for);
        } else {
            self.reopening.push((pair, Countdown::new(close_for)));
        }
        Ok(())
    }

    /// Reopen every pair whose close time has elapsed.
    pub fn tick<S: Surface>(
        &mut self,
        dt_ms: f64,
        grid: &mut Grid,
        now_ms: f64,
        config: &SceneConfig,
        surface: &mut S,
    ) -> Result<(), SurfaceError> {
        for (_, timer) in self.reopening.iter_mut() {
            timer.advance(dt_ms);
        }
        let mut i = 0;
        while i < self.reopening.len() {
            if self.reopening[i].1.expired() {
                let (pair, _) = self.reopening.swap_remove(i);
                set_pair_lids(grid, &pair, 0.0, now_ms, config.lid_open_transition_ms, Easing::EaseOut, surface)?;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    /// Pairs currently closed or closing.
    pub fn in_flight(&self) -> usize {
        self.reopening.len()
    }

    pub fn clear(&mut self) {
        self.reopening.clear();
    }
}

/// Perpetual randomized blink timer for one pair.
#[derive(Debug, Clone)]
pub struct BlinkTask {
    pub pair: Pair,
    timer: Countdown,
    token: CancelToken,
}

/// All perpetual blink timers of a scene.
#[derive(Debug, Default)]
pub struct BlinkScheduler {
    tasks: Vec<BlinkTask>,
    token: CancelToken,
}

impl BlinkScheduler {
    /// One task per pair, each with its own random start delay.
    pub fn start(pairs: &[Pair], rng: &mut Rng, config: &SceneConfig) -> Self {
        let token = CancelToken::new();
        let (lo, hi) = config.blink_start_ms;
        let tasks = pairs
            .iter()
            .map(|&pair| BlinkTask {
                pair,
                timer: Countdown::new(rng.range(lo, hi)),
                token: token.clone(),
            })
            .collect();
        Self { tasks, token }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Stop every task. Cancelled tasks never fire again.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Advance all timers; blink pairs that are due and fully revealed.
    /// Returns how many blinks started.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<S: Surface>(
        &mut self,
        dt_ms: f64,
        grid: &mut Grid,
        now_ms: f64,
        animator: &mut BlinkAnimator,
        rng: &mut Rng,
        config: &SceneConfig,
        surface: &mut S,
    ) -> Result<usize, SurfaceError> {
        if self.token.is_cancelled() {
            return Ok(0);
        }
        let (lo, hi) = config.blink_interval_ms;
        let mut fired = 0;
        for task in self.tasks.iter_mut() {
            task.timer.advance(dt_ms);
            if !task.timer.expired() {
                continue;
            }
            let visible = task.pair.cells().all(|id| grid.get(id).map(|c| c.revealed).unwrap_or(false));
            if visible {
                animator.blink(grid, task.pair, now_ms, rng, config, surface)?;
                fired += 1;
            }
            // Fresh interval, not carried: a long stall should not cause a burst.
            task.timer = Countdown::new(rng.range(lo, hi));
        }
        Ok(fired)
    }
}
