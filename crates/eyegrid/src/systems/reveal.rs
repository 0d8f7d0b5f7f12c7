//! Progressive intro reveal.
//!
//! Pairs are shuffled once, then revealed one at a time. The gap between
//! reveals starts at `reveal_initial_delay_ms` and shrinks by `reveal_accel`
//! each step down to `reveal_min_delay_ms`, so the grid fills slowly at first
//! and then floods in. Every reveal also blinks the pair.

use crate::api::config::SceneConfig;
use crate::components::grid::{Grid, Pair};
use crate::core::time::Countdown;
use crate::renderer::traits::{Surface, SurfaceError};
use crate::systems::blink::BlinkAnimator;
use crate::systems::rng::Rng;

#[derive(Debug, Clone)]
pub struct RevealSchedule {
    order: Vec<Pair>,
    next: usize,
    delay_ms: f64,
    accel: f64,
    min_delay_ms: f64,
    timer: Countdown,
}

impl RevealSchedule {
    /// Shuffle `pairs` and prepare the reveal. The first pair goes out on the first tick.
    pub fn new(pairs: &[Pair], rng: &mut Rng, config: &SceneConfig) -> Self {
        let mut order = pairs.to_vec();
        rng.shuffle(&mut order);
        Self {
            order,
            next: 0,
            delay_ms: config.reveal_initial_delay_ms,
            accel: config.reveal_accel,
            min_delay_ms: config.reveal_min_delay_ms.max(0.0),
            timer: Countdown::new(0.0),
        }
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.order.len()
    }

    /// Pairs revealed so far.
    pub fn revealed(&self) -> usize {
        self.next
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Shuffled reveal order.
    pub fn order(&self) -> &[Pair] {
        &self.order
    }

    /// Current gap between reveals.
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Advance the schedule and reveal every pair that has come due.
    /// Returns how many pairs were revealed during this call.
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
        self.timer.advance(dt_ms);
        let mut count = 0;
        while self.timer.expired() && !self.is_done() {
            let pair = self.order[self.next];
            self.next += 1;
            for id in pair.cells() {
                if let Some(cell) = grid.get_mut(id) {
                    cell.revealed = true;
                }
                surface.set_revealed(id, true)?;
            }
            animator.blink(grid, pair, now_ms, rng, config, surface)?;
            count += 1;

            // Never re-arm with zero, or one tick would flush the whole queue.
            self.timer.rearm(self.delay_ms.max(f64::EPSILON));
            self.delay_ms = (self.delay_ms * self.accel).max(self.min_delay_ms);
        }
        Ok(count)
    }
}
