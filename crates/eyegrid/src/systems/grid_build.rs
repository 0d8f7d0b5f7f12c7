//! Incremental grid construction.
//!
//! A large grid is allocated over several frames: each `step` creates one
//! batch of cells and hands it to the surface, then returns so the host can
//! paint and process input before the next frame.

use crate::api::config::SceneConfig;
use crate::components::grid::Grid;
use crate::renderer::traits::{Surface, SurfaceError};
use crate::systems::sizer::GridFit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProgress {
    /// More batches to go.
    Pending { made: usize, total: usize },
    Done,
}

#[derive(Debug, Clone)]
pub struct GridBuilder {
    batch: usize,
}

impl GridBuilder {
    /// Plan the build for a fitted grid. Returns the empty grid to fill.
    pub fn new(fit: &GridFit, config: &SceneConfig) -> (Self, Grid) {
        let rows = fit.rows.max(2);
        let cols = fit.cols.max(2);
        let grid = Grid::new(rows, cols);
        let total = grid.capacity();
        let batch = (total / config.build_batch_divisor.max(1)).max(config.build_batch_min.max(1));
        (Self { batch }, grid)
    }

    pub fn batch_size(&self) -> usize {
        self.batch
    }

    /// Create the next batch of cells.
    pub fn step<S: Surface>(&mut self, grid: &mut Grid, surface: &mut S) -> Result<BuildProgress, SurfaceError> {
        let start = grid.len();
        let limit = (start + self.batch).min(grid.capacity());
        for _ in start..limit {
            grid.push_next();
        }
        if limit > start {
            let created: Vec<_> = grid.iter().skip(start).cloned().collect();
            surface.create_cells(&created)?;
        }

        if grid.is_complete() {
            Ok(BuildProgress::Done)
        } else {
            Ok(BuildProgress::Pending { made: grid.len(), total: grid.capacity() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Viewport;
    use crate::renderer::headless::HeadlessSurface;

    fn fit(rows: u32, cols: u32) -> GridFit {
        GridFit { cell_px: 20, cols, rows, side_pairs: 0, fits: true }
    }

    fn surface() -> HeadlessSurface {
        HeadlessSurface::new(Viewport::new(1000.0, 1000.0), 0.5)
    }

    #[test]
    fn batch_size_has_a_floor() {
        let cfg = SceneConfig::default();
        let (b, _) = GridBuilder::new(&fit(4, 4), &cfg);
        assert_eq!(b.batch_size(), 50);
        let (b, _) = GridBuilder::new(&fit(60, 100), &cfg);
        assert_eq!(b.batch_size(), 200);
    }

    #[test]
    fn builds_in_about_thirty_steps() {
        let cfg = SceneConfig::default();
        let (mut b, mut grid) = GridBuilder::new(&fit(60, 100), &cfg);
        let mut s = surface();
        let mut steps = 0;
        loop {
            steps += 1;
            if b.step(&mut grid, &mut s).unwrap() == BuildProgress::Done {
                break;
            }
        }
        assert_eq!(steps, 30);
        assert_eq!(s.batches, 30);
        assert_eq!(s.cells.len(), 6000);
        assert!(grid.is_complete());
    }

    #[test]
    fn small_grid_is_one_step() {
        let cfg = SceneConfig::default();
        let (mut b, mut grid) = GridBuilder::new(&fit(3, 4), &cfg);
        let mut s = surface();
        assert_eq!(b.step(&mut grid, &mut s).unwrap(), BuildProgress::Done);
        assert_eq!(grid.len(), 12);
    }

    #[test]
    fn dimensions_are_clamped_to_two() {
        let cfg = SceneConfig::default();
        let (_, grid) = GridBuilder::new(&fit(0, 1), &cfg);
        assert_eq!((grid.rows, grid.cols), (2, 2));
    }

    #[test]
    fn surface_failure_propagates() {
        let cfg = SceneConfig::default();
        let (mut b, mut grid) = GridBuilder::new(&fit(20, 20), &cfg);
        let mut s = surface().failing_after(100);
        assert!(matches!(b.step(&mut grid, &mut s), Ok(BuildProgress::Pending { made: 50, total: 400 })));
        assert!(b.step(&mut grid, &mut s).is_ok());
        assert!(b.step(&mut grid, &mut s).is_err());
    }
}
