//! In-memory surface.
//!
//! Lays cells out on an ideal pixel grid (side margin, then `cell_px` squares
//! starting below the header) and records every write, so the whole pipeline
//! can run without a browser.

use glam::Vec2;
use crate::api::types::{CellId, Viewport};
use crate::components::eye::EyeCell;
use crate::extensions::easing::Easing;
use crate::renderer::traits::{EyeRect, Surface, SurfaceError};
use crate::systems::sizer::GridFit;

/// What the headless surface knows about one node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlessCell {
    pub row: u32,
    pub col: u32,
    pub highlighted: bool,
    pub revealed: bool,
    pub pupil: Vec2,
    pub lid: f32,
    pub lid_duration_ms: f64,
    pub lid_easing: Easing,
    /// Number of lid writes that closed the lid.
    pub closes: u32,
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub viewport: Viewport,
    pub pupil_ratio: f32,
    pub fit: Option<GridFit>,
    pub cells: Vec<HeadlessCell>,
    pub loader_hidden: bool,
    /// Number of `create_cells` calls, i.e. build batches.
    pub batches: usize,
    /// When set, `create_cells` fails once this many cells exist.
    pub fail_after: Option<usize>,
}

impl HeadlessSurface {
    pub fn new(viewport: Viewport, pupil_ratio: f32) -> Self {
        Self {
            viewport,
            pupil_ratio,
            fit: None,
            cells: Vec::new(),
            loader_hidden: false,
            batches: 0,
            fail_after: None,
        }
    }

    /// Make cell creation fail once `n` cells exist.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    fn cell(&self, id: CellId) -> Result<&HeadlessCell, SurfaceError> {
        self.cells.get(id.index()).ok_or(SurfaceError::MissingCell(id))
    }

    fn cell_mut(&mut self, id: CellId) -> Result<&mut HeadlessCell, SurfaceError> {
        self.cells.get_mut(id.index()).ok_or(SurfaceError::MissingCell(id))
    }

    /// Total lid closes across all cells.
    pub fn total_closes(&self) -> u32 {
        self.cells.iter().map(|c| c.closes).sum()
    }
}

impl Surface for HeadlessSurface {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.cells.clear();
        self.batches = 0;
        Ok(())
    }

    fn set_layout(&mut self, fit: &GridFit) -> Result<(), SurfaceError> {
        self.fit = Some(*fit);
        Ok(())
    }

    fn create_cells(&mut self, cells: &[EyeCell]) -> Result<(), SurfaceError> {
        if let Some(limit) = self.fail_after {
            if self.cells.len() + cells.len() > limit {
                return Err(SurfaceError::Host(format!("refusing to grow past {limit} cells")));
            }
        }
        self.batches += 1;
        self.cells.extend(cells.iter().map(|c| HeadlessCell {
            row: c.row,
            col: c.col,
            ..HeadlessCell::default()
        }));
        Ok(())
    }

    fn measure(&self, id: CellId) -> Result<EyeRect, SurfaceError> {
        let cell = self.cell(id)?;
        let fit = self.fit.ok_or_else(|| SurfaceError::Host("measured before layout".into()))?;
        let px = fit.cell_px as f32;
        let origin = Vec2::new(
            (fit.side_pairs * 2 + cell.col) as f32 * px,
            self.viewport.header_height + cell.row as f32 * px,
        );
        Ok(EyeRect {
            origin,
            size: Vec2::splat(px),
            pupil: Vec2::splat(px * self.pupil_ratio),
        })
    }

    fn set_highlighted(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError> {
        self.cell_mut(id)?.highlighted = on;
        Ok(())
    }

    fn set_revealed(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError> {
        self.cell_mut(id)?.revealed = on;
        Ok(())
    }

    fn set_pupil(&mut self, id: CellId, offset: Vec2) -> Result<(), SurfaceError> {
        self.cell_mut(id)?.pupil = offset;
        Ok(())
    }

    fn set_lid(&mut self, id: CellId, coverage: f32, duration_ms: f64, easing: Easing) -> Result<(), SurfaceError> {
        let cell = self.cell_mut(id)?;
        if coverage > cell.lid {
            cell.closes += 1;
        }
        cell.lid = coverage;
        cell.lid_duration_ms = duration_ms;
        cell.lid_easing = easing;
        Ok(())
    }

    fn hide_loader(&mut self) {
        self.loader_hidden = true;
    }

    fn show_loader(&mut self) {
        self.loader_hidden = false;
    }
}
