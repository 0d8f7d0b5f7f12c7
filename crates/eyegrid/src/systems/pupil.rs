//! Pupil motion.
//!
//! Plain eyes look toward the viewport center; that only depends on layout, so
//! it is applied once per build. Highlighted eyes follow the focal point and
//! are updated every frame, each with a slight depth factor so neighbours
//! don't move in lockstep.

use glam::Vec2;
use crate::api::types::Viewport;
use crate::components::eye::{EyeCell, MotionRange};
use crate::components::grid::Grid;
use crate::renderer::traits::{Surface, SurfaceError};

/// Parallax factor for the cell at `index`: 0.96, 0.98, 1.00, 1.02, 1.04, repeating.
pub fn depth_factor(index: usize) -> f32 {
    0.96 + (index % 5) as f32 * 0.02
}

/// Offset of a plain eye looking at the viewport center.
pub fn center_gaze_offset(eye_center: Vec2, viewport: &Viewport, range: MotionRange) -> Vec2 {
    let half_w = if viewport.width > 0.0 { viewport.width / 2.0 } else { 1.0 };
    let half_h = if viewport.height > 0.0 { viewport.height / 2.0 } else { 1.0 };
    let d = viewport.center() - eye_center;
    let n = Vec2::new((d.x / half_w).clamp(-1.0, 1.0), (d.y / half_h).clamp(-1.0, 1.0));
    n * range.as_vec2()
}

/// Offset of a highlighted eye following `focal` (normalized to [0,1]²).
pub fn focal_offset(focal: Vec2, index: usize, range: MotionRange) -> Vec2 {
    let n = focal.clamp(Vec2::ZERO, Vec2::ONE) * 2.0 - Vec2::ONE;
    range.clamp(n * range.as_vec2() * depth_factor(index))
}

/// Measure every cell once and cache its motion range and center.
pub fn precompute_metrics<S: Surface>(grid: &mut Grid, surface: &S) -> Result<(), SurfaceError> {
    for cell in grid.iter_mut() {
        let rect = surface.measure(cell.id)?;
        cell.metrics = Some(rect.motion_range());
        cell.center = rect.center();
    }
    Ok(())
}

/// Drop all cached metrics.
pub fn invalidate_metrics(grid: &mut Grid) {
    for cell in grid.iter_mut() {
        cell.metrics = None;
    }
}

/// Fill in metrics for a cell that somehow missed the precompute pass.
fn ensure_metrics<S: Surface>(cell: &mut EyeCell, surface: &S) -> Result<MotionRange, SurfaceError> {
    if let Some(m) = cell.metrics {
        return Ok(m);
    }
    let rect = surface.measure(cell.id)?;
    let m = rect.motion_range();
    cell.metrics = Some(m);
    cell.center = rect.center();
    Ok(m)
}

/// Point every plain eye toward the viewport center.
pub fn position_toward_center<S: Surface>(grid: &mut Grid, viewport: &Viewport, surface: &mut S) -> Result<(), SurfaceError> {
    for cell in grid.iter_mut().filter(|c| !c.highlighted) {
        let range = ensure_metrics(cell, &*surface)?;
        let offset = center_gaze_offset(cell.center, viewport, range);
        cell.pupil = offset;
        surface.set_pupil(cell.id, offset)?;
    }
    Ok(())
}

/// Point every highlighted eye at the focal point.
pub fn place_pupils<S: Surface>(grid: &mut Grid, focal: Vec2, surface: &mut S) -> Result<(), SurfaceError> {
    for cell in grid.iter_mut().filter(|c| c.highlighted) {
        let range = ensure_metrics(cell, &*surface)?;
        let offset = focal_offset(focal, cell.id.index(), range);
        if offset != cell.pupil {
            cell.pupil = offset;
            surface.set_pupil(cell.id, offset)?;
        }
    }
    Ok(())
}
