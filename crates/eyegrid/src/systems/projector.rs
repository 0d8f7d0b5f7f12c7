//! Mask projection: lights the phrase on the grid and cuts the grid into pairs.

use crate::components::grid::{Grid, Pair};
use crate::systems::mask::PhraseMask;

/// Top-left grid position where mask cell (0, 0) lands.
///
/// Free columns are split into pairs and the left half of those pairs goes
/// before the text; an odd leftover column is ignored. Vertically the mask is
/// centered in the rows. Both offsets are zero when the mask is larger than the grid.
pub fn mask_origin(grid: &Grid, mask: &PhraseMask) -> (i64, i64) {
    let text_cols = (mask.cols * 2) as i64;
    let free_cols = (grid.cols as i64 - text_cols).max(0);
    let free_pairs = free_cols / 2;
    let x0 = (free_pairs / 2) * 2;
    let y0 = ((grid.rows as i64 - mask.rows as i64) / 2).max(0);
    (x0, y0)
}

/// Mark the phrase's cells highlighted and partition the grid into pairs.
///
/// Stale highlights from a previous projection are cleared first. Mask cells
/// that project outside the grid are skipped. Returns the pairs row by row.
pub fn apply_mask_pairs(grid: &mut Grid, mask: &PhraseMask) -> Vec<Pair> {
    for cell in grid.iter_mut() {
        cell.highlighted = false;
    }

    let (x0, y0) = mask_origin(grid, mask);
    for (r, c, code) in mask.occupied() {
        let row = y0 + r as i64;
        let left = x0 + c as i64 * 2;
        if code.lights_left() {
            if let Some(id) = grid.id_at(row, left) {
                if let Some(cell) = grid.get_mut(id) {
                    cell.highlighted = true;
                }
            }
        }
        if code.lights_right() {
            if let Some(id) = grid.id_at(row, left + 1) {
                if let Some(cell) = grid.get_mut(id) {
                    cell.highlighted = true;
                }
            }
        }
    }

    partition_pairs(grid)
}

/// Split every row into (col, col + 1) pairs. An odd column count leaves a
/// singleton at the end of each row.
pub fn partition_pairs(grid: &Grid) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(grid.capacity() / 2 + grid.rows as usize);
    for row in 0..grid.rows as i64 {
        for col in (0..grid.cols as i64).step_by(2) {
            match (grid.id_at(row, col), grid.id_at(row, col + 1)) {
                (Some(a), Some(b)) => pairs.push(Pair::new(a, b)),
                (Some(a), None) => pairs.push(Pair::single(a)),
                _ => {}
            }
        }
    }
    pairs
}
