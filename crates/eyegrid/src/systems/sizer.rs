//! Responsive grid sizer.
//!
//! Picks the cell size and column count so the phrase mask fits the viewport.
//! Every mask column needs two grid columns, every mask row one grid row.

use crate::api::config::SceneConfig;
use crate::systems::mask::PhraseMask;

/// Result of sizing the grid for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFit {
    /// Edge length of one eye cell in pixels.
    pub cell_px: u32,
    /// Column count; always even and at least 2.
    pub cols: u32,
    /// Row count from the usable height; at least 2.
    pub rows: u32,
    /// Column pairs reserved as margin on each side of the grid.
    pub side_pairs: u32,
    /// Whether both the column and row requirements were met.
    pub fits: bool,
}

/// Columns for a cell size, forced even and at least 2.
fn cols_for(viewport_width: f32, px: u32, side_pairs: u32) -> u32 {
    let usable = (viewport_width - (2 * side_pairs * px) as f32).max(0.0);
    let cols = (usable / px as f32).floor() as u32;
    (cols - cols % 2).max(2)
}

fn rows_for(usable_height: f32, px: u32) -> u32 {
    ((usable_height.max(0.0) / px as f32).floor() as u32).max(2)
}

/// Size the grid so `mask` fits in `viewport_width` × `usable_height`.
///
/// Side-margin pair counts are tried widest first; within each, cell sizes go
/// from the largest that could possibly fit the columns down to the floor.
/// The first candidate that fits both columns and rows wins. Otherwise the
/// best effort is kept: among candidates that fit the columns, most rows then
/// largest cell; if none fit the columns, the same ordering over everything.
/// Never fails.
pub fn auto_size_eyes(viewport_width: f32, usable_height: f32, mask: &PhraseMask, config: &SceneConfig) -> GridFit {
    let required_cols = (mask.cols * 2) as u32;
    let required_rows = mask.rows as u32;
    let floor = config.px_floor(viewport_width).max(1);
    let cap = config.eye_px_max.max(floor);

    let mut best_cols_ok: Option<GridFit> = None;
    let mut best_any: Option<GridFit> = None;
    let better = |a: &GridFit, b: &Option<GridFit>| match b {
        None => true,
        Some(b) => (a.rows, a.cell_px) > (b.rows, b.cell_px),
    };

    let side_options: &[u32] = match config.side_pairs_for(viewport_width) {
        [] => &[0u32][..],
        s => s,
    };

    for &side_pairs in side_options {
        let target_cols = (required_cols + 2 * side_pairs).max(1);
        let start = ((viewport_width.max(0.0) / target_cols as f32).floor() as u32).clamp(floor, cap);

        for px in (floor..=start).rev() {
            let cols = cols_for(viewport_width, px, side_pairs);
            let rows = rows_for(usable_height, px);
            let cols_ok = cols >= required_cols;
            let rows_ok = rows >= required_rows;
            let candidate = GridFit { cell_px: px, cols, rows, side_pairs, fits: cols_ok && rows_ok };

            if candidate.fits {
                log::debug!(
                    "sizer: {}px × {} cols × {} rows (side pairs {})",
                    px, cols, rows, side_pairs
                );
                return candidate;
            }
            if cols_ok && better(&candidate, &best_cols_ok) {
                best_cols_ok = Some(candidate);
            }
            if better(&candidate, &best_any) {
                best_any = Some(candidate);
            }
        }
    }

    let fallback = best_cols_ok.or(best_any).unwrap_or(GridFit {
        cell_px: floor,
        cols: cols_for(viewport_width, floor, 0),
        rows: rows_for(usable_height, floor),
        side_pairs: 0,
        fits: false,
    });
    log::warn!(
        "sizer: phrase ({}×{}) does not fit {}×{}; using {}px × {} cols × {} rows",
        required_cols, required_rows, viewport_width, usable_height,
        fallback.cell_px, fallback.cols, fallback.rows
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::mask::{phrase_mask_for_viewport, Mask};

    fn mask_of(rows: usize, cols: usize) -> Mask {
        Mask::new(rows, cols)
    }

    #[test]
    fn wide_viewport_example() {
        let cfg = SceneConfig::default();
        let fit = auto_size_eyes(1000.0, 2000.0, &mask_of(5, 20), &cfg);
        assert!(fit.fits);
        assert!(fit.cols >= 40);
        // 2 side pairs: 1000 / (40 + 4) = 22
        assert_eq!(fit.cell_px, 22);
        assert_eq!(fit.side_pairs, 2);
        assert!(fit.cols * fit.cell_px + 4 * fit.cell_px <= 1000);
        // one pixel bigger would not fit the columns
        assert!(cols_for(1000.0, 23, 2) < 40);
    }

    #[test]
    fn always_even_and_within_bounds() {
        let cfg = SceneConfig::default();
        let masks = [mask_of(11, 33), mask_of(23, 15), mask_of(5, 3)];
        for w in [1.0_f32, 2.0, 13.0, 99.0, 320.0, 375.0, 700.0, 701.0, 1024.0, 1920.0, 3840.0] {
            for h in [0.0_f32, 50.0, 600.0, 1200.0] {
                for m in &masks {
                    let fit = auto_size_eyes(w, h, m, &cfg);
                    assert_eq!(fit.cols % 2, 0, "odd cols at {}×{}", w, h);
                    assert!(fit.cols >= 2);
                    assert!(fit.rows >= 2);
                    let floor = cfg.px_floor(w);
                    assert!(
                        fit.cell_px >= floor && fit.cell_px <= cfg.eye_px_max,
                        "size {} outside [{}, {}] at width {}", fit.cell_px, floor, cfg.eye_px_max, w
                    );
                }
            }
        }
    }

    #[test]
    fn rows_requirement_shrinks_cells() {
        let cfg = SceneConfig::default();
        // Width alone allows 22px, but 200px of height only gives 9 rows at that size.
        let fit = auto_size_eyes(1000.0, 200.0, &mask_of(11, 20), &cfg);
        assert!(fit.fits);
        assert!(fit.rows >= 11);
        assert_eq!(fit.cell_px, 18);
    }

    #[test]
    fn compact_viewport_uses_no_side_margin_and_lower_floor() {
        let cfg = SceneConfig::default();
        let m = phrase_mask_for_viewport(360.0, &cfg);
        let fit = auto_size_eyes(360.0, 640.0, &m, &cfg);
        assert_eq!(fit.side_pairs, 0);
        assert!(fit.fits);
        assert!(fit.cols >= 30);
        assert_eq!(fit.cell_px, 12);
    }

    #[test]
    fn best_effort_prefers_column_fit_with_most_rows() {
        let cfg = SceneConfig::default();
        // Too short for 23 rows at any size; columns are satisfiable.
        let fit = auto_size_eyes(1000.0, 100.0, &mask_of(23, 10), &cfg);
        assert!(!fit.fits);
        assert!(fit.cols >= 20);
        assert_eq!(fit.cell_px, cfg.eye_px_min, "most rows come from the smallest cells");
    }

    #[test]
    fn hopeless_width_degrades_to_floor() {
        let cfg = SceneConfig::default();
        let fit = auto_size_eyes(800.0, 800.0, &mask_of(5, 200), &cfg);
        assert!(!fit.fits);
        assert_eq!(fit.cell_px, cfg.eye_px_min);
        assert_eq!(fit.cols % 2, 0);
    }

    #[test]
    fn cap_limits_huge_viewports() {
        let cfg = SceneConfig::default();
        let fit = auto_size_eyes(10_000.0, 10_000.0, &mask_of(5, 3), &cfg);
        assert_eq!(fit.cell_px, cfg.eye_px_max);
    }
}
