//! The eye grid and the pairs it is consumed in.
//!
//! Cells are stored in row-major order: index = row * cols + col. A grid may be
//! partially populated while the incremental builder is still running; lookups
//! past the populated prefix return `None`.

use crate::api::types::CellId;
use crate::components::eye::EyeCell;

/// Two horizontally adjacent cells, or a lone cell at an odd right edge.
/// The unit of both reveal ordering and blinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub left: CellId,
    pub right: Option<CellId>,
}

impl Pair {
    pub fn new(left: CellId, right: CellId) -> Self {
        Self { left, right: Some(right) }
    }

    pub fn single(left: CellId) -> Self {
        Self { left, right: None }
    }

    /// Cells in this pair, left first.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        std::iter::once(self.left).chain(self.right)
    }

    pub fn len(&self) -> usize {
        if self.right.is_some() { 2 } else { 1 }
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// rows × cols matrix of eyes.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
    cells: Vec<EyeCell>,
}

impl Grid {
    /// Create an empty grid with room for `rows * cols` cells.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: Vec::with_capacity((rows * cols) as usize),
        }
    }

    /// Total number of cells once fully built.
    pub fn capacity(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Number of cells created so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.capacity()
    }

    /// Append the next cell in row-major order. Returns its id, or `None` if full.
    pub fn push_next(&mut self) -> Option<CellId> {
        if self.is_complete() || self.cols == 0 {
            return None;
        }
        let idx = self.cells.len() as u32;
        let id = CellId(idx);
        self.cells.push(EyeCell::new(id, idx / self.cols, idx % self.cols));
        Some(id)
    }

    /// Cell id at (row, col), if in bounds and already created.
    pub fn id_at(&self, row: i64, col: i64) -> Option<CellId> {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return None;
        }
        let idx = (row as u32 * self.cols + col as u32) as usize;
        (idx < self.cells.len()).then_some(CellId(idx as u32))
    }

    pub fn get(&self, id: CellId) -> Option<&EyeCell> {
        self.cells.get(id.index())
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut EyeCell> {
        self.cells.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EyeCell> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EyeCell> {
        self.cells.iter_mut()
    }

    pub fn highlighted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.highlighted).count()
    }

    /// Drop every cell. Dimensions are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_fills_row_major() {
        let mut grid = Grid::new(2, 4);
        for _ in 0..6 {
            grid.push_next();
        }
        let c = grid.get(CellId(5)).unwrap();
        assert_eq!((c.row, c.col), (1, 1));
        assert!(!grid.is_complete());
        grid.push_next();
        grid.push_next();
        assert!(grid.is_complete());
        assert!(grid.push_next().is_none());
    }

    #[test]
    fn id_at_respects_bounds_and_progress() {
        let mut grid = Grid::new(3, 2);
        grid.push_next();
        grid.push_next();
        grid.push_next();
        assert_eq!(grid.id_at(1, 0), Some(CellId(2)));
        assert_eq!(grid.id_at(1, 1), None, "not built yet");
        assert_eq!(grid.id_at(-1, 0), None);
        assert_eq!(grid.id_at(0, 2), None);
    }

    #[test]
    fn pair_iterates_cells() {
        let p = Pair::new(CellId(4), CellId(5));
        assert_eq!(p.cells().collect::<Vec<_>>(), vec![CellId(4), CellId(5)]);
        assert_eq!(p.len(), 2);
        assert_eq!(Pair::single(CellId(9)).len(), 1);
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut grid = Grid::new(2, 2);
        grid.push_next();
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.capacity(), 4);
    }
}
