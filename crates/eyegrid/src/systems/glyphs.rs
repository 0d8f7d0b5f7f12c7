//! 5-row bitmap font used to spell the phrase.
//!
//! Each glyph column maps to one pair of grid columns. A cell code says which
//! half of that pair is lit, which lets diagonal strokes (the `N`) sit at
//! half-column resolution.

/// Occupancy of one mask cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CellCode {
    #[default]
    Empty = 0,
    /// Both sub-cells lit.
    Both = 1,
    /// Left sub-cell only.
    Left = 2,
    /// Right sub-cell only.
    Right = 3,
}

impl CellCode {
    pub fn is_set(self) -> bool {
        self != CellCode::Empty
    }

    pub fn lights_left(self) -> bool {
        matches!(self, CellCode::Both | CellCode::Left)
    }

    pub fn lights_right(self) -> bool {
        matches!(self, CellCode::Both | CellCode::Right)
    }

    /// Number of grid sub-cells this code lights.
    pub fn weight(self) -> usize {
        self.lights_left() as usize + self.lights_right() as usize
    }
}

/// Rows in every glyph.
pub const GLYPH_ROWS: usize = 5;

/// Fixed-height bitmap for one character.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    pub ch: char,
    rows: [&'static [CellCode]; GLYPH_ROWS],
}

impl Glyph {
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn row(&self, r: usize) -> &'static [CellCode] {
        self.rows[r]
    }
}

use CellCode::{Both as X, Empty as O, Left as L, Right as R};

const FONT: &[Glyph] = &[
    Glyph { ch: 'A', rows: [&[X, X, X], &[X, O, X], &[X, X, X], &[X, O, X], &[X, O, X]] },
    Glyph { ch: 'L', rows: [&[X, O, O], &[X, O, O], &[X, O, O], &[X, O, O], &[X, X, X]] },
    Glyph { ch: 'E', rows: [&[X, X, X], &[X, O, O], &[X, X, O], &[X, O, O], &[X, X, X]] },
    Glyph { ch: 'Y', rows: [&[X, O, X], &[O, X, O], &[O, X, O], &[O, X, O], &[O, X, O]] },
    Glyph { ch: 'S', rows: [&[X, X, X], &[X, O, O], &[X, X, X], &[O, O, X], &[X, X, X]] },
    Glyph { ch: 'O', rows: [&[X, X, X], &[X, O, X], &[X, O, X], &[X, O, X], &[X, X, X]] },
    Glyph { ch: 'N', rows: [&[X, O, X], &[X, L, X], &[X, X, X], &[X, R, X], &[X, O, X]] },
    Glyph { ch: 'U', rows: [&[X, O, X], &[X, O, X], &[X, O, X], &[X, O, X], &[X, X, X]] },
    Glyph { ch: ' ', rows: [&[O], &[O], &[O], &[O], &[O]] },
];

/// The blank glyph, used for spaces and for any character the font lacks.
pub fn blank() -> &'static Glyph {
    &FONT[FONT.len() - 1]
}

/// Look up a glyph. Lowercase letters use their uppercase form;
/// anything unsupported renders blank.
pub fn glyph_for(ch: char) -> &'static Glyph {
    let ch = ch.to_ascii_uppercase();
    FONT.iter().find(|g| g.ch == ch).unwrap_or_else(blank)
}

pub fn is_supported(ch: char) -> bool {
    let ch = ch.to_ascii_uppercase();
    FONT.iter().any(|g| g.ch == ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_glyph_is_rectangular() {
        for g in FONT {
            let w = g.width();
            for r in 0..GLYPH_ROWS {
                assert_eq!(g.row(r).len(), w, "glyph '{}' row {} has ragged width", g.ch, r);
            }
        }
    }

    #[test]
    fn unknown_characters_fall_back_to_blank() {
        let g = glyph_for('#');
        assert_eq!(g.ch, ' ');
        assert_eq!(g.width(), 1);
        assert!(!is_supported('#'));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(glyph_for('n').ch, 'N');
    }

    #[test]
    fn n_uses_half_cells_for_the_diagonal() {
        let n = glyph_for('N');
        assert_eq!(n.row(1)[1], CellCode::Left);
        assert_eq!(n.row(3)[1], CellCode::Right);
    }

    #[test]
    fn code_weights() {
        assert_eq!(CellCode::Empty.weight(), 0);
        assert_eq!(CellCode::Both.weight(), 2);
        assert_eq!(CellCode::Left.weight(), 1);
        assert!(CellCode::Right.lights_right() && !CellCode::Right.lights_left());
    }
}
