//! Phrase mask builder.
//!
//! Renders phrase lines through the bitmap font into a 2D occupancy grid:
//! glyphs are concatenated left to right with gap columns between characters,
//! lines are stacked with one empty separator row and centered horizontally.

use crate::api::config::SceneConfig;
use crate::systems::glyphs::{glyph_for, is_supported, CellCode, GLYPH_ROWS};

/// A 2D grid of cell codes, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    pub rows: usize,
    pub cols: usize,
    data: Vec<CellCode>,
}

impl Mask {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![CellCode::Empty; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> CellCode {
        if row >= self.rows || col >= self.cols {
            return CellCode::Empty;
        }
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, code: CellCode) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = code;
        }
    }

    /// Iterate over every non-empty cell as (row, col, code).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, CellCode)> + '_ {
        self.data.iter().enumerate().filter(|(_, c)| c.is_set()).map(|(i, c)| (i / self.cols, i % self.cols, *c))
    }

    /// Text rendering for debugging and tests: `#` both, `<` left, `>` right, `.` empty.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push(match self.get(r, c) {
                    CellCode::Empty => '.',
                    CellCode::Both => '#',
                    CellCode::Left => '<',
                    CellCode::Right => '>',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// One line of text rendered through the font. Always `GLYPH_ROWS` tall.
pub type LineMask = Mask;

/// All phrase lines stacked and centered.
pub type PhraseMask = Mask;

/// Render a single line of text.
pub fn build_line_mask(text: &str, config: &SceneConfig) -> LineMask {
    let mut columns: Vec<[CellCode; GLYPH_ROWS]> = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if !is_supported(ch) {
            log::debug!("no glyph for {:?}, leaving it blank", ch);
        }
        let glyph = glyph_for(ch);
        for c in 0..glyph.width() {
            let mut column = [CellCode::Empty; GLYPH_ROWS];
            for (r, slot) in column.iter_mut().enumerate() {
                *slot = glyph.row(r)[c];
            }
            columns.push(column);
        }
        if chars.peek().is_some() {
            let gap = if ch == ' ' { config.mask_gap_space } else { config.mask_gap_letter };
            columns.extend(std::iter::repeat([CellCode::Empty; GLYPH_ROWS]).take(gap));
        }
    }

    let mut mask = Mask::new(GLYPH_ROWS, columns.len());
    for (c, column) in columns.iter().enumerate() {
        for (r, code) in column.iter().enumerate() {
            mask.set(r, c, *code);
        }
    }
    mask
}

/// Stack lines into one phrase mask, one blank row between lines,
/// each line centered in the widest line's width.
pub fn build_phrase_mask<S: AsRef<str>>(lines: &[S], config: &SceneConfig) -> PhraseMask {
    let masks: Vec<LineMask> = lines.iter().map(|l| build_line_mask(l.as_ref(), config)).collect();
    if masks.is_empty() {
        return Mask::default();
    }
    let rows = masks.len() * GLYPH_ROWS + (masks.len() - 1);
    let cols = masks.iter().map(|m| m.cols).max().unwrap_or(0);

    let mut phrase = Mask::new(rows, cols);
    let mut y = 0;
    for m in &masks {
        let x_off = (cols - m.cols) / 2;
        for r in 0..GLYPH_ROWS {
            for c in 0..m.cols {
                phrase.set(y + r, x_off + c, m.get(r, c));
            }
        }
        y += GLYPH_ROWS + 1;
    }
    phrase
}

/// Phrase mask for the line set selected by the viewport width.
pub fn phrase_mask_for_viewport(viewport_width: f32, config: &SceneConfig) -> PhraseMask {
    build_phrase_mask(config.lines_for(viewport_width), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SceneConfig {
        SceneConfig::default()
    }

    #[test]
    fn on_is_seven_by_five() {
        let m = build_line_mask("ON", &cfg());
        assert_eq!((m.rows, m.cols), (5, 7));
        assert!(m.to_ascii().starts_with("###.#.#\n"));
    }

    #[test]
    fn no_trailing_gap() {
        let m = build_line_mask("A", &cfg());
        assert_eq!(m.cols, 3);
    }

    #[test]
    fn unknown_characters_render_blank_not_fail() {
        let m = build_line_mask("O?", &cfg());
        assert_eq!(m.cols, 3 + 1 + 1);
        assert!((0..5).all(|r| !m.get(r, 4).is_set()));
    }

    #[test]
    fn space_gap_is_configurable() {
        let mut c = cfg();
        c.mask_gap_space = 3;
        // 'O' + letter gap + ' ' + space gap + 'O'
        assert_eq!(build_line_mask("O O", &c).cols, 3 + 1 + 1 + 3 + 3);
    }

    #[test]
    fn line_sets_have_expected_dimensions() {
        let c = cfg();
        for lines in [&c.lines_desktop, &c.lines_mobile] {
            let m = build_phrase_mask(lines, &c);
            let n = lines.len();
            assert_eq!(m.rows, n * 5 + (n - 1));
            let widest = lines.iter().map(|l| build_line_mask(l, &c).cols).max().unwrap();
            assert_eq!(m.cols, widest);
        }
        assert_eq!(build_phrase_mask(&c.lines_desktop, &c).cols, 33);
        assert_eq!(build_phrase_mask(&c.lines_mobile, &c).cols, 15);
    }

    #[test]
    fn lines_are_centered() {
        let c = cfg();
        for lines in [&c.lines_desktop, &c.lines_mobile] {
            let m = build_phrase_mask(lines, &c);
            for (li, line) in lines.iter().enumerate() {
                let lm = build_line_mask(line, &c);
                let left = (m.cols - lm.cols) / 2;
                let right = m.cols - lm.cols - left;
                assert!(right.abs_diff(left) <= 1, "line {:?} padded {} / {}", line, left, right);
                // the line's content sits exactly at that offset
                for r in 0..5 {
                    for col in 0..lm.cols {
                        assert_eq!(m.get(li * 6 + r, left + col), lm.get(r, col));
                    }
                }
            }
        }
    }

    #[test]
    fn separator_rows_are_empty() {
        let c = cfg();
        let m = build_phrase_mask(&c.lines_mobile, &c);
        for sep in [5, 11, 17] {
            assert!((0..m.cols).all(|c| !m.get(sep, c).is_set()), "row {} should be blank", sep);
        }
    }

    #[test]
    fn viewport_picks_line_set() {
        let c = cfg();
        assert_eq!(phrase_mask_for_viewport(400.0, &c).rows, 23);
        assert_eq!(phrase_mask_for_viewport(1400.0, &c).rows, 11);
    }

    #[test]
    fn empty_line_set_gives_empty_mask() {
        let m = build_phrase_mask::<&str>(&[], &cfg());
        assert_eq!((m.rows, m.cols), (0, 0));
        assert_eq!(m.occupied().count(), 0);
    }
}
