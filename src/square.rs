//! Board coordinates.

use std::fmt;

/// A (row, col) coordinate. Row 0 is the top of the printed board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the square `(dr, dc)` away, or `None` when it falls off a
    /// `rows` x `cols` board.
    pub fn offset(self, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Square> {
        let r = self.row as isize + dr;
        let c = self.col as isize + dc;
        if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
            return None;
        }
        Some(Square::new(r as usize, c as usize))
    }

    pub fn in_bounds(self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Algebraic-style name on a board with `rows` ranks: file letter plus
    /// rank number counted from the bottom (`a1` is the bottom-left corner).
    pub fn to_coord(self, rows: usize) -> String {
        format!("{}{}", (b'a' + self.col as u8) as char, rows - self.row)
    }

    /// Parses the output of [`Square::to_coord`].
    pub fn from_coord(s: &str, rows: usize, cols: usize) -> Option<Square> {
        let mut chars = s.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: usize = chars.as_str().parse().ok()?;
        let col = (file as u8 - b'a') as usize;
        if rank == 0 || rank > rows || col >= cols {
            return None;
        }
        Some(Square::new(rows - rank, col))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_respects_bounds() {
        let sq = Square::new(0, 0);
        assert_eq!(sq.offset(1, 2, 8, 8), Some(Square::new(1, 2)));
        assert_eq!(sq.offset(-1, 0, 8, 8), None);
        assert_eq!(Square::new(9, 8).offset(1, 0, 10, 9), None);
    }

    #[test]
    fn test_coord_names() {
        assert_eq!(Square::new(6, 4).to_coord(8), "e2");
        assert_eq!(Square::from_coord("e4", 8, 8), Some(Square::new(4, 4)));
        assert_eq!(Square::from_coord("a10", 10, 9), Some(Square::new(0, 0)));
        assert_eq!(Square::from_coord("j1", 10, 9), None);
        assert_eq!(Square::from_coord("a0", 8, 8), None);
    }
}
