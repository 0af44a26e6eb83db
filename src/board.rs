//! The shared board representation for all three games.

use crate::constants::Player;
use crate::error::GameError;
use crate::square::Square;
use std::fmt;

/// A closed set of piece kinds for one game.
pub trait PieceKind: Copy + Eq + fmt::Debug {
    /// The king or general. Its square is cached by the board.
    fn is_royal(self) -> bool;

    /// Upper-case layout letter.
    fn to_char(self) -> char;

    /// Parses an upper-case layout letter.
    fn from_char(c: char) -> Option<Self>;
}

/// A piece record. The board owns these exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<K> {
    pub kind: K,
    pub owner: Player,
    /// Chess/xiangqi: set once the piece has left its starting square.
    pub moved: bool,
    /// Shogi only.
    pub promoted: bool,
}

impl<K: PieceKind> Piece<K> {
    pub fn new(kind: K, owner: Player) -> Self {
        Self {
            kind,
            owner,
            moved: false,
            promoted: false,
        }
    }

    /// Layout letter: upper case for South, lower case for North.
    pub fn to_fen_char(self) -> char {
        let c = self.kind.to_char();
        match self.owner {
            Player::South => c,
            Player::North => c.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = K::from_char(c.to_ascii_uppercase())?;
        let owner = if c.is_ascii_uppercase() {
            Player::South
        } else {
            Player::North
        };
        Some(Piece::new(kind, owner))
    }
}

/// A fixed-size grid of optional pieces plus a cache of each side's royal
/// square.
///
/// `put` and `take` are the only ways to add or remove pieces, and both keep
/// the royal cache in sync, so any symmetric sequence of them restores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<K> {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Piece<K>>>,
    royals: [Option<Square>; 2],
}

impl<K: PieceKind> Board<K> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            royals: [None; 2],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, sq: Square) -> bool {
        sq.in_bounds(self.rows, self.cols)
    }

    fn idx(&self, sq: Square) -> usize {
        sq.row * self.cols + sq.col
    }

    /// The piece on `sq`; `None` for empty or off-board squares.
    pub fn get(&self, sq: Square) -> Option<Piece<K>> {
        if !self.contains(sq) {
            return None;
        }
        self.cells[self.idx(sq)]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Places `piece` on `sq`, returning whatever stood there.
    pub fn put(&mut self, sq: Square, piece: Piece<K>) -> Option<Piece<K>> {
        let previous = self.take(sq);
        let i = self.idx(sq);
        self.cells[i] = Some(piece);
        if piece.kind.is_royal() {
            self.royals[piece.owner.idx()] = Some(sq);
        }
        previous
    }

    /// Removes and returns the piece on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece<K>> {
        if !self.contains(sq) {
            return None;
        }
        let i = self.idx(sq);
        let piece = self.cells[i].take()?;
        if piece.kind.is_royal() && self.royals[piece.owner.idx()] == Some(sq) {
            self.royals[piece.owner.idx()] = None;
        }
        Some(piece)
    }

    /// Cached square of `player`'s king or general.
    pub fn royal(&self, player: Player) -> Option<Square> {
        self.royals[player.idx()]
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |i| Square::new(i / cols, i % cols))
    }

    /// All pieces owned by `player`, in row-major order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece<K>)> + '_ {
        self.squares()
            .filter_map(move |sq| self.get(sq).filter(|p| p.owner == player).map(|p| (sq, p)))
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Builds a board from a FEN-like placement string: ranks from row 0
    /// separated by `/`, digits for runs of empty squares, upper case for
    /// South, lower case for North, and a `+` prefix for promoted pieces.
    /// Every piece starts with `moved == false`.
    pub fn from_layout(layout: &str, rows: usize, cols: usize) -> Result<Self, GameError> {
        let mut board = Board::new(rows, cols);
        let ranks: Vec<&str> = layout.split('/').collect();
        if ranks.len() != rows {
            return Err(GameError::InvalidLayout(format!(
                "expected {} ranks, found {}",
                rows,
                ranks.len()
            )));
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;
            let mut promoted = false;
            for ch in rank.chars() {
                if ch == '+' {
                    promoted = true;
                } else if let Some(digit) = ch.to_digit(10) {
                    col += digit as usize;
                } else {
                    let mut piece = Piece::from_fen_char(ch).ok_or_else(|| {
                        GameError::InvalidLayout(format!("unknown piece letter '{}'", ch))
                    })?;
                    if col >= cols {
                        return Err(GameError::InvalidLayout(format!("rank {} is too long", row)));
                    }
                    piece.promoted = promoted;
                    promoted = false;
                    board.put(Square::new(row, col), piece);
                    col += 1;
                }
            }
            if col != cols {
                return Err(GameError::InvalidLayout(format!(
                    "rank {} covers {} files instead of {}",
                    row, col, cols
                )));
            }
        }
        Ok(board)
    }

    pub fn to_layout(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for r in 0..self.rows {
            let mut empty_count = 0;
            for c in 0..self.cols {
                match self.get(Square::new(r, c)) {
                    None => empty_count += 1,
                    Some(piece) => {
                        if empty_count > 0 {
                            out.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        if piece.promoted {
                            out.push('+');
                        }
                        out.push(piece.to_fen_char());
                    }
                }
            }
            if empty_count > 0 {
                out.push_str(&empty_count.to_string());
            }
            if r + 1 < self.rows {
                out.push('/');
            }
        }
        out
    }
}

impl<K: PieceKind> fmt::Display for Board<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border: String = "-".repeat(self.cols * 3 + 1);
        writeln!(f, "    +{}+", border)?;
        for r in 0..self.rows {
            write!(f, "{:>3} | ", self.rows - r)?;
            for c in 0..self.cols {
                match self.get(Square::new(r, c)) {
                    Some(piece) if piece.promoted => write!(f, "+{} ", piece.to_fen_char())?,
                    Some(piece) => write!(f, " {} ", piece.to_fen_char())?,
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "    +{}+", border)?;
        write!(f, "      ")?;
        for c in 0..self.cols {
            write!(f, " {} ", (b'a' + c as u8) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toy {
        King,
        Pawn,
    }

    impl PieceKind for Toy {
        fn is_royal(self) -> bool {
            self == Toy::King
        }
        fn to_char(self) -> char {
            match self {
                Toy::King => 'K',
                Toy::Pawn => 'P',
            }
        }
        fn from_char(c: char) -> Option<Self> {
            match c {
                'K' => Some(Toy::King),
                'P' => Some(Toy::Pawn),
                _ => None,
            }
        }
    }

    #[test]
    fn test_royal_cache_follows_put_and_take() {
        let mut board: Board<Toy> = Board::new(3, 3);
        let from = Square::new(2, 1);
        let to = Square::new(1, 1);
        board.put(from, Piece::new(Toy::King, Player::South));
        assert_eq!(board.royal(Player::South), Some(from));

        let king = board.take(from).unwrap();
        assert_eq!(board.royal(Player::South), None);
        board.put(to, king);
        assert_eq!(board.royal(Player::South), Some(to));
        assert_eq!(board.royal(Player::North), None);
    }

    #[test]
    fn test_layout_round_trip() {
        let layout = "1k1/+p2/1K1";
        let board: Board<Toy> = Board::from_layout(layout, 3, 3).unwrap();
        assert_eq!(board.to_layout(), layout);
        assert!(board.get(Square::new(1, 0)).unwrap().promoted);
        assert_eq!(board.royal(Player::North), Some(Square::new(0, 1)));
        assert_eq!(board.piece_count(), 3);
    }

    #[test]
    fn test_bad_layout_is_rejected() {
        assert!(Board::<Toy>::from_layout("3/3", 3, 3).is_err());
        assert!(Board::<Toy>::from_layout("4/3/3", 3, 3).is_err());
        assert!(Board::<Toy>::from_layout("x2/3/3", 3, 3).is_err());
    }
}
