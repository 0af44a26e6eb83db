//! Move candidates and history records.

use crate::board::Piece;
use crate::square::Square;

/// Tag for moves that do more than relocate one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
    Drop,
}

/// A destination produced by a move generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub to: Square,
    pub special: Option<Special>,
}

impl Candidate {
    pub fn new(to: Square) -> Self {
        Self { to, special: None }
    }

    pub fn special(to: Square, special: Special) -> Self {
        Self {
            to,
            special: Some(special),
        }
    }
}

/// One executed move, holding everything needed to undo it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord<K> {
    /// The moving piece as it stood before the move (or the piece as it
    /// left the hand, for drops).
    pub piece: Piece<K>,
    /// `None` for a drop.
    pub from: Option<Square>,
    pub to: Square,
    /// The captured piece as it stood on the board.
    pub captured: Option<Piece<K>>,
    /// Where the captured piece stood; differs from `to` only for en passant.
    pub captured_at: Option<Square>,
    pub special: Option<Special>,
    /// Chess en-passant target live before this move.
    pub en_passant_before: Option<Square>,
}
