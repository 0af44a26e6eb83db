//! Error types returned at the crate boundary.
//!
//! Every rejection leaves the game untouched; callers get one of these
//! instead of a partial mutation.

use crate::square::Square;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("square {0} is off the board")]
    InvalidSquare(Square),
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },
    #[error("not your turn")]
    NotYourTurn,
    #[error("game already over")]
    GameOver,
    #[error("this move may promote; a promotion choice is required")]
    PromotionChoiceRequired,
    #[error("drop rejected: {0}")]
    DropViolation(DropViolation),
    #[error("{0} is not supported in this game")]
    UnsupportedOperation(&'static str),
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
}

/// Why a shogi drop was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropViolation {
    #[error("no such piece in hand")]
    NotInHand,
    #[error("target square is occupied")]
    Occupied,
    #[error("file already holds an unpromoted pawn of the same side")]
    TwoPawns,
    #[error("a pawn drop may not deliver checkmate")]
    PawnDropMate,
    #[error("the piece would have no legal move from there")]
    DeadPiece,
    #[error("the drop leaves the own king in check")]
    LeavesKingInCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SudokuError {
    #[error("unsupported board size {0}")]
    UnsupportedSize(usize),
    #[error("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("digit {digit} is out of range for a board of size {size}")]
    InvalidDigit { digit: u8, size: usize },
    #[error("cell ({row}, {col}) is a given and cannot be changed")]
    GivenCell { row: usize, col: usize },
}

pub type GameResult<T> = Result<T, GameError>;
