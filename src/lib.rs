pub mod board;
pub mod chess;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod move_gen;
pub mod movelist;
pub mod r#move;
pub mod rules;
pub mod shogi;
pub mod square;
pub mod sudoku;
pub mod xiangqi;

pub use constants::{Player, Variant};
pub use error::{DropViolation, GameError, GameResult, SudokuError};
pub use game::{new_game, Game};
pub use movelist::MoveList;
pub use rules::{Rules, Status};
pub use square::Square;
pub use sudoku::{generate_puzzle, validate_placement, Difficulty, Puzzle, SudokuGrid};
