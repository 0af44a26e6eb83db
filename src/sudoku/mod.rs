//! N×N sudoku: grid, solver, generator and play session.

pub mod generator;
pub mod grid;
pub mod session;
pub mod solver;

pub use generator::{fallback_puzzle, generate_puzzle, generate_puzzle_async, generate_puzzle_with, Difficulty, Puzzle};
pub use grid::{block_dims, validate_placement, SudokuGrid};
pub use session::{Entry, SudokuSession};
pub use solver::{count_solutions, has_unique_solution, solve, SearchBudget};
