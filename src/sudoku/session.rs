//! A player's pass through one puzzle.

use super::generator::Puzzle;
use super::grid::{validate_placement, SudokuGrid};
use crate::error::SudokuError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// Outcome of entering a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Valid,
    /// Kept on the grid, but it clashes with its row, column or block.
    Conflict,
    Cleared,
}

#[derive(Debug, Clone)]
pub struct SudokuSession {
    puzzle: Puzzle,
    grid: SudokuGrid,
    /// Givens plus cells revealed by hints.
    locked: Vec<bool>,
    moves: u32,
    errors: u32,
    started: Instant,
    /// Set once the grid matches the solution.
    solved_after: Option<Duration>,
}

impl SudokuSession {
    pub fn new(puzzle: Puzzle) -> Self {
        let grid = puzzle.puzzle.clone();
        let locked = grid.cells().iter().map(|&d| d != 0).collect();
        Self {
            puzzle,
            grid,
            locked,
            moves: 0,
            errors: 0,
            started: Instant::now(),
            solved_after: None,
        }
    }

    pub fn grid(&self) -> &SudokuGrid {
        &self.grid
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Time spent on the puzzle; stops counting once it is solved.
    pub fn elapsed(&self) -> Duration {
        self.solved_after.unwrap_or_else(|| self.started.elapsed())
    }

    fn stop_clock_if_solved(&mut self) {
        if self.solved_after.is_none() && self.check() {
            self.solved_after = Some(self.started.elapsed());
        }
    }

    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        row < self.grid.size() && col < self.grid.size() && self.locked[self.grid.index(row, col)]
    }

    fn editable(&self, row: usize, col: usize) -> Result<(), SudokuError> {
        let n = self.grid.size();
        if row >= n || col >= n {
            return Err(SudokuError::OutOfBounds { row, col });
        }
        if self.locked[self.grid.index(row, col)] {
            return Err(SudokuError::GivenCell { row, col });
        }
        Ok(())
    }

    /// Writes `digit` into an open cell; 0 clears it. A clashing digit still
    /// lands on the grid and counts as an error.
    pub fn enter(&mut self, row: usize, col: usize, digit: u8) -> Result<Entry, SudokuError> {
        self.editable(row, col)?;
        if digit == 0 {
            self.grid.set(row, col, 0)?;
            return Ok(Entry::Cleared);
        }
        if digit as usize > self.grid.size() {
            return Err(SudokuError::InvalidDigit {
                digit,
                size: self.grid.size(),
            });
        }
        let valid = validate_placement(&self.grid, row, col, digit);
        self.grid.set(row, col, digit)?;
        if valid {
            self.moves += 1;
            self.stop_clock_if_solved();
            Ok(Entry::Valid)
        } else {
            self.errors += 1;
            Ok(Entry::Conflict)
        }
    }

    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), SudokuError> {
        self.enter(row, col, 0).map(|_| ())
    }

    /// Reveals one random empty cell from the solution and locks it.
    pub fn hint(&mut self) -> Option<(usize, usize, u8)> {
        self.hint_with(&mut rand::thread_rng())
    }

    pub fn hint_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize, u8)> {
        let open: Vec<(usize, usize)> = self
            .grid
            .empty_cells()
            .into_iter()
            .filter(|&(r, c)| !self.is_locked(r, c))
            .collect();
        let &(row, col) = open.choose(rng)?;
        let digit = self.puzzle.solution.get(row, col)?;
        self.grid.set(row, col, digit).ok()?;
        let i = self.grid.index(row, col);
        self.locked[i] = true;
        self.moves += 1;
        self.stop_clock_if_solved();
        Some((row, col, digit))
    }

    /// Replaces the grid with the full solution and locks every cell.
    pub fn reveal_solution(&mut self) {
        self.grid = self.puzzle.solution.clone();
        self.locked.iter_mut().for_each(|l| *l = true);
        self.stop_clock_if_solved();
    }

    pub fn is_filled(&self) -> bool {
        self.grid.is_full()
    }

    /// True when the grid matches the stored solution.
    pub fn check(&self) -> bool {
        self.grid == self.puzzle.solution
    }
}
