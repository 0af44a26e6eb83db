//! The N×N sudoku grid and its block geometry.

use crate::error::SudokuError;
use std::fmt;

pub const MIN_SIZE: usize = 4;
pub const MAX_SIZE: usize = 25;

/// Block geometry for an N×N grid as `(block_width, block_height)`.
///
/// The width is the largest divisor of N not above √N; sizes whose only such
/// divisor is 1 (primes) have no block layout and are rejected.
pub fn block_dims(size: usize) -> Result<(usize, usize), SudokuError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(SudokuError::UnsupportedSize(size));
    }
    let width = (1..=size)
        .take_while(|d| d * d <= size)
        .filter(|d| size % d == 0)
        .last()
        .unwrap_or(1);
    if width < 2 {
        return Err(SudokuError::UnsupportedSize(size));
    }
    Ok((width, size / width))
}

/// Digits `1..=size`, 0 for an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SudokuGrid {
    size: usize,
    block_width: usize,
    block_height: usize,
    cells: Vec<u8>,
}

impl SudokuGrid {
    /// An empty grid.
    pub fn new(size: usize) -> Result<Self, SudokuError> {
        let (block_width, block_height) = block_dims(size)?;
        Ok(Self {
            size,
            block_width,
            block_height,
            cells: vec![0; size * size],
        })
    }

    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, SudokuError> {
        let mut grid = Self::new(rows.len())?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != grid.size {
                return Err(SudokuError::UnsupportedSize(values.len()));
            }
            for (col, &digit) in values.iter().enumerate() {
                grid.set(row, col, digit)?;
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn block_width(&self) -> usize {
        self.block_width
    }

    pub fn block_height(&self) -> usize {
        self.block_height
    }

    pub(crate) fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub(crate) fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), SudokuError> {
        if row < self.size && col < self.size {
            Ok(())
        } else {
            Err(SudokuError::OutOfBounds { row, col })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.check_cell(row, col).ok().map(|_| self.cells[self.index(row, col)])
    }

    /// Writes `digit` (0 clears) without any placement check.
    pub fn set(&mut self, row: usize, col: usize, digit: u8) -> Result<(), SudokuError> {
        self.check_cell(row, col)?;
        if digit as usize > self.size {
            return Err(SudokuError::InvalidDigit { digit, size: self.size });
        }
        let i = self.index(row, col);
        self.cells[i] = digit;
        Ok(())
    }

    /// Index of the block containing (row, col), numbered row-major.
    pub fn block_of(&self, row: usize, col: usize) -> usize {
        (row / self.block_height) * (self.size / self.block_width) + col / self.block_width
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i] == 0)
            .map(|i| (i / self.size, i % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&d| d == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// No empty cells and no conflicting pair anywhere.
    pub fn is_complete(&self) -> bool {
        self.is_full() && self.conflicts().is_empty()
    }

    /// Filled cells that clash with another cell in their row, column or block.
    pub fn conflicts(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let digit = self.cells[self.index(row, col)];
                if digit != 0 && !validate_placement(self, row, col, digit) {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(|r| r.to_vec()).collect()
    }
}

/// A digit at (row, col) is valid iff no other cell in its row, column or
/// block already holds it. Out-of-range coordinates or digits are invalid.
pub fn validate_placement(grid: &SudokuGrid, row: usize, col: usize, digit: u8) -> bool {
    let n = grid.size;
    if row >= n || col >= n || digit == 0 || digit as usize > n {
        return false;
    }
    let at = |r: usize, c: usize| grid.cells[grid.index(r, c)];
    for i in 0..n {
        if i != col && at(row, i) == digit {
            return false;
        }
        if i != row && at(i, col) == digit {
            return false;
        }
    }
    let top = row - row % grid.block_height;
    let left = col - col % grid.block_width;
    for r in top..top + grid.block_height {
        for c in left..left + grid.block_width {
            if (r, c) != (row, col) && at(r, c) == digit {
                return false;
            }
        }
    }
    true
}

impl fmt::Display for SudokuGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = if self.size > 9 { 2 } else { 1 };
        for (r, row) in self.rows().enumerate() {
            if r > 0 && r % self.block_height == 0 {
                writeln!(f)?;
            }
            for (c, &digit) in row.iter().enumerate() {
                if c > 0 && c % self.block_width == 0 {
                    write!(f, " |")?;
                }
                if digit == 0 {
                    write!(f, " {:>width$}", ".", width = width)?;
                } else {
                    write!(f, " {:>width$}", digit, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
