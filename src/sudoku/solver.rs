//! Backtracking over per-row, per-column and per-block candidate bitmasks,
//! always branching on the empty cell with the fewest candidates.

use super::grid::SudokuGrid;
use crate::config::Config;
use std::time::{Duration, Instant};

/// Bounds one backtracking search by node count and an optional deadline.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    nodes_left: u64,
    deadline: Option<Instant>,
}

impl SearchBudget {
    pub fn new(max_nodes: u64, time_limit: Option<Duration>) -> Self {
        Self {
            nodes_left: max_nodes,
            deadline: time_limit.map(|t| Instant::now() + t),
        }
    }

    pub fn with_deadline(max_nodes: u64, deadline: Option<Instant>) -> Self {
        Self {
            nodes_left: max_nodes,
            deadline,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX, None)
    }

    pub fn is_exhausted(&self) -> bool {
        self.nodes_left == 0
    }

    fn spend(&mut self) -> Result<(), Exhausted> {
        if self.nodes_left == 0 {
            return Err(Exhausted);
        }
        self.nodes_left -= 1;
        // Reading the clock on every node is measurable; every 1024th is enough.
        if self.nodes_left % 1024 == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.nodes_left = 0;
                    return Err(Exhausted);
                }
            }
        }
        Ok(())
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::new(Config::default().solve_node_budget, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Exhausted;

struct Search {
    grid: SudokuGrid,
    rows: Vec<u32>,
    cols: Vec<u32>,
    blocks: Vec<u32>,
    all: u32,
}

impl Search {
    /// `None` when the givens already clash.
    fn new(grid: &SudokuGrid) -> Option<Self> {
        let n = grid.size();
        let mut search = Self {
            grid: grid.clone(),
            rows: vec![0; n],
            cols: vec![0; n],
            blocks: vec![0; n],
            all: ((1u32 << n) - 1) << 1,
        };
        for row in 0..n {
            for col in 0..n {
                let digit = grid.cells()[grid.index(row, col)];
                if digit == 0 {
                    continue;
                }
                let bit = 1u32 << digit;
                let block = grid.block_of(row, col);
                if (search.rows[row] | search.cols[col] | search.blocks[block]) & bit != 0 {
                    return None;
                }
                search.rows[row] |= bit;
                search.cols[col] |= bit;
                search.blocks[block] |= bit;
            }
        }
        Some(search)
    }

    fn candidates(&self, row: usize, col: usize) -> u32 {
        let block = self.grid.block_of(row, col);
        self.all & !(self.rows[row] | self.cols[col] | self.blocks[block])
    }

    fn toggle(&mut self, row: usize, col: usize, digit: u8) {
        let bit = 1u32 << digit;
        let block = self.grid.block_of(row, col);
        self.rows[row] ^= bit;
        self.cols[col] ^= bit;
        self.blocks[block] ^= bit;
    }

    fn place(&mut self, row: usize, col: usize, digit: u8) {
        self.toggle(row, col, digit);
        let i = self.grid.index(row, col);
        self.grid.cells_mut()[i] = digit;
    }

    fn unplace(&mut self, row: usize, col: usize, digit: u8) {
        self.toggle(row, col, digit);
        let i = self.grid.index(row, col);
        self.grid.cells_mut()[i] = 0;
    }

    /// The empty cell with the fewest candidates, or `None` when full.
    fn most_constrained(&self) -> Option<(usize, usize, u32)> {
        let n = self.grid.size();
        let mut best: Option<(usize, usize, u32)> = None;
        for row in 0..n {
            for col in 0..n {
                if self.grid.cells()[self.grid.index(row, col)] != 0 {
                    continue;
                }
                let mask = self.candidates(row, col);
                let count = mask.count_ones();
                if best.map_or(true, |(_, _, m)| count < m.count_ones()) {
                    best = Some((row, col, mask));
                    if count <= 1 {
                        return best;
                    }
                }
            }
        }
        best
    }

    /// Fills the grid depth-first, trying digits in the order `order` leaves
    /// them. Returns whether a completion was found.
    fn fill<F>(&mut self, budget: &mut SearchBudget, order: &mut F) -> Result<bool, Exhausted>
    where
        F: FnMut(&mut Vec<u8>),
    {
        budget.spend()?;
        let Some((row, col, mask)) = self.most_constrained() else {
            return Ok(true);
        };
        let mut digits = digits_of(mask);
        order(&mut digits);
        for digit in digits {
            self.place(row, col, digit);
            if self.fill(budget, order)? {
                return Ok(true);
            }
            self.unplace(row, col, digit);
        }
        Ok(false)
    }

    /// Counts completions, stopping once `limit` are found.
    fn count(&mut self, limit: usize, found: &mut usize, budget: &mut SearchBudget) -> Result<(), Exhausted> {
        budget.spend()?;
        let Some((row, col, mask)) = self.most_constrained() else {
            *found += 1;
            return Ok(());
        };
        for digit in digits_of(mask) {
            self.place(row, col, digit);
            let result = self.count(limit, found, budget);
            self.unplace(row, col, digit);
            result?;
            if *found >= limit {
                break;
            }
        }
        Ok(())
    }
}

fn digits_of(mask: u32) -> Vec<u8> {
    (1..32u8).filter(|&d| mask & (1u32 << d) != 0).collect()
}

/// First completion of `grid`, trying digits in the order `order` leaves them.
/// `None` when there is none or the budget runs out first.
pub fn fill_with<F>(grid: &SudokuGrid, budget: &mut SearchBudget, mut order: F) -> Option<SudokuGrid>
where
    F: FnMut(&mut Vec<u8>),
{
    let mut search = Search::new(grid)?;
    match search.fill(budget, &mut order) {
        Ok(true) => Some(search.grid),
        _ => None,
    }
}

pub fn solve_with_budget(grid: &SudokuGrid, budget: &mut SearchBudget) -> Option<SudokuGrid> {
    fill_with(grid, budget, |_| {})
}

/// A completion of `grid` found within the default node budget. `None` when
/// there is none or the budget runs out first; use [`solve_with_budget`] to
/// control the budget.
pub fn solve(grid: &SudokuGrid) -> Option<SudokuGrid> {
    solve_with_budget(grid, &mut SearchBudget::default())
}

/// Completions found before the search stopped, and whether that count is
/// final (the search finished or reached `limit`).
fn count_up_to(grid: &SudokuGrid, limit: usize, budget: &mut SearchBudget) -> (usize, bool) {
    let Some(mut search) = Search::new(grid) else {
        return (0, true);
    };
    let mut found = 0;
    let settled = match search.count(limit, &mut found, budget) {
        Ok(()) => true,
        Err(Exhausted) => found >= limit,
    };
    (found, settled)
}

/// Number of completions up to `limit`, or `None` if the budget ran out
/// before the answer was known.
pub fn count_solutions_with_budget(grid: &SudokuGrid, limit: usize, budget: &mut SearchBudget) -> Option<usize> {
    match count_up_to(grid, limit, budget) {
        (found, true) => Some(found),
        (_, false) => None,
    }
}

/// Number of completions, stopping at `limit`. If the default budget runs
/// out first the result is only a lower bound; call
/// [`count_solutions_with_budget`] to tell the two apart.
pub fn count_solutions(grid: &SudokuGrid, limit: usize) -> usize {
    count_up_to(grid, limit, &mut SearchBudget::default()).0
}

/// True when `grid` has exactly one completion, proven within the default budget.
pub fn has_unique_solution(grid: &SudokuGrid) -> bool {
    count_solutions_with_budget(grid, 2, &mut SearchBudget::default()) == Some(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> SudokuGrid {
        let rows: Vec<Vec<u8>> = [
            "53..7....",
            "6..195...",
            ".98....6.",
            "8...6...3",
            "4..8.3..1",
            "7...2...6",
            ".6....28.",
            "...419..5",
            "....8..79",
        ]
        .iter()
        .map(|r| r.bytes().map(|b| if b == b'.' { 0 } else { b - b'0' }).collect())
        .collect();
        SudokuGrid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_solves_classic_puzzle() {
        let solved = solve(&classic()).unwrap();
        assert!(solved.is_complete());
        assert_eq!(solved.to_rows()[0], vec![5, 3, 4, 6, 7, 8, 9, 1, 2]);
        assert!(has_unique_solution(&classic()));
    }

    #[test]
    fn test_empty_grid_has_many_solutions() {
        let empty = SudokuGrid::new(4).unwrap();
        assert_eq!(count_solutions(&empty, 2), 2);
        assert!(!has_unique_solution(&empty));
        // 4×4 sudoku has exactly 288 completed grids.
        assert_eq!(count_solutions(&empty, 1000), 288);
    }

    #[test]
    fn test_clashing_givens_have_no_solution() {
        let grid = SudokuGrid::from_rows(&[[1u8, 1, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        assert_eq!(solve(&grid), None);
        assert_eq!(count_solutions(&grid, 2), 0);
    }

    #[test]
    fn test_exhausted_budget_is_inconclusive() {
        let empty = SudokuGrid::new(9).unwrap();
        let mut budget = SearchBudget::new(3, None);
        assert_eq!(count_solutions_with_budget(&empty, 2, &mut budget), None);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_partial_count_is_not_settled() {
        let empty = SudokuGrid::new(4).unwrap();
        let (found, settled) = count_up_to(&empty, 1000, &mut SearchBudget::new(40, None));
        assert!(!settled);
        assert!(found < 288);
        assert_eq!(count_solutions_with_budget(&empty, 1000, &mut SearchBudget::new(40, None)), None);

        let (found, settled) = count_up_to(&empty, 1, &mut SearchBudget::unlimited());
        assert_eq!((found, settled), (1, true));
        assert!(solve_with_budget(&SudokuGrid::new(9).unwrap(), &mut SearchBudget::new(5, None)).is_none());
    }

    #[test]
    fn test_large_grid_fills_quickly() {
        let empty = SudokuGrid::new(16).unwrap();
        let solved = solve(&empty).unwrap();
        assert!(solved.is_complete());
    }
}
