//! Puzzle generation: random fill, then carve while the puzzle stays unique.

use super::grid::{block_dims, SudokuGrid};
use super::solver::{count_solutions_with_budget, fill_with, SearchBudget};
use crate::config::Config;
use crate::error::SudokuError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Share of cells emptied.
    pub fn removal_ratio(self) -> f64 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Medium => 0.5,
            Difficulty::Hard => 0.6,
        }
    }

    pub fn cells_to_remove(self, size: usize) -> usize {
        ((size * size) as f64 * self.removal_ratio()).floor() as usize
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "e" => Ok(Difficulty::Easy),
            "medium" | "m" => Ok(Difficulty::Medium),
            "hard" | "h" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub solution: SudokuGrid,
    pub puzzle: SudokuGrid,
    pub block_width: usize,
    pub block_height: usize,
}

impl Puzzle {
    fn new(solution: SudokuGrid, puzzle: SudokuGrid) -> Self {
        Self {
            block_width: solution.block_width(),
            block_height: solution.block_height(),
            solution,
            puzzle,
        }
    }

    pub fn size(&self) -> usize {
        self.solution.size()
    }
}

/// A puzzle with exactly one completion, using the thread-local RNG and the
/// default search budgets.
pub fn generate_puzzle(size: usize, difficulty: Difficulty) -> Result<Puzzle, SudokuError> {
    generate_puzzle_with(size, difficulty, &Config::default(), &mut rand::thread_rng())
}

/// Runs [`generate_puzzle`] on tokio's blocking pool.
pub async fn generate_puzzle_async(size: usize, difficulty: Difficulty) -> Result<Puzzle, SudokuError> {
    block_dims(size)?;
    match tokio::task::spawn_blocking(move || generate_puzzle(size, difficulty)).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Warning: puzzle generation task failed ({}), using a fallback puzzle", e);
            fallback_puzzle(size)
        }
    }
}

pub fn generate_puzzle_with<R: Rng + ?Sized>(
    size: usize,
    difficulty: Difficulty,
    config: &Config,
    rng: &mut R,
) -> Result<Puzzle, SudokuError> {
    SudokuGrid::new(size)?;
    let deadline = Instant::now() + config.generation_time_limit;
    let target = difficulty.cells_to_remove(size);

    for _ in 0..config.max_attempts {
        if Instant::now() >= deadline {
            break;
        }
        let Some(solution) = random_solution(size, config, deadline, rng)? else {
            continue;
        };
        if let Some(puzzle) = carve(&solution, target, config, deadline, rng) {
            return Ok(Puzzle::new(solution, puzzle));
        }
    }

    eprintln!(
        "Warning: could not carve a unique {}x{} {} puzzle, using a fallback puzzle",
        size, size, difficulty
    );
    fallback_puzzle(size)
}

fn random_solution<R: Rng + ?Sized>(
    size: usize,
    config: &Config,
    deadline: Instant,
    rng: &mut R,
) -> Result<Option<SudokuGrid>, SudokuError> {
    let empty = SudokuGrid::new(size)?;
    let mut budget = SearchBudget::with_deadline(config.fill_node_budget, Some(deadline));
    Ok(fill_with(&empty, &mut budget, |digits| digits.shuffle(rng)))
}

/// Empties `target` cells in random order, restoring any cell whose removal
/// cannot be proven to keep the completion unique.
fn carve<R: Rng + ?Sized>(
    solution: &SudokuGrid,
    target: usize,
    config: &Config,
    deadline: Instant,
    rng: &mut R,
) -> Option<SudokuGrid> {
    let n = solution.size();
    let mut puzzle = solution.clone();
    let mut order: Vec<(usize, usize)> = (0..n).flat_map(|r| (0..n).map(move |c| (r, c))).collect();
    order.shuffle(rng);

    let mut removed = 0;
    for (row, col) in order {
        if removed == target {
            break;
        }
        let digit = puzzle.get(row, col)?;
        puzzle.set(row, col, 0).ok()?;
        let mut budget = SearchBudget::with_deadline(config.uniqueness_node_budget, Some(deadline));
        if count_solutions_with_budget(&puzzle, 2, &mut budget) == Some(1) {
            removed += 1;
        } else {
            puzzle.set(row, col, digit).ok()?;
        }
    }
    (removed == target).then_some(puzzle)
}

const FALLBACK_4: ([[u8; 4]; 4], [[u8; 4]; 4]) = (
    [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]],
    [[1, 2, 3, 0], [0, 0, 1, 0], [2, 0, 4, 0], [4, 0, 0, 1]],
);

const FALLBACK_6: ([[u8; 6]; 6], [[u8; 6]; 6]) = (
    [
        [3, 5, 1, 6, 2, 4],
        [1, 6, 2, 4, 3, 5],
        [2, 4, 3, 5, 1, 6],
        [5, 1, 6, 2, 4, 3],
        [6, 2, 4, 3, 5, 1],
        [4, 3, 5, 1, 6, 2],
    ],
    [
        [3, 5, 0, 6, 2, 4],
        [0, 6, 0, 0, 0, 0],
        [2, 4, 0, 5, 0, 6],
        [5, 0, 6, 0, 0, 3],
        [0, 0, 4, 3, 5, 0],
        [0, 0, 0, 0, 6, 2],
    ],
);

const FALLBACK_9: ([[u8; 9]; 9], [[u8; 9]; 9]) = (
    [
        [5, 3, 4, 6, 7, 8, 9, 1, 2],
        [6, 7, 2, 1, 9, 5, 3, 4, 8],
        [1, 9, 8, 3, 4, 2, 5, 6, 7],
        [8, 5, 9, 7, 6, 1, 4, 2, 3],
        [4, 2, 6, 8, 5, 3, 7, 9, 1],
        [7, 1, 3, 9, 2, 4, 8, 5, 6],
        [9, 6, 1, 5, 3, 7, 2, 8, 4],
        [2, 8, 7, 4, 1, 9, 6, 3, 5],
        [3, 4, 5, 2, 8, 6, 1, 7, 9],
    ],
    [
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ],
);

/// A canned puzzle for `size`: hand-written for 4, 6 and 9, otherwise the
/// pattern solution with one cell emptied per row.
pub fn fallback_puzzle(size: usize) -> Result<Puzzle, SudokuError> {
    let (solution, puzzle) = match size {
        4 => (SudokuGrid::from_rows(&FALLBACK_4.0)?, SudokuGrid::from_rows(&FALLBACK_4.1)?),
        6 => (SudokuGrid::from_rows(&FALLBACK_6.0)?, SudokuGrid::from_rows(&FALLBACK_6.1)?),
        9 => (SudokuGrid::from_rows(&FALLBACK_9.0)?, SudokuGrid::from_rows(&FALLBACK_9.1)?),
        _ => {
            let solution = pattern_solution(size)?;
            let mut puzzle = solution.clone();
            for row in 0..size {
                puzzle.set(row, (row * 7 + 3) % size, 0)?;
            }
            (solution, puzzle)
        }
    };
    Ok(Puzzle::new(solution, puzzle))
}

/// The shifted-rows solution `(bw * (r % bh) + r / bh + c) % n + 1`.
fn pattern_solution(size: usize) -> Result<SudokuGrid, SudokuError> {
    let mut grid = SudokuGrid::new(size)?;
    let (bw, bh) = (grid.block_width(), grid.block_height());
    for r in 0..size {
        for c in 0..size {
            grid.set(r, c, ((bw * (r % bh) + r / bh + c) % size + 1) as u8)?;
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::solver::{has_unique_solution, solve};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_consistent(p: &Puzzle) {
        assert!(p.solution.is_complete());
        assert!(has_unique_solution(&p.puzzle));
        assert_eq!(solve(&p.puzzle).as_ref(), Some(&p.solution));
        let n = p.size();
        for r in 0..n {
            for c in 0..n {
                let given = p.puzzle.get(r, c).unwrap();
                assert!(given == 0 || given == p.solution.get(r, c).unwrap());
            }
        }
    }

    #[test]
    fn test_four_by_four_structure() {
        let p = generate_puzzle(4, Difficulty::Easy).unwrap();
        assert_eq!((p.block_width, p.block_height), (2, 2));
        assert_consistent(&p);
        // Every row, column and 2×2 block holds 1..=4 once.
        for r in 0..4 {
            let mut row: Vec<u8> = p.solution.to_rows()[r].clone();
            row.sort_unstable();
            assert_eq!(row, vec![1, 2, 3, 4]);
        }
        for b in 0..4 {
            let mut block: Vec<u8> = (0..16)
                .filter(|i| p.solution.block_of(i / 4, i % 4) == b)
                .map(|i| p.solution.get(i / 4, i % 4).unwrap())
                .collect();
            block.sort_unstable();
            assert_eq!(block, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_nine_by_nine_hits_removal_target() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = generate_puzzle_with(9, Difficulty::Medium, &Config::default(), &mut rng).unwrap();
        assert_consistent(&p);
        assert!(p.puzzle.count_empty() > 0);
    }

    #[test]
    fn test_removal_targets() {
        assert_eq!(Difficulty::Easy.cells_to_remove(9), 32);
        assert_eq!(Difficulty::Medium.cells_to_remove(9), 40);
        assert_eq!(Difficulty::Hard.cells_to_remove(9), 48);
        assert_eq!(Difficulty::Hard.cells_to_remove(4), 9);
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_fallbacks_are_unique() {
        for size in [4, 6, 8, 9, 10, 12, 16] {
            let p = fallback_puzzle(size).unwrap();
            assert_consistent(&p);
        }
    }

    #[test]
    fn test_zero_attempts_falls_back() {
        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let p = generate_puzzle_with(12, Difficulty::Hard, &config, &mut rng).unwrap();
        assert_eq!(p, fallback_puzzle(12).unwrap());
        assert_eq!(p.puzzle.count_empty(), 12);
    }

    #[test]
    fn test_unsupported_sizes() {
        assert_eq!(generate_puzzle(7, Difficulty::Easy), Err(SudokuError::UnsupportedSize(7)));
        assert_eq!(generate_puzzle(30, Difficulty::Easy), Err(SudokuError::UnsupportedSize(30)));
    }

    #[tokio::test]
    async fn test_async_generation() {
        let p = generate_puzzle_async(6, Difficulty::Medium).await.unwrap();
        assert_eq!((p.block_width, p.block_height), (2, 3));
        assert_consistent(&p);
        assert!(matches!(
            generate_puzzle_async(11, Difficulty::Medium).await,
            Err(SudokuError::UnsupportedSize(11))
        ));
    }
}
