//! Tunables for the sudoku search.

use std::time::Duration;

pub struct Config {
    // Generation
    /// Full generate-and-carve attempts before falling back to a canned puzzle.
    pub max_attempts: u32,
    /// Wall-clock limit for one `generate_puzzle` call, across all attempts.
    pub generation_time_limit: Duration,

    // Search
    /// Node limit for filling an empty grid.
    pub fill_node_budget: u64,
    /// Node limit for each uniqueness check while carving.
    pub uniqueness_node_budget: u64,
    /// Node limit for `solve` and `count_solutions`.
    pub solve_node_budget: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            generation_time_limit: Duration::from_secs(5),
            fill_node_budget: 200_000,
            uniqueness_node_budget: 20_000,
            solve_node_budget: 2_000_000,
        }
    }
}
