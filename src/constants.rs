//! Constants shared by the board games.

/// One of the two sides of a board game.
///
/// `South` starts on the highest-numbered rows and moves first: White in
/// chess, Red in xiangqi, Black (sente) in shogi. `North` starts on row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    South,
    North,
}

impl Player {
    /// Get the opponent of the current player.
    pub fn opponent(self) -> Player {
        match self {
            Player::South => Player::North,
            Player::North => Player::South,
        }
    }

    /// Row delta of a step "forward" for this player.
    pub fn forward(self) -> isize {
        match self {
            Player::South => -1,
            Player::North => 1,
        }
    }

    /// Index into per-side arrays (0 for South, 1 for North).
    pub fn idx(self) -> usize {
        match self {
            Player::South => 0,
            Player::North => 1,
        }
    }

    /// Display name of this side in the given game.
    pub fn name(self, variant: Variant) -> &'static str {
        match (variant, self) {
            (Variant::Chess, Player::South) => "White",
            (Variant::Chess, Player::North) => "Black",
            (Variant::Xiangqi, Player::South) => "Red",
            (Variant::Xiangqi, Player::North) => "Black",
            (Variant::Shogi, Player::South) => "Sente",
            (Variant::Shogi, Player::North) => "Gote",
        }
    }
}

/// The three supported board games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Chess,
    Xiangqi,
    Shogi,
}

impl Variant {
    /// Board dimensions as (rows, cols).
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Variant::Chess => (CHESS_ROWS, CHESS_COLS),
            Variant::Xiangqi => (XIANGQI_ROWS, XIANGQI_COLS),
            Variant::Shogi => (SHOGI_ROWS, SHOGI_COLS),
        }
    }
}

// --- Board Dimensions ---
pub const CHESS_ROWS: usize = 8;
pub const CHESS_COLS: usize = 8;
pub const XIANGQI_ROWS: usize = 10;
pub const XIANGQI_COLS: usize = 9;
pub const SHOGI_ROWS: usize = 9;
pub const SHOGI_COLS: usize = 9;

/// Number of far ranks forming the shogi promotion zone.
pub const SHOGI_PROMOTION_DEPTH: usize = 3;

/// Largest board in any variant, used to size move lists.
pub const MAX_SQUARES: usize = XIANGQI_ROWS * XIANGQI_COLS;
