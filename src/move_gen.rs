//! Shared move-generation geometry: ray walkers, step tables and the
//! pre-computed per-square tables used by the three games.

use crate::board::{Board, PieceKind};
use crate::constants::{Player, CHESS_COLS, CHESS_ROWS, XIANGQI_COLS, XIANGQI_ROWS};
use crate::movelist::MoveList;
use crate::r#move::Candidate;
use crate::square::Square;
use once_cell::sync::Lazy;

pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
pub const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const ALL_DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
pub const KNIGHT_JUMPS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// A jump together with the square that must be empty for it to be legal
/// (xiangqi horse leg, elephant eye).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeggedStep {
    pub to: Square,
    pub leg: Square,
}

/// Pre-computed per-square destination tables. Built once, then read
/// through [`TABLES`].
pub struct GeometryTables {
    pub chess_knight: Vec<Vec<Square>>,
    pub chess_king: Vec<Vec<Square>>,
    pub xiangqi_horse: Vec<Vec<LeggedStep>>,
    pub xiangqi_elephant: [Vec<Vec<LeggedStep>>; 2], // [player_idx][square]
    pub xiangqi_general: [Vec<Vec<Square>>; 2],
    pub xiangqi_advisor: [Vec<Vec<Square>>; 2],
    pub xiangqi_soldier: [Vec<Vec<Square>>; 2],
}

pub const fn xiangqi_idx(sq: Square) -> usize {
    sq.row * XIANGQI_COLS + sq.col
}

pub const fn chess_idx(sq: Square) -> usize {
    sq.row * CHESS_COLS + sq.col
}

/// The 3x3 palace of `player` on the xiangqi board.
pub fn in_palace(sq: Square, player: Player) -> bool {
    let rows_ok = match player {
        Player::South => sq.row >= 7,
        Player::North => sq.row <= 2,
    };
    rows_ok && (3..=5).contains(&sq.col)
}

/// True when `sq` lies on `player`'s own side of the xiangqi river.
pub fn own_side_of_river(sq: Square, player: Player) -> bool {
    match player {
        Player::South => sq.row >= 5,
        Player::North => sq.row <= 4,
    }
}

impl GeometryTables {
    fn new() -> Self {
        let chess_squares = CHESS_ROWS * CHESS_COLS;
        let xq_squares = XIANGQI_ROWS * XIANGQI_COLS;
        let mut tables = GeometryTables {
            chess_knight: vec![Vec::new(); chess_squares],
            chess_king: vec![Vec::new(); chess_squares],
            xiangqi_horse: vec![Vec::new(); xq_squares],
            xiangqi_elephant: [vec![Vec::new(); xq_squares], vec![Vec::new(); xq_squares]],
            xiangqi_general: [vec![Vec::new(); xq_squares], vec![Vec::new(); xq_squares]],
            xiangqi_advisor: [vec![Vec::new(); xq_squares], vec![Vec::new(); xq_squares]],
            xiangqi_soldier: [vec![Vec::new(); xq_squares], vec![Vec::new(); xq_squares]],
        };

        // Chess knight and king
        for r in 0..CHESS_ROWS {
            for c in 0..CHESS_COLS {
                let sq = Square::new(r, c);
                for (dr, dc) in KNIGHT_JUMPS {
                    if let Some(to) = sq.offset(dr, dc, CHESS_ROWS, CHESS_COLS) {
                        tables.chess_knight[chess_idx(sq)].push(to);
                    }
                }
                for (dr, dc) in ALL_DIRECTIONS {
                    if let Some(to) = sq.offset(dr, dc, CHESS_ROWS, CHESS_COLS) {
                        tables.chess_king[chess_idx(sq)].push(to);
                    }
                }
            }
        }

        for r in 0..XIANGQI_ROWS {
            for c in 0..XIANGQI_COLS {
                let sq = Square::new(r, c);
                let i = xiangqi_idx(sq);

                // Horse: the leg is the orthogonal neighbour in the long direction
                for (dr, dc) in KNIGHT_JUMPS {
                    if let Some(to) = sq.offset(dr, dc, XIANGQI_ROWS, XIANGQI_COLS) {
                        let (lr, lc) = if dr.abs() == 2 { (dr / 2, 0) } else { (0, dc / 2) };
                        if let Some(leg) = sq.offset(lr, lc, XIANGQI_ROWS, XIANGQI_COLS) {
                            tables.xiangqi_horse[i].push(LeggedStep { to, leg });
                        }
                    }
                }

                for player in [Player::South, Player::North] {
                    let p = player.idx();

                    // Elephant: two diagonal steps, never across the river
                    for (dr, dc) in DIAGONAL {
                        let to = sq.offset(dr * 2, dc * 2, XIANGQI_ROWS, XIANGQI_COLS);
                        let eye = sq.offset(dr, dc, XIANGQI_ROWS, XIANGQI_COLS);
                        if let (Some(to), Some(leg)) = (to, eye) {
                            if own_side_of_river(to, player) {
                                tables.xiangqi_elephant[p][i].push(LeggedStep { to, leg });
                            }
                        }
                    }

                    // General and advisor stay in the palace
                    for (dr, dc) in ORTHOGONAL {
                        if let Some(to) = sq.offset(dr, dc, XIANGQI_ROWS, XIANGQI_COLS) {
                            if in_palace(to, player) {
                                tables.xiangqi_general[p][i].push(to);
                            }
                        }
                    }
                    for (dr, dc) in DIAGONAL {
                        if let Some(to) = sq.offset(dr, dc, XIANGQI_ROWS, XIANGQI_COLS) {
                            if in_palace(to, player) {
                                tables.xiangqi_advisor[p][i].push(to);
                            }
                        }
                    }

                    // Soldier: forward, plus sideways once across the river
                    if let Some(to) = sq.offset(player.forward(), 0, XIANGQI_ROWS, XIANGQI_COLS) {
                        tables.xiangqi_soldier[p][i].push(to);
                    }
                    if !own_side_of_river(sq, player) {
                        for dc in [-1, 1] {
                            if let Some(to) = sq.offset(0, dc, XIANGQI_ROWS, XIANGQI_COLS) {
                                tables.xiangqi_soldier[p][i].push(to);
                            }
                        }
                    }
                }
            }
        }

        tables
    }
}

// The global static instance of the geometry tables, initialized lazily and only once.
pub static TABLES: Lazy<GeometryTables> = Lazy::new(GeometryTables::new);

/// Adds `to` unless it holds a piece of `owner`.
fn push_if_not_own<K: PieceKind>(board: &Board<K>, owner: Player, to: Square, moves: &mut MoveList) {
    match board.get(to) {
        Some(p) if p.owner == owner => {}
        _ => moves.add(Candidate::new(to)),
    }
}

/// Walks each direction until the edge; the first occupied square is
/// included only when it holds an opponent piece.
pub fn slide<K: PieceKind>(
    board: &Board<K>,
    from: Square,
    owner: Player,
    dirs: &[(isize, isize)],
    moves: &mut MoveList,
) {
    let (rows, cols) = (board.rows(), board.cols());
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc, rows, cols) {
            match board.get(next) {
                None => moves.add(Candidate::new(next)),
                Some(p) => {
                    if p.owner != owner {
                        moves.add(Candidate::new(next));
                    }
                    break;
                }
            }
            cur = next;
        }
    }
}

/// Xiangqi cannon rays: quiet moves up to the first piece (the screen),
/// then at most one capture of the first piece beyond it.
pub fn screened_slide<K: PieceKind>(
    board: &Board<K>,
    from: Square,
    owner: Player,
    dirs: &[(isize, isize)],
    moves: &mut MoveList,
) {
    let (rows, cols) = (board.rows(), board.cols());
    for &(dr, dc) in dirs {
        let mut cur = from;
        let mut screened = false;
        while let Some(next) = cur.offset(dr, dc, rows, cols) {
            match (board.get(next), screened) {
                (None, false) => moves.add(Candidate::new(next)),
                (None, true) => {}
                (Some(_), false) => screened = true,
                (Some(p), true) => {
                    if p.owner != owner {
                        moves.add(Candidate::new(next));
                    }
                    break;
                }
            }
            cur = next;
        }
    }
}

/// Single steps by `offsets`, given from South's point of view; rows are
/// mirrored for North.
pub fn step_relative<K: PieceKind>(
    board: &Board<K>,
    from: Square,
    owner: Player,
    offsets: &[(isize, isize)],
    moves: &mut MoveList,
) {
    let flip = -owner.forward();
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr * flip, dc, board.rows(), board.cols()) {
            push_if_not_own(board, owner, to, moves);
        }
    }
}

/// Rays along `dirs`, given from South's point of view.
pub fn slide_relative<K: PieceKind>(
    board: &Board<K>,
    from: Square,
    owner: Player,
    dirs: &[(isize, isize)],
    moves: &mut MoveList,
) {
    let flip = -owner.forward();
    let mut oriented = [(0isize, 0isize); 8];
    for (slot, &(dr, dc)) in oriented.iter_mut().zip(dirs) {
        *slot = (dr * flip, dc);
    }
    slide(board, from, owner, &oriented[..dirs.len().min(8)], moves);
}

/// Pre-computed destinations, accepted unless blocked by an own piece.
pub fn step_table<K: PieceKind>(board: &Board<K>, owner: Player, targets: &[Square], moves: &mut MoveList) {
    for &to in targets {
        push_if_not_own(board, owner, to, moves);
    }
}

/// Pre-computed jumps that require an empty leg square.
pub fn legged_table<K: PieceKind>(board: &Board<K>, owner: Player, steps: &[LeggedStep], moves: &mut MoveList) {
    for step in steps {
        if board.is_empty(step.leg) {
            push_if_not_own(board, owner, step.to, moves);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(TABLES.chess_knight[chess_idx(Square::new(0, 0))].len(), 2);
        assert_eq!(TABLES.chess_king[chess_idx(Square::new(4, 4))].len(), 8);
        // Corner horse has two jumps; centre horse has eight.
        assert_eq!(TABLES.xiangqi_horse[xiangqi_idx(Square::new(0, 0))].len(), 2);
        assert_eq!(TABLES.xiangqi_horse[xiangqi_idx(Square::new(4, 4))].len(), 8);
    }

    #[test]
    fn test_palace_tables() {
        let south = Player::South.idx();
        // General in the centre of its palace reaches four points.
        assert_eq!(TABLES.xiangqi_general[south][xiangqi_idx(Square::new(8, 4))].len(), 4);
        // Advisor in a palace corner reaches only the centre.
        assert_eq!(
            TABLES.xiangqi_advisor[south][xiangqi_idx(Square::new(9, 3))],
            vec![Square::new(8, 4)]
        );
    }

    #[test]
    fn test_elephant_never_crosses_river() {
        let south = Player::South.idx();
        let targets: Vec<Square> = TABLES.xiangqi_elephant[south][xiangqi_idx(Square::new(5, 2))]
            .iter()
            .map(|s| s.to)
            .collect();
        assert!(targets.iter().all(|sq| sq.row >= 5));
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_soldier_table_river_rule() {
        let south = Player::South.idx();
        assert_eq!(TABLES.xiangqi_soldier[south][xiangqi_idx(Square::new(6, 4))], vec![Square::new(5, 4)]);
        assert_eq!(TABLES.xiangqi_soldier[south][xiangqi_idx(Square::new(4, 4))].len(), 3);
        // A soldier on the last rank can only move sideways.
        assert_eq!(TABLES.xiangqi_soldier[south][xiangqi_idx(Square::new(0, 0))], vec![Square::new(0, 1)]);
    }
}
