//! Xiangqi (Chinese chess).

use crate::board::{Board, Piece, PieceKind};
use crate::constants::{Player, XIANGQI_COLS, XIANGQI_ROWS};
use crate::error::{GameError, GameResult};
use crate::move_gen::{self, xiangqi_idx, ORTHOGONAL, TABLES};
use crate::movelist::MoveList;
use crate::r#move::{Candidate, MoveRecord};
use crate::rules::{Rules, Status};
use crate::square::Square;

pub const RED: Player = Player::South;
pub const BLACK: Player = Player::North;

pub const START_LAYOUT: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XiangqiKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind for XiangqiKind {
    fn is_royal(self) -> bool {
        self == XiangqiKind::General
    }

    fn to_char(self) -> char {
        match self {
            XiangqiKind::General => 'K',
            XiangqiKind::Advisor => 'A',
            XiangqiKind::Elephant => 'B',
            XiangqiKind::Horse => 'N',
            XiangqiKind::Chariot => 'R',
            XiangqiKind::Cannon => 'C',
            XiangqiKind::Soldier => 'P',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(XiangqiKind::General),
            'A' => Some(XiangqiKind::Advisor),
            'B' => Some(XiangqiKind::Elephant),
            'N' => Some(XiangqiKind::Horse),
            'R' => Some(XiangqiKind::Chariot),
            'C' => Some(XiangqiKind::Cannon),
            'P' => Some(XiangqiKind::Soldier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XiangqiGame {
    board: Board<XiangqiKind>,
    to_move: Player,
    /// Indexed by the capturing side.
    captured: [Vec<Piece<XiangqiKind>>; 2],
    history: Vec<MoveRecord<XiangqiKind>>,
    status: Status,
}

impl XiangqiGame {
    pub fn new() -> Self {
        let mut game = Self::with_board(Board::new(XIANGQI_ROWS, XIANGQI_COLS), RED);
        game.reset();
        game
    }

    pub fn from_layout(layout: &str, to_move: Player) -> GameResult<Self> {
        let board = Board::from_layout(layout, XIANGQI_ROWS, XIANGQI_COLS)?;
        let mut game = Self::with_board(board, to_move);
        game.refresh_status();
        Ok(game)
    }

    fn with_board(board: Board<XiangqiKind>, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            captured: [Vec::new(), Vec::new()],
            history: Vec::new(),
            status: Status::ToMove(to_move),
        }
    }

    pub fn reset(&mut self) {
        if let Ok(board) = Board::from_layout(START_LAYOUT, XIANGQI_ROWS, XIANGQI_COLS) {
            *self = Self::with_board(board, RED);
        }
    }

    pub fn captured(&self, player: Player) -> &[Piece<XiangqiKind>] {
        &self.captured[player.idx()]
    }

    /// Coordinate notation in board coordinates, ranks 1-10 from Red's side,
    /// e.g. `h3e3`.
    pub fn notation(record: &MoveRecord<XiangqiKind>) -> String {
        let from = record.from.map(|sq| sq.to_coord(XIANGQI_ROWS)).unwrap_or_default();
        format!("{}{}", from, record.to.to_coord(XIANGQI_ROWS))
    }

    /// True when the two generals share a file with nothing between them.
    fn generals_facing(&self) -> bool {
        let (Some(a), Some(b)) = (self.board.royal(RED), self.board.royal(BLACK)) else {
            return false;
        };
        if a.col != b.col {
            return false;
        }
        let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
        (lo + 1..hi).all(|r| self.board.is_empty(Square::new(r, a.col)))
    }
}

impl Default for XiangqiGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules for XiangqiGame {
    type Kind = XiangqiKind;

    fn board(&self) -> &Board<XiangqiKind> {
        &self.board
    }

    fn side_to_move(&self) -> Player {
        self.to_move
    }

    fn status(&self) -> Status {
        self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    fn history(&self) -> &[MoveRecord<XiangqiKind>] {
        &self.history
    }

    fn history_mut(&mut self) -> &mut Vec<MoveRecord<XiangqiKind>> {
        &mut self.history
    }

    fn pseudo_legal(&self, from: Square, moves: &mut MoveList) {
        let Some(piece) = self.board.get(from) else {
            return;
        };
        let owner = piece.owner;
        let p = owner.idx();
        let i = xiangqi_idx(from);
        match piece.kind {
            XiangqiKind::General => move_gen::step_table(&self.board, owner, &TABLES.xiangqi_general[p][i], moves),
            XiangqiKind::Advisor => move_gen::step_table(&self.board, owner, &TABLES.xiangqi_advisor[p][i], moves),
            XiangqiKind::Elephant => {
                move_gen::legged_table(&self.board, owner, &TABLES.xiangqi_elephant[p][i], moves)
            }
            XiangqiKind::Horse => move_gen::legged_table(&self.board, owner, &TABLES.xiangqi_horse[i], moves),
            XiangqiKind::Chariot => move_gen::slide(&self.board, from, owner, &ORTHOGONAL, moves),
            XiangqiKind::Cannon => move_gen::screened_slide(&self.board, from, owner, &ORTHOGONAL, moves),
            XiangqiKind::Soldier => move_gen::step_table(&self.board, owner, &TABLES.xiangqi_soldier[p][i], moves),
        }
    }

    fn make(&mut self, from: Square, cand: Candidate, _promote: bool) -> GameResult<MoveRecord<XiangqiKind>> {
        let mut piece = self.board.take(from).ok_or(GameError::EmptySquare(from))?;
        let before = piece;
        piece.moved = true;
        let captured = self.board.put(cand.to, piece);
        if let Some(victim) = captured {
            self.captured[piece.owner.idx()].push(victim);
        }
        self.to_move = self.to_move.opponent();
        Ok(MoveRecord {
            piece: before,
            from: Some(from),
            to: cand.to,
            captured,
            captured_at: captured.map(|_| cand.to),
            special: None,
            en_passant_before: None,
        })
    }

    fn unmake(&mut self, record: MoveRecord<XiangqiKind>) {
        self.to_move = self.to_move.opponent();
        self.board.take(record.to);
        if let Some(from) = record.from {
            self.board.put(from, record.piece);
        }
        if let Some(victim) = record.captured {
            self.captured[record.piece.owner.idx()].pop();
            self.board.put(record.to, victim);
        }
    }

    fn royal_exposed(&self, _player: Player) -> bool {
        self.generals_facing()
    }
}
