//! International chess.

use crate::board::{Board, Piece, PieceKind};
use crate::constants::{Player, CHESS_COLS, CHESS_ROWS};
use crate::error::{GameError, GameResult};
use crate::move_gen::{self, chess_idx, ALL_DIRECTIONS, DIAGONAL, ORTHOGONAL, TABLES};
use crate::movelist::MoveList;
use crate::r#move::{Candidate, MoveRecord, Special};
use crate::rules::{Rules, Status};
use crate::square::Square;

pub const WHITE: Player = Player::South;
pub const BLACK: Player = Player::North;

pub const START_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChessKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind for ChessKind {
    fn is_royal(self) -> bool {
        self == ChessKind::King
    }

    fn to_char(self) -> char {
        match self {
            ChessKind::King => 'K',
            ChessKind::Queen => 'Q',
            ChessKind::Rook => 'R',
            ChessKind::Bishop => 'B',
            ChessKind::Knight => 'N',
            ChessKind::Pawn => 'P',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(ChessKind::King),
            'Q' => Some(ChessKind::Queen),
            'R' => Some(ChessKind::Rook),
            'B' => Some(ChessKind::Bishop),
            'N' => Some(ChessKind::Knight),
            'P' => Some(ChessKind::Pawn),
            _ => None,
        }
    }
}

fn start_row(player: Player) -> usize {
    match player {
        Player::South => CHESS_ROWS - 2,
        Player::North => 1,
    }
}

fn last_row(player: Player) -> usize {
    match player {
        Player::South => 0,
        Player::North => CHESS_ROWS - 1,
    }
}

/// The back rank `player` sets up on.
fn home_row(player: Player) -> usize {
    last_row(player.opponent())
}

/// A chess game: board, turn, en-passant target, captured pieces, history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessGame {
    board: Board<ChessKind>,
    to_move: Player,
    en_passant: Option<Square>,
    /// Indexed by the capturing side.
    captured: [Vec<Piece<ChessKind>>; 2],
    history: Vec<MoveRecord<ChessKind>>,
    status: Status,
}

impl ChessGame {
    pub fn new() -> Self {
        let mut game = Self::with_board(Board::new(CHESS_ROWS, CHESS_COLS), WHITE);
        game.reset();
        game
    }

    /// A game from a placement string (see [`Board::from_layout`]).
    pub fn from_layout(layout: &str, to_move: Player) -> GameResult<Self> {
        let board = Board::from_layout(layout, CHESS_ROWS, CHESS_COLS)?;
        let mut game = Self::with_board(board, to_move);
        game.refresh_status();
        Ok(game)
    }

    fn with_board(board: Board<ChessKind>, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            en_passant: None,
            captured: [Vec::new(), Vec::new()],
            history: Vec::new(),
            status: Status::ToMove(to_move),
        }
    }

    /// Restores the standard starting position.
    pub fn reset(&mut self) {
        if let Ok(board) = Board::from_layout(START_LAYOUT, CHESS_ROWS, CHESS_COLS) {
            *self = Self::with_board(board, WHITE);
        }
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// Pieces captured by `player`.
    pub fn captured(&self, player: Player) -> &[Piece<ChessKind>] {
        &self.captured[player.idx()]
    }

    /// Coordinate notation of a history entry, e.g. `e2e4`.
    pub fn notation(record: &MoveRecord<ChessKind>) -> String {
        let from = record.from.map(|sq| sq.to_coord(CHESS_ROWS)).unwrap_or_default();
        let mut s = format!("{}{}", from, record.to.to_coord(CHESS_ROWS));
        if record.special == Some(Special::Promotion) {
            s.push('q');
        }
        s
    }

    fn pawn_moves(&self, from: Square, owner: Player, moves: &mut MoveList) {
        let dir = owner.forward();
        let promotion_row = last_row(owner);
        let tag = |to: Square| {
            if to.row == promotion_row {
                Candidate::special(to, Special::Promotion)
            } else {
                Candidate::new(to)
            }
        };

        if let Some(one) = from.offset(dir, 0, CHESS_ROWS, CHESS_COLS) {
            if self.board.is_empty(one) {
                moves.add(tag(one));
                if from.row == start_row(owner) {
                    if let Some(two) = one.offset(dir, 0, CHESS_ROWS, CHESS_COLS) {
                        if self.board.is_empty(two) {
                            moves.add(Candidate::new(two));
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(diag) = from.offset(dir, dc, CHESS_ROWS, CHESS_COLS) else {
                continue;
            };
            match self.board.get(diag) {
                Some(target) if target.owner != owner => moves.add(tag(diag)),
                None if self.en_passant == Some(diag) => {
                    moves.add(Candidate::special(diag, Special::EnPassant))
                }
                _ => {}
            }
        }
    }

    fn castling_moves(&self, from: Square, king: Piece<ChessKind>, moves: &mut MoveList) {
        if king.moved || from != Square::new(home_row(king.owner), 4) || self.in_check(king.owner) {
            return;
        }
        let enemy = king.owner.opponent();
        let sides = [
            (CHESS_COLS - 1, 1isize, Special::CastleKingside),
            (0, -1isize, Special::CastleQueenside),
        ];
        for (rook_col, dir, special) in sides {
            let rook_sq = Square::new(from.row, rook_col);
            match self.board.get(rook_sq) {
                Some(rook) if rook.kind == ChessKind::Rook && rook.owner == king.owner && !rook.moved => {}
                _ => continue,
            }
            let Some(target) = from.offset(0, 2 * dir, CHESS_ROWS, CHESS_COLS) else {
                continue;
            };

            let (lo, hi) = (from.col.min(rook_col) + 1, from.col.max(rook_col));
            let path_clear = (lo..hi).all(|c| self.board.is_empty(Square::new(from.row, c)));
            let lo = from.col.min(target.col);
            let hi = from.col.max(target.col);
            let path_safe = (lo..=hi).all(|c| !self.is_attacked(Square::new(from.row, c), enemy));
            if path_clear && path_safe {
                moves.add(Candidate::special(target, special));
            }
        }
    }

    fn king_steps(&self, from: Square, owner: Player, moves: &mut MoveList) {
        move_gen::step_table(&self.board, owner, &TABLES.chess_king[chess_idx(from)], moves);
    }

    /// Rook's home and castled squares for a castling move landing on `king_to`.
    fn castle_rook_squares(king_to: Square, special: Special) -> (Square, Square) {
        match special {
            Special::CastleKingside => (
                Square::new(king_to.row, CHESS_COLS - 1),
                Square::new(king_to.row, king_to.col - 1),
            ),
            _ => (Square::new(king_to.row, 0), Square::new(king_to.row, king_to.col + 1)),
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules for ChessGame {
    type Kind = ChessKind;

    fn board(&self) -> &Board<ChessKind> {
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

    fn history(&self) -> &[MoveRecord<ChessKind>] {
        &self.history
    }

    fn history_mut(&mut self) -> &mut Vec<MoveRecord<ChessKind>> {
        &mut self.history
    }

    fn pseudo_legal(&self, from: Square, moves: &mut MoveList) {
        let Some(piece) = self.board.get(from) else {
            return;
        };
        let owner = piece.owner;
        match piece.kind {
            ChessKind::Pawn => self.pawn_moves(from, owner, moves),
            ChessKind::Knight => {
                move_gen::step_table(&self.board, owner, &TABLES.chess_knight[chess_idx(from)], moves)
            }
            ChessKind::Bishop => move_gen::slide(&self.board, from, owner, &DIAGONAL, moves),
            ChessKind::Rook => move_gen::slide(&self.board, from, owner, &ORTHOGONAL, moves),
            ChessKind::Queen => move_gen::slide(&self.board, from, owner, &ALL_DIRECTIONS, moves),
            ChessKind::King => {
                self.king_steps(from, owner, moves);
                self.castling_moves(from, piece, moves);
            }
        }
    }

    fn attacks_from(&self, from: Square, moves: &mut MoveList) {
        let Some(piece) = self.board.get(from) else {
            return;
        };
        match piece.kind {
            // Pawns attack diagonally whether or not anything stands there.
            ChessKind::Pawn => {
                for dc in [-1, 1] {
                    if let Some(diag) = from.offset(piece.owner.forward(), dc, CHESS_ROWS, CHESS_COLS) {
                        moves.add(Candidate::new(diag));
                    }
                }
            }
            ChessKind::King => self.king_steps(from, piece.owner, moves),
            _ => self.pseudo_legal(from, moves),
        }
    }

    fn make(&mut self, from: Square, cand: Candidate, _promote: bool) -> GameResult<MoveRecord<ChessKind>> {
        let mut piece = self.board.take(from).ok_or(GameError::EmptySquare(from))?;
        let before = piece;
        let to = cand.to;

        let captured_at = match cand.special {
            Some(Special::EnPassant) => Some(Square::new(from.row, to.col)),
            _ if self.board.get(to).is_some() => Some(to),
            _ => None,
        };
        let captured = captured_at.and_then(|sq| self.board.take(sq));

        piece.moved = true;
        if cand.special == Some(Special::Promotion) {
            piece.kind = ChessKind::Queen;
        }
        self.board.put(to, piece);

        if let Some(special @ (Special::CastleKingside | Special::CastleQueenside)) = cand.special {
            let (rook_from, rook_to) = Self::castle_rook_squares(to, special);
            if let Some(mut rook) = self.board.take(rook_from) {
                rook.moved = true;
                self.board.put(rook_to, rook);
            }
        }

        if let Some(victim) = captured {
            self.captured[piece.owner.idx()].push(victim);
        }

        let en_passant_before = self.en_passant;
        self.en_passant = if before.kind == ChessKind::Pawn && from.row.abs_diff(to.row) == 2 {
            Some(Square::new((from.row + to.row) / 2, from.col))
        } else {
            None
        };
        self.to_move = self.to_move.opponent();

        Ok(MoveRecord {
            piece: before,
            from: Some(from),
            to,
            captured,
            captured_at,
            special: cand.special,
            en_passant_before,
        })
    }

    fn unmake(&mut self, record: MoveRecord<ChessKind>) {
        self.to_move = self.to_move.opponent();
        self.en_passant = record.en_passant_before;

        self.board.take(record.to);
        if let Some(from) = record.from {
            self.board.put(from, record.piece);
        }

        if let Some(special @ (Special::CastleKingside | Special::CastleQueenside)) = record.special {
            let (rook_home, rook_castled) = Self::castle_rook_squares(record.to, special);
            if let Some(mut rook) = self.board.take(rook_castled) {
                rook.moved = false;
                self.board.put(rook_home, rook);
            }
        }

        if let Some(victim) = record.captured {
            self.captured[record.piece.owner.idx()].pop();
            self.board.put(record.captured_at.unwrap_or(record.to), victim);
        }
    }
}
