//! Shogi (Japanese chess): promotion zones, pieces in hand and drops.

use crate::board::{Board, Piece, PieceKind};
use crate::constants::{Player, SHOGI_COLS, SHOGI_PROMOTION_DEPTH, SHOGI_ROWS};
use crate::error::{DropViolation, GameError, GameResult};
use crate::move_gen::{self, ALL_DIRECTIONS, DIAGONAL, ORTHOGONAL};
use crate::movelist::MoveList;
use crate::r#move::{Candidate, MoveRecord, Special};
use crate::rules::{Rules, Status};
use crate::square::Square;

/// Black, who moves first.
pub const SENTE: Player = Player::South;
pub const GOTE: Player = Player::North;

pub const START_LAYOUT: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL";

// Offsets from sente's point of view (forward is row - 1).
const GOLD_STEPS: [(isize, isize); 6] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0)];
const SILVER_STEPS: [(isize, isize); 5] = [(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_STEPS: [(isize, isize); 2] = [(-2, -1), (-2, 1)];
const FORWARD: [(isize, isize); 1] = [(-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShogiKind {
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Knight,
    Lance,
    Pawn,
}

impl PieceKind for ShogiKind {
    fn is_royal(self) -> bool {
        self == ShogiKind::King
    }

    fn to_char(self) -> char {
        match self {
            ShogiKind::King => 'K',
            ShogiKind::Rook => 'R',
            ShogiKind::Bishop => 'B',
            ShogiKind::Gold => 'G',
            ShogiKind::Silver => 'S',
            ShogiKind::Knight => 'N',
            ShogiKind::Lance => 'L',
            ShogiKind::Pawn => 'P',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(ShogiKind::King),
            'R' => Some(ShogiKind::Rook),
            'B' => Some(ShogiKind::Bishop),
            'G' => Some(ShogiKind::Gold),
            'S' => Some(ShogiKind::Silver),
            'N' => Some(ShogiKind::Knight),
            'L' => Some(ShogiKind::Lance),
            'P' => Some(ShogiKind::Pawn),
            _ => None,
        }
    }
}

impl ShogiKind {
    pub fn can_promote(self) -> bool {
        !matches!(self, ShogiKind::King | ShogiKind::Gold)
    }
}

/// Kinds that can be held in hand, in display order.
pub const HAND_KINDS: [ShogiKind; 7] = [
    ShogiKind::Rook,
    ShogiKind::Bishop,
    ShogiKind::Gold,
    ShogiKind::Silver,
    ShogiKind::Knight,
    ShogiKind::Lance,
    ShogiKind::Pawn,
];

/// Captured pieces available for dropping, counted per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    counts: [u8; HAND_KINDS.len()],
}

impl Hand {
    fn slot(kind: ShogiKind) -> Option<usize> {
        HAND_KINDS.iter().position(|&k| k == kind)
    }

    pub fn count(&self, kind: ShogiKind) -> u8 {
        Self::slot(kind).map_or(0, |i| self.counts[i])
    }

    fn add(&mut self, kind: ShogiKind) {
        if let Some(i) = Self::slot(kind) {
            self.counts[i] += 1;
        }
    }

    fn remove(&mut self, kind: ShogiKind) -> bool {
        match Self::slot(kind) {
            Some(i) if self.counts[i] > 0 => {
                self.counts[i] -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    /// Held kinds with their counts, skipping kinds not held.
    pub fn iter(&self) -> impl Iterator<Item = (ShogiKind, u8)> + '_ {
        HAND_KINDS
            .iter()
            .zip(self.counts.iter())
            .filter(|&(_, &n)| n > 0)
            .map(|(&k, &n)| (k, n))
    }
}

/// Ranks between `sq` and `player`'s far edge.
fn ranks_to_go(sq: Square, player: Player) -> usize {
    match player {
        Player::South => sq.row,
        Player::North => SHOGI_ROWS - 1 - sq.row,
    }
}

fn in_promotion_zone(sq: Square, player: Player) -> bool {
    ranks_to_go(sq, player) < SHOGI_PROMOTION_DEPTH
}

/// True when an unpromoted `kind` standing on `sq` could never move again.
fn is_dead_end(kind: ShogiKind, sq: Square, player: Player) -> bool {
    match kind {
        ShogiKind::Pawn | ShogiKind::Lance => ranks_to_go(sq, player) == 0,
        ShogiKind::Knight => ranks_to_go(sq, player) <= 1,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShogiGame {
    board: Board<ShogiKind>,
    to_move: Player,
    hands: [Hand; 2],
    history: Vec<MoveRecord<ShogiKind>>,
    status: Status,
}

impl ShogiGame {
    pub fn new() -> Self {
        let mut game = Self::with_board(Board::new(SHOGI_ROWS, SHOGI_COLS), SENTE);
        game.reset();
        game
    }

    pub fn from_layout(layout: &str, to_move: Player) -> GameResult<Self> {
        let board = Board::from_layout(layout, SHOGI_ROWS, SHOGI_COLS)?;
        let mut game = Self::with_board(board, to_move);
        game.refresh_status();
        Ok(game)
    }

    fn with_board(board: Board<ShogiKind>, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            hands: [Hand::default(), Hand::default()],
            history: Vec::new(),
            status: Status::ToMove(to_move),
        }
    }

    pub fn reset(&mut self) {
        if let Ok(board) = Board::from_layout(START_LAYOUT, SHOGI_ROWS, SHOGI_COLS) {
            *self = Self::with_board(board, SENTE);
        }
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.idx()]
    }

    /// Puts a piece into `player`'s hand, for setting up positions.
    pub fn add_to_hand(&mut self, player: Player, kind: ShogiKind) -> GameResult<()> {
        if Hand::slot(kind).is_none() {
            return Err(GameError::DropViolation(DropViolation::NotInHand));
        }
        self.hands[player.idx()].add(kind);
        self.refresh_status();
        Ok(())
    }

    /// Shogi notation of a history entry: `P7g7f`, `P7c7d+`, `P*5e`.
    pub fn notation(record: &MoveRecord<ShogiKind>) -> String {
        let name = |sq: Square| format!("{}{}", SHOGI_COLS - sq.col, (b'a' + sq.row as u8) as char);
        let mut s = String::new();
        if record.piece.promoted {
            s.push('+');
        }
        s.push(record.piece.kind.to_char());
        match record.from {
            Some(from) => s.push_str(&name(from)),
            None => s.push('*'),
        }
        s.push_str(&name(record.to));
        if record.from.is_some() && record.special == Some(Special::Promotion) {
            s.push('+');
        }
        s
    }

    /// Places a piece from the mover's hand onto an empty square.
    pub fn drop_piece(&mut self, kind: ShogiKind, to: Square) -> GameResult<Status> {
        self.check_square(to)?;
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        if let Some(violation) = self.drop_violation(kind, to, true) {
            return Err(GameError::DropViolation(violation));
        }
        let record = self.make_drop(kind, to);
        self.history.push(record);
        Ok(self.refresh_status())
    }

    /// Every square where the mover may legally drop `kind`.
    pub fn drop_targets(&mut self, kind: ShogiKind) -> MoveList {
        let mut targets = MoveList::new();
        if self.status.is_terminal() || self.hand(self.to_move).count(kind) == 0 {
            return targets;
        }
        let squares: Vec<Square> = self.board.squares().collect();
        for to in squares {
            if self.drop_violation(kind, to, true).is_none() {
                targets.add(Candidate::special(to, Special::Drop));
            }
        }
        targets
    }

    fn has_unpromoted_pawn_on_file(&self, player: Player, col: usize) -> bool {
        (0..SHOGI_ROWS).any(|row| {
            matches!(
                self.board.get(Square::new(row, col)),
                Some(p) if p.owner == player && p.kind == ShogiKind::Pawn && !p.promoted
            )
        })
    }

    /// Why the side to move may not drop `kind` on `to`, if it may not.
    /// `pawn_mate_rule` is off when evaluating replies inside the
    /// pawn-drop-mate test itself.
    fn drop_violation(&mut self, kind: ShogiKind, to: Square, pawn_mate_rule: bool) -> Option<DropViolation> {
        let player = self.to_move;
        if self.hands[player.idx()].count(kind) == 0 {
            return Some(DropViolation::NotInHand);
        }
        if !self.board.is_empty(to) {
            return Some(DropViolation::Occupied);
        }
        if is_dead_end(kind, to, player) {
            return Some(DropViolation::DeadPiece);
        }
        if kind == ShogiKind::Pawn && self.has_unpromoted_pawn_on_file(player, to.col) {
            return Some(DropViolation::TwoPawns);
        }

        let check_mate_rule = pawn_mate_rule && kind == ShogiKind::Pawn;
        // A drop never uncovers an attack, so only a king already in check
        // can be left in check.
        if !check_mate_rule && !self.in_check(player) {
            return None;
        }
        let record = self.make_drop(kind, to);
        let opponent = player.opponent();
        let violation = if self.in_check(player) {
            Some(DropViolation::LeavesKingInCheck)
        } else if check_mate_rule && self.in_check(opponent) && !self.has_reply(opponent) {
            Some(DropViolation::PawnDropMate)
        } else {
            None
        };
        self.unmake(record);
        violation
    }

    fn legal_drop_exists(&mut self, pawn_mate_rule: bool) -> bool {
        let held: Vec<ShogiKind> = self.hands[self.to_move.idx()].iter().map(|(k, _)| k).collect();
        let squares: Vec<Square> = self.board.squares().collect();
        held.into_iter().any(|kind| {
            squares
                .iter()
                .any(|&to| self.drop_violation(kind, to, pawn_mate_rule).is_none())
        })
    }

    /// Whether `player` (the side to move) has any legal reply, without
    /// applying the pawn-drop-mate rule to its own drops.
    fn has_reply(&mut self, player: Player) -> bool {
        let origins: Vec<Square> = self.board.pieces(player).map(|(sq, _)| sq).collect();
        origins.into_iter().any(|from| !self.legal_moves_from(from).is_empty()) || self.legal_drop_exists(false)
    }

    fn make_drop(&mut self, kind: ShogiKind, to: Square) -> MoveRecord<ShogiKind> {
        let player = self.to_move;
        self.hands[player.idx()].remove(kind);
        let piece = Piece::new(kind, player);
        self.board.put(to, piece);
        self.to_move = player.opponent();
        MoveRecord {
            piece,
            from: None,
            to,
            captured: None,
            captured_at: None,
            special: Some(Special::Drop),
            en_passant_before: None,
        }
    }
}

impl Default for ShogiGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules for ShogiGame {
    type Kind = ShogiKind;

    fn board(&self) -> &Board<ShogiKind> {
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

    fn history(&self) -> &[MoveRecord<ShogiKind>] {
        &self.history
    }

    fn history_mut(&mut self) -> &mut Vec<MoveRecord<ShogiKind>> {
        &mut self.history
    }

    fn pseudo_legal(&self, from: Square, moves: &mut MoveList) {
        let Some(piece) = self.board.get(from) else {
            return;
        };
        let owner = piece.owner;
        let board = &self.board;
        let mut targets = MoveList::new();
        match (piece.kind, piece.promoted) {
            (ShogiKind::King, _) => move_gen::step_relative(board, from, owner, &ALL_DIRECTIONS, &mut targets),
            (ShogiKind::Rook, promoted) => {
                move_gen::slide(board, from, owner, &ORTHOGONAL, &mut targets);
                if promoted {
                    move_gen::step_relative(board, from, owner, &DIAGONAL, &mut targets);
                }
            }
            (ShogiKind::Bishop, promoted) => {
                move_gen::slide(board, from, owner, &DIAGONAL, &mut targets);
                if promoted {
                    move_gen::step_relative(board, from, owner, &ORTHOGONAL, &mut targets);
                }
            }
            (ShogiKind::Gold, _) | (_, true) => {
                move_gen::step_relative(board, from, owner, &GOLD_STEPS, &mut targets)
            }
            (ShogiKind::Silver, false) => move_gen::step_relative(board, from, owner, &SILVER_STEPS, &mut targets),
            (ShogiKind::Knight, false) => move_gen::step_relative(board, from, owner, &KNIGHT_STEPS, &mut targets),
            (ShogiKind::Lance, false) => move_gen::slide_relative(board, from, owner, &FORWARD, &mut targets),
            (ShogiKind::Pawn, false) => move_gen::step_relative(board, from, owner, &FORWARD, &mut targets),
        }

        let may_promote = piece.kind.can_promote() && !piece.promoted;
        for cand in targets.iter() {
            if may_promote && (in_promotion_zone(from, owner) || in_promotion_zone(cand.to, owner)) {
                moves.add(Candidate::special(cand.to, Special::Promotion));
            } else {
                moves.add(*cand);
            }
        }
    }

    fn resolve_promotion(&self, from: Square, cand: Candidate, choice: Option<bool>) -> GameResult<bool> {
        let illegal = GameError::IllegalMove { from, to: cand.to };
        if cand.special != Some(Special::Promotion) {
            return match choice {
                Some(true) => Err(illegal),
                _ => Ok(false),
            };
        }
        let piece = self.board.get(from).ok_or(GameError::EmptySquare(from))?;
        if is_dead_end(piece.kind, cand.to, piece.owner) {
            return match choice {
                Some(false) => Err(illegal),
                _ => Ok(true),
            };
        }
        choice.ok_or(GameError::PromotionChoiceRequired)
    }

    fn make(&mut self, from: Square, cand: Candidate, promote: bool) -> GameResult<MoveRecord<ShogiKind>> {
        let mut piece = self.board.take(from).ok_or(GameError::EmptySquare(from))?;
        let before = piece;
        let promote = promote && cand.special == Some(Special::Promotion);
        piece.promoted |= promote;
        let captured = self.board.put(cand.to, piece);
        if let Some(victim) = captured {
            self.hands[piece.owner.idx()].add(victim.kind);
        }
        self.to_move = self.to_move.opponent();
        Ok(MoveRecord {
            piece: before,
            from: Some(from),
            to: cand.to,
            captured,
            captured_at: captured.map(|_| cand.to),
            special: promote.then_some(Special::Promotion),
            en_passant_before: None,
        })
    }

    fn unmake(&mut self, record: MoveRecord<ShogiKind>) {
        self.to_move = self.to_move.opponent();
        self.board.take(record.to);
        match record.from {
            Some(from) => {
                self.board.put(from, record.piece);
            }
            None => self.hands[record.piece.owner.idx()].add(record.piece.kind),
        }
        if let Some(victim) = record.captured {
            self.hands[record.piece.owner.idx()].remove(victim.kind);
            self.board.put(record.to, victim);
        }
    }

    fn has_legal_drop(&mut self, player: Player) -> bool {
        player == self.to_move && self.legal_drop_exists(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_opening_has_thirty_moves() {
        let mut game = ShogiGame::new();
        let origins: Vec<Square> = game.board().pieces(SENTE).map(|(s, _)| s).collect();
        let total: usize = origins.into_iter().map(|s| game.legal_moves_from(s).len()).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn test_first_move_notation() {
        let mut game = ShogiGame::new();
        game.apply_move(Square::new(6, 2), Square::new(5, 2), None).unwrap();
        assert_eq!(ShogiGame::notation(&game.history()[0]), "P7g7f");
        assert_eq!(game.side_to_move(), GOTE);
    }

    #[test]
    fn test_capture_demotes_into_hand_and_undo_restores() {
        let mut game = ShogiGame::from_layout("4k4/9/9/9/4+b4/9/9/4R4/4K4", SENTE).unwrap();
        let before = game.clone();

        let status = game.apply_move(Square::new(7, 4), Square::new(4, 4), None).unwrap();
        assert_eq!(status, Status::Check(GOTE));
        assert_eq!(game.hand(SENTE).count(ShogiKind::Bishop), 1);

        game.undo();
        assert_eq!(game, before);
        assert!(game.board().get(Square::new(4, 4)).unwrap().promoted);
        assert!(game.hand(SENTE).is_empty());
    }

    #[test]
    fn test_captured_piece_can_be_dropped_by_the_capturer() {
        let mut game = ShogiGame::from_layout("4k4/9/9/9/4b4/9/9/4R4/4K4", SENTE).unwrap();
        game.apply_move(Square::new(7, 4), Square::new(4, 4), None).unwrap();
        game.apply_move(Square::new(0, 4), Square::new(0, 3), None).unwrap();
        game.drop_piece(ShogiKind::Bishop, Square::new(5, 5)).unwrap();
        let dropped = game.board().get(Square::new(5, 5)).unwrap();
        assert_eq!(dropped.owner, SENTE);
        assert!(!dropped.promoted);
        assert_eq!(ShogiGame::notation(game.history().last().unwrap()), "B*4f");
    }

    #[test]
    fn test_two_pawns_rule() {
        let mut game = ShogiGame::from_layout("4k4/9/9/9/9/9/4P4/9/4K4", SENTE).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Pawn).unwrap();
        assert_eq!(
            game.drop_piece(ShogiKind::Pawn, Square::new(5, 4)),
            Err(GameError::DropViolation(DropViolation::TwoPawns))
        );
        let targets = game.drop_targets(ShogiKind::Pawn);
        assert!(targets.iter().all(|c| c.to.col != 4 && c.to.row != 0));
        assert!(targets.contains(Square::new(5, 3)));
    }

    #[test]
    fn test_dead_piece_drops_are_rejected() {
        let mut game = ShogiGame::from_layout("4k4/9/9/9/9/9/9/9/4K4", SENTE).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Knight).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Lance).unwrap();
        assert_eq!(
            game.drop_piece(ShogiKind::Knight, Square::new(1, 2)),
            Err(GameError::DropViolation(DropViolation::DeadPiece))
        );
        assert_eq!(
            game.drop_piece(ShogiKind::Lance, Square::new(0, 2)),
            Err(GameError::DropViolation(DropViolation::DeadPiece))
        );
        assert!(game.drop_piece(ShogiKind::Lance, Square::new(1, 2)).is_ok());
    }

    #[test]
    fn test_drop_errors_leave_state_unchanged() {
        let mut game = ShogiGame::new();
        let before = game.clone();
        assert_eq!(
            game.drop_piece(ShogiKind::Gold, Square::new(4, 4)),
            Err(GameError::DropViolation(DropViolation::NotInHand))
        );
        game.add_to_hand(SENTE, ShogiKind::Gold).unwrap();
        assert_eq!(
            game.drop_piece(ShogiKind::Gold, Square::new(6, 4)),
            Err(GameError::DropViolation(DropViolation::Occupied))
        );
        assert_eq!(game.history().len(), before.history().len());
        assert_eq!(game.board(), before.board());
    }

    #[test]
    fn test_pawn_drop_mate_is_rejected() {
        let mut game = ShogiGame::from_layout("k8/2G6/G8/9/9/9/9/9/4K4", SENTE).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Pawn).unwrap();
        let before = game.clone();
        assert_eq!(
            game.drop_piece(ShogiKind::Pawn, Square::new(1, 0)),
            Err(GameError::DropViolation(DropViolation::PawnDropMate))
        );
        assert_eq!(game, before);
        assert!(!game.drop_targets(ShogiKind::Pawn).contains(Square::new(1, 0)));
    }

    #[test]
    fn test_pawn_drop_check_with_escape_is_allowed() {
        let mut game = ShogiGame::from_layout("k8/9/G8/9/9/9/9/9/4K4", SENTE).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Pawn).unwrap();
        let status = game.drop_piece(ShogiKind::Pawn, Square::new(1, 0)).unwrap();
        assert_eq!(status, Status::Check(GOTE));
    }

    #[test]
    fn test_gold_drop_mate_and_undo() {
        let mut game = ShogiGame::from_layout("4k4/9/4P4/9/9/9/9/9/4K4", SENTE).unwrap();
        game.add_to_hand(SENTE, ShogiKind::Gold).unwrap();
        let before = game.clone();

        let status = game.drop_piece(ShogiKind::Gold, Square::new(1, 4)).unwrap();
        assert_eq!(status, Status::Checkmate(GOTE));
        assert_eq!(game.drop_piece(ShogiKind::Gold, Square::new(3, 3)), Err(GameError::GameOver));

        assert_eq!(game.undo(), Status::ToMove(SENTE));
        assert_eq!(game, before);
    }

    #[test]
    fn test_optional_promotion_requires_a_choice() {
        let mut game = ShogiGame::from_layout("k8/9/9/4S4/9/9/9/9/4K4", SENTE).unwrap();
        let (from, to) = (Square::new(3, 4), Square::new(2, 4));
        let before = game.clone();
        assert_eq!(game.apply_move(from, to, None), Err(GameError::PromotionChoiceRequired));
        assert_eq!(game, before);

        game.apply_move(from, to, Some(true)).unwrap();
        assert!(game.board().get(to).unwrap().promoted);
        assert_eq!(ShogiGame::notation(&game.history()[0]), "S5d5c+");

        game.undo();
        assert_eq!(game, before);

        game.apply_move(from, to, Some(false)).unwrap();
        assert!(!game.board().get(to).unwrap().promoted);
    }

    #[test]
    fn test_promotion_outside_zone_is_illegal() {
        let mut game = ShogiGame::from_layout("k8/9/9/9/4S4/9/9/9/4K4", SENTE).unwrap();
        let (from, to) = (Square::new(4, 4), Square::new(3, 4));
        assert_eq!(
            game.apply_move(from, to, Some(true)),
            Err(GameError::IllegalMove { from, to })
        );
        assert_eq!(game.apply_move(from, to, None), Ok(Status::ToMove(GOTE)));
    }

    #[test]
    fn test_forced_promotion() {
        let layout = "k8/4P4/9/4N4/9/9/9/9/4K4";
        let mut game = ShogiGame::from_layout(layout, SENTE).unwrap();
        let (from, to) = (Square::new(1, 4), Square::new(0, 4));
        assert_eq!(
            game.apply_move(from, to, Some(false)),
            Err(GameError::IllegalMove { from, to })
        );
        game.apply_move(from, to, None).unwrap();
        assert!(game.board().get(to).unwrap().promoted);

        let mut game = ShogiGame::from_layout(layout, SENTE).unwrap();
        game.apply_move(Square::new(3, 4), Square::new(1, 3), None).unwrap();
        assert!(game.board().get(Square::new(1, 3)).unwrap().promoted);
    }

    #[test]
    fn test_promoted_rook_steps_diagonally() {
        let mut game = ShogiGame::from_layout("k8/9/9/9/4+R4/9/9/9/4K4", SENTE).unwrap();
        let moves = game.select_square(Square::new(4, 4)).unwrap();
        // Fifteen orthogonal slides plus four diagonal steps.
        assert_eq!(moves.len(), 19);
        assert!(moves.contains(Square::new(5, 5)));
        assert!(!moves.contains(Square::new(6, 6)));
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Step(Square, Square),
        Drop(ShogiKind, Square),
    }

    fn all_actions(game: &mut ShogiGame) -> Vec<Action> {
        let side = game.side_to_move();
        let origins: Vec<Square> = game.board().pieces(side).map(|(sq, _)| sq).collect();
        let mut actions = Vec::new();
        for from in origins {
            actions.extend(game.legal_moves_from(from).iter().map(|c| Action::Step(from, c.to)));
        }
        let held: Vec<ShogiKind> = game.hand(side).iter().map(|(kind, _)| kind).collect();
        for kind in held {
            actions.extend(game.drop_targets(kind).iter().map(|c| Action::Drop(kind, c.to)));
        }
        actions
    }

    fn material(game: &ShogiGame) -> usize {
        let held: usize = game
            .hand(SENTE)
            .iter()
            .chain(game.hand(GOTE).iter())
            .map(|(_, n)| n as usize)
            .sum();
        game.board().piece_count() + held
    }

    #[test]
    fn test_random_playouts_undo_to_every_earlier_state() {
        for seed in 0..6 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = ShogiGame::new();
            let mut snapshots = Vec::new();

            for _ in 0..100 {
                if game.status().is_terminal() {
                    break;
                }
                let actions = all_actions(&mut game);
                let action = *actions.choose(&mut rng).unwrap();
                snapshots.push(game.clone());
                match action {
                    Action::Step(from, to) => match game.apply_move(from, to, None) {
                        Err(GameError::PromotionChoiceRequired) => {
                            game.apply_move(from, to, Some(rng.gen())).unwrap();
                        }
                        result => {
                            result.unwrap();
                        }
                    },
                    Action::Drop(kind, to) => {
                        game.drop_piece(kind, to).unwrap();
                    }
                }
                assert_eq!(material(&game), 40);
            }

            while let Some(snapshot) = snapshots.pop() {
                game.undo();
                assert_eq!(game, snapshot);
            }
            assert_eq!(game, ShogiGame::new());
        }
    }
}
