//! The legality filter and game state machine shared by chess, xiangqi and
//! shogi.
//!
//! A game supplies its geometry (`pseudo_legal`, `attacks_from`) and a
//! symmetric `make`/`unmake` pair; everything else is provided here. The
//! filter simulates each candidate with the same `make`/`unmake` used by
//! `apply_move` and `undo`, so a rejected candidate leaves the game exactly as
//! it was.

use crate::board::{Board, PieceKind};
use crate::constants::Player;
use crate::error::{GameError, GameResult};
use crate::movelist::MoveList;
use crate::r#move::{Candidate, MoveRecord};
use crate::square::Square;

/// Where a game stands after the last transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ToMove(Player),
    Check(Player),
    /// The given side is mated.
    Checkmate(Player),
    /// The given side has no legal move and is not in check.
    Stalemate(Player),
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Checkmate(_) | Status::Stalemate(_))
    }
}

pub trait Rules {
    type Kind: PieceKind;

    fn board(&self) -> &Board<Self::Kind>;

    fn side_to_move(&self) -> Player;

    fn status(&self) -> Status;

    fn status_mut(&mut self) -> &mut Status;

    fn history(&self) -> &[MoveRecord<Self::Kind>];

    fn history_mut(&mut self) -> &mut Vec<MoveRecord<Self::Kind>>;

    /// Pseudo-legal candidates for the piece on `from`.
    fn pseudo_legal(&self, from: Square, moves: &mut MoveList);

    /// Squares the piece on `from` attacks. Must not call back into the
    /// legality filter.
    fn attacks_from(&self, from: Square, moves: &mut MoveList) {
        self.pseudo_legal(from, moves)
    }

    /// Executes a candidate produced by `pseudo_legal` and flips the turn.
    /// Does not touch history or status.
    fn make(&mut self, from: Square, cand: Candidate, promote: bool) -> GameResult<MoveRecord<Self::Kind>>;

    /// Exact inverse of `make`.
    fn unmake(&mut self, record: MoveRecord<Self::Kind>);

    /// Extra check condition beyond plain attacks (xiangqi flying general).
    fn royal_exposed(&self, _player: Player) -> bool {
        false
    }

    /// Whether `player` has a legal move that does not start on the board.
    fn has_legal_drop(&mut self, _player: Player) -> bool {
        false
    }

    /// Decides whether a legal candidate promotes, given the caller's choice.
    fn resolve_promotion(&self, _from: Square, _cand: Candidate, _choice: Option<bool>) -> GameResult<bool> {
        Ok(false)
    }

    fn check_square(&self, sq: Square) -> GameResult<()> {
        if self.board().contains(sq) {
            Ok(())
        } else {
            Err(GameError::InvalidSquare(sq))
        }
    }

    /// Checks if `sq` is attacked by any piece of `by`.
    fn is_attacked(&self, sq: Square, by: Player) -> bool {
        self.board().pieces(by).any(|(from, _)| {
            let mut attacks = MoveList::new();
            self.attacks_from(from, &mut attacks);
            attacks.contains(sq)
        })
    }

    fn in_check(&self, player: Player) -> bool {
        match self.board().royal(player) {
            Some(king_sq) => self.is_attacked(king_sq, player.opponent()) || self.royal_exposed(player),
            None => false,
        }
    }

    /// Legal candidates for the piece on `from`.
    fn legal_moves_from(&mut self, from: Square) -> MoveList {
        let mut legal = MoveList::new();
        let owner = match self.board().get(from) {
            Some(piece) => piece.owner,
            None => return legal,
        };
        let mut pseudo = MoveList::new();
        self.pseudo_legal(from, &mut pseudo);
        for cand in pseudo.iter().copied() {
            let Ok(record) = self.make(from, cand, false) else {
                continue;
            };
            let safe = !self.in_check(owner);
            self.unmake(record);
            if safe {
                legal.add(cand);
            }
        }
        legal
    }

    fn has_legal_move(&mut self, player: Player) -> bool {
        let origins: Vec<Square> = self.board().pieces(player).map(|(sq, _)| sq).collect();
        origins.into_iter().any(|from| !self.legal_moves_from(from).is_empty()) || self.has_legal_drop(player)
    }

    fn evaluate_status(&mut self) -> Status {
        let side = self.side_to_move();
        let in_check = self.in_check(side);
        let can_move = self.has_legal_move(side);
        match (in_check, can_move) {
            (false, true) => Status::ToMove(side),
            (true, true) => Status::Check(side),
            (true, false) => Status::Checkmate(side),
            (false, false) => Status::Stalemate(side),
        }
    }

    fn refresh_status(&mut self) -> Status {
        let status = self.evaluate_status();
        *self.status_mut() = status;
        status
    }

    /// Legal destinations for the piece on `sq`; empty when the square is
    /// empty, holds an opponent piece, or the game is over.
    fn select_square(&mut self, sq: Square) -> GameResult<MoveList> {
        self.check_square(sq)?;
        if self.status().is_terminal() {
            return Ok(MoveList::new());
        }
        match self.board().get(sq) {
            Some(piece) if piece.owner == self.side_to_move() => Ok(self.legal_moves_from(sq)),
            _ => Ok(MoveList::new()),
        }
    }

    /// Validates and executes a move, then re-evaluates the status.
    fn apply_move(&mut self, from: Square, to: Square, promote: Option<bool>) -> GameResult<Status> {
        self.check_square(from)?;
        self.check_square(to)?;
        if self.status().is_terminal() {
            return Err(GameError::GameOver);
        }
        let piece = self.board().get(from).ok_or(GameError::EmptySquare(from))?;
        if piece.owner != self.side_to_move() {
            return Err(GameError::NotYourTurn);
        }
        let cand = self
            .legal_moves_from(from)
            .find(to)
            .ok_or(GameError::IllegalMove { from, to })?;
        let promote = self.resolve_promotion(from, cand, promote)?;
        let record = self.make(from, cand, promote)?;
        self.history_mut().push(record);
        Ok(self.refresh_status())
    }

    /// Reverts the most recent move; a no-op on an empty history.
    fn undo(&mut self) -> Status {
        match self.history_mut().pop() {
            Some(record) => {
                self.unmake(record);
                self.refresh_status()
            }
            None => self.status(),
        }
    }
}
