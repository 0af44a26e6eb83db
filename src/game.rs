//! A single entry point over the three board games.

use crate::chess::ChessGame;
use crate::constants::{Player, Variant};
use crate::error::{GameError, GameResult};
use crate::movelist::MoveList;
use crate::rules::{Rules, Status};
use crate::shogi::{ShogiGame, ShogiKind};
use crate::square::Square;
use crate::xiangqi::XiangqiGame;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Game {
    Chess(ChessGame),
    Xiangqi(XiangqiGame),
    Shogi(ShogiGame),
}

/// A game of `variant` in its standard starting position.
pub fn new_game(variant: Variant) -> Game {
    match variant {
        Variant::Chess => Game::Chess(ChessGame::new()),
        Variant::Xiangqi => Game::Xiangqi(XiangqiGame::new()),
        Variant::Shogi => Game::Shogi(ShogiGame::new()),
    }
}

// Runs the same expression against whichever game is inside.
macro_rules! dispatch {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            Game::Chess($game) => $body,
            Game::Xiangqi($game) => $body,
            Game::Shogi($game) => $body,
        }
    };
}

impl Game {
    pub fn variant(&self) -> Variant {
        match self {
            Game::Chess(_) => Variant::Chess,
            Game::Xiangqi(_) => Variant::Xiangqi,
            Game::Shogi(_) => Variant::Shogi,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.variant().dimensions()
    }

    pub fn select_square(&mut self, sq: Square) -> GameResult<MoveList> {
        dispatch!(self, g => g.select_square(sq))
    }

    pub fn apply_move(&mut self, from: Square, to: Square, promote: Option<bool>) -> GameResult<Status> {
        dispatch!(self, g => g.apply_move(from, to, promote))
    }

    pub fn undo(&mut self) -> Status {
        dispatch!(self, g => g.undo())
    }

    pub fn drop_piece(&mut self, kind: ShogiKind, to: Square) -> GameResult<Status> {
        match self {
            Game::Shogi(g) => g.drop_piece(kind, to),
            _ => Err(GameError::UnsupportedOperation("dropping pieces")),
        }
    }

    pub fn status(&self) -> Status {
        dispatch!(self, g => g.status())
    }

    pub fn side_to_move(&self) -> Player {
        dispatch!(self, g => g.side_to_move())
    }

    pub fn history_len(&self) -> usize {
        dispatch!(self, g => g.history().len())
    }

    /// Every move so far in the game's own notation.
    pub fn move_list(&self) -> Vec<String> {
        match self {
            Game::Chess(g) => g.history().iter().map(ChessGame::notation).collect(),
            Game::Xiangqi(g) => g.history().iter().map(XiangqiGame::notation).collect(),
            Game::Shogi(g) => g.history().iter().map(ShogiGame::notation).collect(),
        }
    }

    pub fn reset(&mut self) {
        dispatch!(self, g => g.reset())
    }

    /// The board as text, followed by pieces in hand for shogi.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        dispatch!(self, g => write!(f, "{}", g.board()))?;
        if let Game::Shogi(g) = self {
            for player in [Player::South, Player::North] {
                write!(f, "\n{} in hand:", player.name(Variant::Shogi))?;
                let hand = g.hand(player);
                if hand.is_empty() {
                    write!(f, " -")?;
                }
                for (kind, count) in hand.iter() {
                    write!(f, " {:?}x{}", kind, count)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_dimensions_and_first_mover() {
        for (variant, dims) in [
            (Variant::Chess, (8, 8)),
            (Variant::Xiangqi, (10, 9)),
            (Variant::Shogi, (9, 9)),
        ] {
            let game = new_game(variant);
            assert_eq!(game.dimensions(), dims);
            assert_eq!(game.side_to_move(), Player::South);
            assert_eq!(game.status(), Status::ToMove(Player::South));
            assert_eq!(game.history_len(), 0);
        }
    }

    #[test]
    fn test_drop_is_shogi_only() {
        let mut chess = new_game(Variant::Chess);
        assert_eq!(
            chess.drop_piece(ShogiKind::Pawn, Square::new(4, 4)),
            Err(GameError::UnsupportedOperation("dropping pieces"))
        );
    }

    #[test]
    fn test_apply_undo_and_reset() {
        let mut game = new_game(Variant::Chess);
        let start = game.clone();
        game.apply_move(Square::new(6, 4), Square::new(4, 4), None).unwrap();
        assert_eq!(game.move_list(), vec!["e2e4".to_string()]);
        assert_eq!(game.side_to_move(), Player::North);

        game.undo();
        assert_eq!(game, start);
        // Undo on an empty history is a no-op.
        assert_eq!(game.undo(), Status::ToMove(Player::South));

        game.apply_move(Square::new(6, 4), Square::new(4, 4), None).unwrap();
        game.reset();
        assert_eq!(game, start);
    }

    #[test]
    fn test_errors_leave_game_unchanged() {
        let mut game = new_game(Variant::Xiangqi);
        let start = game.clone();
        assert_eq!(
            game.apply_move(Square::new(10, 0), Square::new(9, 0), None),
            Err(GameError::InvalidSquare(Square::new(10, 0)))
        );
        assert_eq!(
            game.apply_move(Square::new(0, 0), Square::new(1, 0), None),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(
            game.apply_move(Square::new(4, 4), Square::new(5, 4), None),
            Err(GameError::EmptySquare(Square::new(4, 4)))
        );
        assert_eq!(
            game.apply_move(Square::new(9, 0), Square::new(5, 1), None),
            Err(GameError::IllegalMove {
                from: Square::new(9, 0),
                to: Square::new(5, 1)
            })
        );
        assert_eq!(game, start);
    }

    #[test]
    fn test_render_shows_hands_for_shogi() {
        let shogi = new_game(Variant::Shogi).render();
        assert!(shogi.contains("Sente in hand: -"));
        assert!(shogi.contains("Gote in hand: -"));
        let chess = new_game(Variant::Chess).render();
        assert!(!chess.contains("in hand"));
        assert!(chess.starts_with(&ChessGame::new().board().to_string()));
    }

    #[test]
    fn test_render_lists_captured_pieces_in_hand() {
        let mut game = new_game(Variant::Shogi);
        let (rows, cols) = game.dimensions();
        let sq = |c: &str| Square::from_coord(c, rows, cols).unwrap();
        // Open the bishops' diagonals, then trade bishops.
        game.apply_move(sq("c3"), sq("c4"), None).unwrap();
        game.apply_move(sq("g7"), sq("g6"), None).unwrap();
        game.apply_move(sq("b2"), sq("h8"), Some(false)).unwrap();
        let text = game.render();
        assert!(text.contains("Sente in hand: Bishopx1"));
        assert!(text.contains("Gote in hand: -"));
    }
}
