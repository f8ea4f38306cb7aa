//! Game structure.

use chess::ChessMove;
use rand::Rng;

use crate::coretypes::{Color, Depth};
use crate::error::{self, ErrorKind};
use crate::evaluation::Evaluator;
use crate::info;
use crate::player::Player;
use crate::position::{ChessPosition, Outcome, Position};
use crate::search::{self, SearchResult};

/// Game contains information for an in progress game:
/// The base position the game started from and the current position, which
/// carries the sequence of moves played since the base.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    base_position: ChessPosition,
    position: ChessPosition,
}

impl Game {
    /// Create a new Game starting from `position`. Moves already pushed onto
    /// `position` are kept as part of the base.
    pub fn new(position: ChessPosition) -> Self {
        Self {
            base_position: position.clone(),
            position,
        }
    }

    /// Create a new game in the standard chess start position.
    pub fn start_position() -> Self {
        Self::new(ChessPosition::start_position())
    }

    pub fn from_fen(fen: &str) -> error::Result<Self> {
        ChessPosition::parse_fen(fen).map(Self::new)
    }

    pub fn base_position(&self) -> &ChessPosition {
        &self.base_position
    }

    pub fn position(&self) -> &ChessPosition {
        &self.position
    }

    /// Moves played since the base position, oldest first.
    pub fn moves(&self) -> Vec<ChessMove> {
        self.position
            .moves()
            .skip(self.base_position.ply())
            .collect()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.position.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.position.is_terminal()
    }

    /// Apply a move given in coordinate notation, such as `e2e4` or `e7e8q`.
    pub fn apply_move(&mut self, input: &str) -> error::Result<ChessMove> {
        if let Some(outcome) = self.outcome() {
            return Err((ErrorKind::GameOver, outcome).into());
        }
        let move_ = self.position.parse_move(input)?;
        self.position.push_legal(move_)?;
        Ok(move_)
    }

    /// Take back the last move played since the base position.
    pub fn undo(&mut self) -> Option<ChessMove> {
        if self.position.ply() > self.base_position.ply() {
            self.position.pop()
        } else {
            None
        }
    }

    /// Let `player` search `depth` plies and play its chosen move.
    pub fn play_turn<E: Evaluator, R: Rng>(
        &mut self,
        player: &mut Player<E, R>,
        depth: Depth,
    ) -> error::Result<SearchResult<ChessMove>> {
        if let Some(outcome) = self.outcome() {
            return Err((ErrorKind::GameOver, outcome).into());
        }
        player.choose_move(&mut self.position, depth)
    }

    /// Alternate turns between `white` and `black` until the game ends or
    /// `max_plies` more moves have been played. Returns the outcome, or None if
    /// the ply limit was reached first.
    pub fn play_out<E1, R1, E2, R2>(
        &mut self,
        white: &mut Player<E1, R1>,
        black: &mut Player<E2, R2>,
        depth: Depth,
        max_plies: usize,
        debug: bool,
    ) -> error::Result<Option<Outcome>>
    where
        E1: Evaluator,
        R1: Rng,
        E2: Evaluator,
        R2: Rng,
    {
        for _ in 0..max_plies {
            if self.is_over() {
                break;
            }
            let mover = self.position.side_to_move();
            let result = match mover {
                Color::White => self.play_turn(white, depth)?,
                Color::Black => self.play_turn(black, depth)?,
            };
            info::debug(
                debug,
                &format!(
                    "ply {} {} plays {} line {} score {} ties {} nodes {}",
                    self.moves().len(),
                    mover,
                    result
                        .best_move()
                        .map_or_else(|| String::from("none"), |move_| move_.to_string()),
                    search::display(&result.path),
                    result.score,
                    result.ties,
                    result.nodes,
                ),
            )?;
        }

        let outcome = self.outcome();
        if let Some(outcome) = outcome {
            info::debug(debug, &format!("game over: {outcome}"))?;
        }
        Ok(outcome)
    }

    /// Numbered coordinate movetext followed by the result token,
    /// or `*` while the game is unfinished.
    pub fn movetext(&self) -> String {
        let mut tokens = Vec::new();
        let mut number = 1;
        let mut mover = self.base_position.side_to_move();

        for (index, move_) in self.moves().into_iter().enumerate() {
            match mover {
                Color::White => tokens.push(format!("{number}.")),
                Color::Black if index == 0 => tokens.push(format!("{number}...")),
                Color::Black => (),
            }
            tokens.push(move_.to_string());
            if mover == Color::Black {
                number += 1;
            }
            mover = !mover;
        }

        let result = self.outcome().map_or("*", |outcome| outcome.result());
        tokens.push(result.to_string());
        tokens.join(" ")
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Convert a position to a Game with no past moves.
impl From<ChessPosition> for Game {
    fn from(position: ChessPosition) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::MaterialEvaluator;
    use crate::player::PlayerBuilder;

    #[test]
    fn fools_mate_movetext() {
        let mut game = Game::start_position();
        for input in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.apply_move(input).unwrap();
        }
        assert_eq!(
            game.outcome(),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert_eq!(game.movetext(), "1. f2f3 e7e5 2. g2g4 d8h4 0-1");

        let err = game.apply_move("a2a3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GameOver);
    }

    #[test]
    fn unfinished_movetext_from_black() {
        let mut game =
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(game.movetext(), "*");
        game.apply_move("e7e5").unwrap();
        game.apply_move("g1f3").unwrap();
        assert_eq!(game.movetext(), "1... e7e5 2. g1f3 *");
        assert_eq!(game.moves().len(), 2);
    }

    #[test]
    fn apply_move_rejects_bad_input() {
        let mut game = Game::start_position();
        assert_eq!(
            game.apply_move("e2e5").unwrap_err().kind(),
            ErrorKind::IllegalMove
        );
        assert_eq!(
            game.apply_move("castle").unwrap_err().kind(),
            ErrorKind::ParseMove
        );
        assert_eq!(game.position(), game.base_position());
    }

    #[test]
    fn undo_stops_at_base() {
        let mut game = Game::start_position();
        let played = game.apply_move("d2d4").unwrap();
        assert_eq!(game.undo(), Some(played));
        assert_eq!(game.undo(), None);
        assert_eq!(game.position(), game.base_position());
    }

    #[test]
    fn play_out_respects_ply_limit() {
        let builder = PlayerBuilder::new().seed(11);
        let mut white = builder.build(MaterialEvaluator::default());
        let mut black = builder.build(MaterialEvaluator::default());
        let mut game = Game::start_position();

        let depth = Depth::new(1).unwrap();
        let outcome = game.play_out(&mut white, &mut black, depth, 6, false).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(game.moves().len(), 6);
        assert!(game.movetext().starts_with("1. "));
        assert!(game.movetext().ends_with(" *"));
    }

    #[test]
    fn play_turn_after_game_over() {
        // Black is already checkmated.
        let mut game = Game::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        let mut player = PlayerBuilder::new().build(MaterialEvaluator::default());
        let err = game.play_turn(&mut player, Depth::new(1).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GameOver);
        assert_eq!(game.movetext(), "1-0");

        let mut black = PlayerBuilder::new().build(MaterialEvaluator::default());
        let outcome = game.play_out(&mut player, &mut black, Depth::new(2).unwrap(), 10, false);
        assert_eq!(
            outcome.unwrap(),
            Some(Outcome::Checkmate {
                winner: Color::White
            })
        );
    }
}
