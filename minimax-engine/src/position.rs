//! Position capability consumed by search, and the chess board that implements it.
//!
//! Search only needs a mutable state it can step forward and back through.
//! [`ChessPosition`] composes the rules engine's `Board` with a history of prior
//! boards and a [`FixedVector`] that is updated in place on every push and pop.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, EMPTY};

use crate::coretypes::Color;
use crate::encoder::{self, BoardEncoder, FixedVector, TouchedSquares};
use crate::error::{self, ErrorKind};

/// Halfmoves without capture or pawn move after which a game is drawn.
pub const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;
/// Number of occurrences of one position that ends a game.
pub const FIVEFOLD_REPETITIONS: usize = 5;

/// Mutable game state that can be searched by making and unmaking moves.
///
/// `push` followed by `pop` must leave the position exactly as it was.
pub trait Position {
    type Move: Copy + Eq + Debug + Display;

    /// All legal moves, in the order they are expanded by search.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply a legal move.
    fn push(&mut self, move_: Self::Move);

    /// Revert the most recent push. Returns the reverted move, or None if
    /// no move has been pushed.
    fn pop(&mut self) -> Option<Self::Move>;

    /// True when the game is over and no further move may be made.
    fn is_terminal(&self) -> bool;

    fn side_to_move(&self) -> Color;

    /// Encoding of the current state, handed to evaluators at leaves.
    fn features(&self) -> &FixedVector;

    /// Check that `features` agrees with the state it describes.
    /// Positions that do not maintain their encoding incrementally have nothing to check.
    fn verify_features(&self) -> error::Result<()> {
        Ok(())
    }
}

/// Reason a game ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl Outcome {
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    /// Result token as written at the end of a movetext.
    pub const fn result(&self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }

    /// Numeric game label: 1 White wins, -1 Black wins, 0 drawn.
    pub const fn label(&self) -> i8 {
        match self.winner() {
            Some(Color::White) => 1,
            Some(Color::Black) => -1,
            None => 0,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            Outcome::Stalemate => write!(f, "draw by stalemate"),
            Outcome::InsufficientMaterial => write!(f, "draw by insufficient material"),
            Outcome::SeventyFiveMoves => write!(f, "draw by seventy-five-move rule"),
            Outcome::FivefoldRepetition => write!(f, "draw by fivefold repetition"),
        }
    }
}

/// State needed to take back one move.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Undo {
    board: Board,
    move_: ChessMove,
    touched: TouchedSquares,
    halfmoves: u32,
}

/// A chess position with push/pop history and an incrementally maintained encoding.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChessPosition {
    board: Board,
    encoder: BoardEncoder,
    features: FixedVector,
    halfmoves: u32,
    history: Vec<Undo>,
}

impl ChessPosition {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> Self {
        Self::with_encoder(board, BoardEncoder::default())
    }

    pub fn with_encoder(board: Board, encoder: BoardEncoder) -> Self {
        Self {
            board,
            encoder,
            features: encoder.encode(&board),
            halfmoves: 0,
            history: Vec::new(),
        }
    }

    /// Parse a position from Forsyth-Edwards Notation.
    /// The halfmove clock is kept so the seventy-five-move rule applies from it.
    pub fn parse_fen(fen: &str) -> error::Result<Self> {
        let board = Board::from_str(fen).map_err(|err| {
            error::Error::from((ErrorKind::Fen, format!("{}: {}", fen.trim(), err)))
        })?;
        let mut position = Self::from_board(board);
        position.halfmoves = fen
            .split_whitespace()
            .nth(4)
            .and_then(|clock| clock.parse().ok())
            .unwrap_or(0);
        Ok(position)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn encoder(&self) -> &BoardEncoder {
        &self.encoder
    }

    /// Halfmoves since the last capture or pawn move.
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// Moves pushed so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = ChessMove> + '_ {
        self.history.iter().map(|undo| undo.move_)
    }

    /// Number of pushed moves that can still be popped.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Push a move only if it is legal in this position.
    pub fn push_legal(&mut self, move_: ChessMove) -> error::Result<()> {
        if self.is_terminal() {
            return Err((ErrorKind::GameOver, move_).into());
        }
        if !self.board.legal(move_) {
            return Err((ErrorKind::IllegalMove, move_).into());
        }
        self.push(move_);
        Ok(())
    }

    /// Find the legal move written in coordinate notation, such as `e2e4` or `e7e8q`.
    pub fn parse_move(&self, input: &str) -> error::Result<ChessMove> {
        let input = input.trim().to_ascii_lowercase();
        let well_formed = (input.len() == 4 || input.len() == 5)
            && input.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !well_formed {
            return Err((ErrorKind::ParseMove, input).into());
        }

        self.legal_moves()
            .into_iter()
            .find(|move_| move_.to_string() == input)
            .ok_or_else(|| (ErrorKind::IllegalMove, input).into())
    }

    /// Reason the game is over, or None while it continues.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.board.status() {
            BoardStatus::Checkmate => {
                return Some(Outcome::Checkmate {
                    winner: !Color::from(self.board.side_to_move()),
                })
            }
            BoardStatus::Stalemate => return Some(Outcome::Stalemate),
            BoardStatus::Ongoing => (),
        }

        if self.is_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else if self.halfmoves >= SEVENTY_FIVE_MOVE_HALFMOVES {
            Some(Outcome::SeventyFiveMoves)
        } else if self.repetitions() >= FIVEFOLD_REPETITIONS {
            Some(Outcome::FivefoldRepetition)
        } else {
            None
        }
    }

    /// Neither side can deliver mate: bare kings, kings and a single knight,
    /// or kings and any number of bishops that all stand on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let kings = *self.board.pieces(Piece::King);
        let knights = *self.board.pieces(Piece::Knight);
        let bishops = *self.board.pieces(Piece::Bishop);
        let others = *self.board.combined() & !kings;

        if others == EMPTY {
            true
        } else if others == knights {
            knights.popcnt() == 1
        } else if others == bishops {
            let dark = bishops
                .filter(|square| {
                    (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 0
                })
                .count();
            dark == 0 || dark == bishops.popcnt() as usize
        } else {
            false
        }
    }

    /// Number of times the current position has occurred in this position's history,
    /// counting the current occurrence.
    pub fn repetitions(&self) -> usize {
        let hash = self.board.get_hash();
        1 + self
            .history
            .iter()
            .filter(|undo| undo.board.get_hash() == hash && undo.board == self.board)
            .count()
    }
}

impl Position for ChessPosition {
    type Move = ChessMove;

    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn push(&mut self, move_: ChessMove) {
        let touched = encoder::touched_squares(&self.board, move_);
        let is_capture = self.board.piece_on(move_.get_dest()).is_some() || touched.len() == 3;
        let is_pawn_move = self.board.piece_on(move_.get_source()) == Some(Piece::Pawn);

        self.history.push(Undo {
            board: self.board,
            move_,
            touched: touched.clone(),
            halfmoves: self.halfmoves,
        });

        self.board = self.board.make_move_new(move_);
        self.halfmoves = match is_capture || is_pawn_move {
            true => 0,
            false => self.halfmoves + 1,
        };
        self.encoder.update(&mut self.features, &self.board, &touched);
    }

    fn pop(&mut self) -> Option<ChessMove> {
        let undo = self.history.pop()?;
        self.board = undo.board;
        self.halfmoves = undo.halfmoves;
        self.encoder
            .update(&mut self.features, &self.board, &undo.touched);
        Some(undo.move_)
    }

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move().into()
    }

    fn features(&self) -> &FixedVector {
        &self.features
    }

    /// Compare the incremental encoding with a rebuild from the current board.
    fn verify_features(&self) -> error::Result<()> {
        self.encoder.verify(&self.features, &self.board)
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::start_position()
    }
}

impl From<Board> for ChessPosition {
    fn from(board: Board) -> Self {
        Self::from_board(board)
    }
}

impl FromStr for ChessPosition {
    type Err = error::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_fen(s)
    }
}

impl Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let index = rank * 8 + file;
                let square = chess::ALL_SQUARES[index];
                let symbol = match (self.board.piece_on(square), self.board.color_on(square)) {
                    (Some(piece), Some(color)) => piece.to_string(color),
                    _ => String::from("."),
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{}", self.board)
    }
}
