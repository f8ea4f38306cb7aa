//! Board encoding into a fixed-length feature vector.
//!
//! Layout of a [`FixedVector`]:
//!
//! | index     | meaning                                                         |
//! |-----------|-----------------------------------------------------------------|
//! | `0..64`   | signed piece code per square, a1 = 0, h8 = 63, 0 when empty      |
//! | `64`      | side to move, 1 for White and 0 for Black                       |
//! | `65..69`  | castling rights: White king/queen-side, Black king/queen-side   |
//! | `69`      | en passant target square index, or -1                           |
//!
//! The layout is the only serialization boundary of the engine. Evaluators are
//! tuned against it, so it must not change.

use std::fmt::{self, Display};
use std::ops::Index;

use arrayvec::ArrayVec;
use chess::{Board, ChessMove, File, Piece, Square, ALL_SQUARES};

use crate::coretypes::{Color, CASTLING_INDEX, EN_PASSANT_INDEX, NO_EN_PASSANT};
use crate::coretypes::{NUM_FEATURES, NUM_SQUARES, SIDE_TO_MOVE_INDEX};
use crate::error::{self, ErrorKind};

/// Squares whose contents change when a move is applied.
/// At most four: a castling move touches both king and rook squares.
pub type TouchedSquares = ArrayVec<Square, 4>;

/// Fixed-length numeric description of a position, consumed by evaluators.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FixedVector([i8; NUM_FEATURES]);

impl FixedVector {
    /// A vector with every entry zero, except for "no en passant".
    pub const fn empty() -> Self {
        let mut inner = [0; NUM_FEATURES];
        inner[EN_PASSANT_INDEX] = NO_EN_PASSANT;
        Self(inner)
    }

    /// Wrap raw values. Used for positions that are not backed by a chess board.
    pub const fn from_array(inner: [i8; NUM_FEATURES]) -> Self {
        Self(inner)
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    /// Signed piece codes of all 64 squares.
    pub fn squares(&self) -> &[i8] {
        &self.0[..NUM_SQUARES]
    }

    pub fn side_to_move(&self) -> Color {
        match self.0[SIDE_TO_MOVE_INDEX] {
            0 => Color::Black,
            _ => Color::White,
        }
    }

    /// Castling rights as [White king-side, White queen-side, Black king-side, Black queen-side].
    pub fn castling(&self) -> [bool; 4] {
        let mut rights = [false; 4];
        for (offset, right) in rights.iter_mut().enumerate() {
            *right = self.0[CASTLING_INDEX + offset] != 0;
        }
        rights
    }

    pub fn en_passant(&self) -> Option<usize> {
        match self.0[EN_PASSANT_INDEX] {
            NO_EN_PASSANT => None,
            index => Some(index as usize),
        }
    }

    /// Indices at which two vectors disagree.
    pub fn diff(&self, other: &FixedVector) -> Vec<usize> {
        self.0
            .iter()
            .zip(other.0.iter())
            .enumerate()
            .filter(|(_, (lhs, rhs))| lhs != rhs)
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for FixedVector {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for FixedVector {
    type Output = i8;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Display for FixedVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                write!(f, "{:>3}", self.0[rank * 8 + file])?;
            }
            writeln!(f)?;
        }
        let [wk, wq, bk, bq] = self.castling();
        write!(
            f,
            "turn {} castling {}{}{}{} ep {}",
            self.0[SIDE_TO_MOVE_INDEX],
            wk as u8,
            wq as u8,
            bk as u8,
            bq as u8,
            self.0[EN_PASSANT_INDEX],
        )
    }
}

/// Unsigned integer code per piece kind. White pieces are encoded positive,
/// Black pieces negative.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PieceCodes {
    pub pawn: i8,
    pub knight: i8,
    pub bishop: i8,
    pub rook: i8,
    pub queen: i8,
    pub king: i8,
}

impl PieceCodes {
    /// Pawn 1, Knight 2, Bishop 3, Rook 4, Queen 5, King 6.
    pub const fn standard() -> Self {
        Self {
            pawn: 1,
            knight: 2,
            bishop: 3,
            rook: 4,
            queen: 5,
            king: 6,
        }
    }

    pub const fn code(&self, piece: Piece) -> i8 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }

    pub const fn signed(&self, piece: Piece, color: Color) -> i8 {
        match color {
            Color::White => self.code(piece),
            Color::Black => -self.code(piece),
        }
    }

    /// Reverse lookup of an unsigned code.
    pub fn piece(&self, code: i8) -> Option<Piece> {
        [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ]
        .into_iter()
        .find(|piece| self.code(*piece) == code)
    }
}

impl Default for PieceCodes {
    fn default() -> Self {
        Self::standard()
    }
}

/// Converts chess boards into [`FixedVector`]s, either from scratch or by
/// updating a previous vector after a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct BoardEncoder {
    codes: PieceCodes,
}

impl BoardEncoder {
    pub const fn new(codes: PieceCodes) -> Self {
        Self { codes }
    }

    pub const fn codes(&self) -> &PieceCodes {
        &self.codes
    }

    /// Full rebuild of a board's vector.
    pub fn encode(&self, board: &Board) -> FixedVector {
        let mut features = FixedVector::empty();
        for square in ALL_SQUARES {
            features.0[square.to_index()] = self.square_code(board, square);
        }
        self.write_metadata(&mut features, board);
        features
    }

    /// Rewrite the `touched` squares and the metadata entries of `features` from `board`.
    /// Every other square is assumed unchanged since `features` was last correct.
    pub fn update(&self, features: &mut FixedVector, board: &Board, touched: &[Square]) {
        for square in touched {
            features.0[square.to_index()] = self.square_code(board, *square);
        }
        self.write_metadata(features, board);
    }

    /// Compare an incrementally maintained vector with a full rebuild.
    pub fn verify(&self, features: &FixedVector, board: &Board) -> error::Result<()> {
        let rebuilt = self.encode(board);
        if rebuilt == *features {
            Ok(())
        } else {
            Err((
                ErrorKind::EncodingMismatch,
                format!(
                    "entries {:?} differ from rebuild of {}",
                    features.diff(&rebuilt),
                    board
                ),
            )
                .into())
        }
    }

    fn square_code(&self, board: &Board, square: Square) -> i8 {
        match (board.piece_on(square), board.color_on(square)) {
            (Some(piece), Some(color)) => self.codes.signed(piece, color.into()),
            _ => 0,
        }
    }

    fn write_metadata(&self, features: &mut FixedVector, board: &Board) {
        features.0[SIDE_TO_MOVE_INDEX] = match Color::from(board.side_to_move()) {
            Color::White => 1,
            Color::Black => 0,
        };

        for (offset, color) in [chess::Color::White, chess::Color::Black]
            .into_iter()
            .enumerate()
        {
            let rights = board.castle_rights(color);
            features.0[CASTLING_INDEX + 2 * offset] = rights.has_kingside() as i8;
            features.0[CASTLING_INDEX + 2 * offset + 1] = rights.has_queenside() as i8;
        }

        features.0[EN_PASSANT_INDEX] =
            en_passant_target(board).map_or(NO_EN_PASSANT, |square| square.to_index() as i8);
    }
}

/// The board records the square of the pawn that may be captured en passant.
/// The target is the square that pawn skipped over.
pub fn en_passant_target(board: &Board) -> Option<Square> {
    let pawn = board.en_passant()?;
    match Color::from(board.side_to_move()) {
        Color::White => pawn.up(),
        Color::Black => pawn.down(),
    }
}

/// Squares that change contents when `move_` is applied to `board`.
/// Must be called before the move is made.
pub fn touched_squares(board: &Board, move_: ChessMove) -> TouchedSquares {
    let source = move_.get_source();
    let dest = move_.get_dest();
    let mut touched = TouchedSquares::new();
    touched.push(source);
    touched.push(dest);

    match board.piece_on(source) {
        Some(Piece::King) => {
            let from_file = source.get_file().to_index();
            let to_file = dest.get_file().to_index();
            if from_file.abs_diff(to_file) == 2 {
                let rank = source.get_rank();
                let (rook_from, rook_to) = match to_file > from_file {
                    true => (File::H, File::F),
                    false => (File::A, File::D),
                };
                touched.push(Square::make_square(rank, rook_from));
                touched.push(Square::make_square(rank, rook_to));
            }
        }
        Some(Piece::Pawn) => {
            // Diagonal pawn move onto an empty square captures en passant.
            if source.get_file() != dest.get_file() && board.piece_on(dest).is_none() {
                touched.push(Square::make_square(source.get_rank(), dest.get_file()));
            }
        }
        _ => (),
    }

    touched
}
