//! Core types shared by every part of the engine.

use std::convert::TryFrom;
use std::fmt::{self, Display};
use std::ops::Not;
use std::str::FromStr;

use crate::error::{self, ErrorKind};

/// Number of squares on a chess board.
pub const NUM_SQUARES: usize = 64;
/// Length of the feature vector produced for every position.
pub const NUM_FEATURES: usize = 70;

/// Index of the side to move entry in a feature vector.
pub const SIDE_TO_MOVE_INDEX: usize = 64;
/// Index of the first castling rights entry in a feature vector.
/// Order: White king-side, White queen-side, Black king-side, Black queen-side.
pub const CASTLING_INDEX: usize = 65;
/// Index of the en passant target square entry in a feature vector.
pub const EN_PASSANT_INDEX: usize = 69;
/// Value of the en passant entry when no en passant capture is available.
pub const NO_EN_PASSANT: i8 = -1;

/// A static evaluation. Positive values favor White, negative values favor Black.
pub type Score = f64;

/// The two sides of a chess game. White maximizes, Black minimizes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns true if this side picks the greatest score among its choices.
    pub const fn is_maximizer(&self) -> bool {
        matches!(self, Color::White)
    }

    /// Sign used to convert an absolute score into one relative to this side.
    pub const fn sign(&self) -> Score {
        match self {
            Color::White => 1.0,
            Color::Black => -1.0,
        }
    }

    /// Returns true if `candidate` is strictly better than `current` for this side.
    pub fn prefers(&self, candidate: Score, current: Score) -> bool {
        match self {
            Color::White => candidate > current,
            Color::Black => candidate < current,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl From<chess::Color> for Color {
    fn from(color: chess::Color) -> Self {
        match color {
            chess::Color::White => Color::White,
            chess::Color::Black => Color::Black,
        }
    }
}

impl From<Color> for chess::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::White => chess::Color::White,
            Color::Black => chess::Color::Black,
        }
    }
}

/// Search depth, counted in plies (half moves).
/// A depth of 1 expands exactly one move of the side to move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Depth(pub(crate) u32);

impl Depth {
    /// Deepest search accepted. The tree grows exponentially, so anything deeper
    /// than this cannot complete in practice.
    pub const MAX: Depth = Depth(16);
    pub const ZERO: Depth = Depth(0);

    /// Create a depth, rejecting values beyond `Depth::MAX`.
    pub fn new(plies: u32) -> error::Result<Self> {
        if plies > Self::MAX.0 {
            Err((
                ErrorKind::InvalidDepth,
                format!("{plies} plies exceeds maximum of {}", Self::MAX.0),
            )
                .into())
        } else {
            Ok(Self(plies))
        }
    }

    pub const fn plies(&self) -> u32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Depth remaining after descending one ply, or None at zero.
    pub const fn decrement(&self) -> Option<Depth> {
        match self.0 {
            0 => None,
            n => Some(Depth(n - 1)),
        }
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Depth {
    type Error = error::Error;
    fn try_from(plies: u32) -> Result<Self, Self::Error> {
        Self::new(plies)
    }
}

impl TryFrom<i64> for Depth {
    type Error = error::Error;
    fn try_from(plies: i64) -> Result<Self, Self::Error> {
        let plies = u32::try_from(plies)
            .map_err(|_| error::Error::from((ErrorKind::InvalidDepth, plies)))?;
        Self::new(plies)
    }
}

/// Fractional depths are rejected; depth is a whole number of plies.
impl TryFrom<f64> for Depth {
    type Error = error::Error;
    fn try_from(plies: f64) -> Result<Self, Self::Error> {
        if !plies.is_finite() || plies < 0.0 || plies.fract() != 0.0 {
            return Err((ErrorKind::InvalidDepth, plies).into());
        }
        if plies > Self::MAX.0 as f64 {
            return Err((ErrorKind::InvalidDepth, plies).into());
        }
        Self::new(plies as u32)
    }
}

impl FromStr for Depth {
    type Err = error::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(plies) => Self::try_from(plies),
            Err(_) => match s.parse::<f64>() {
                Ok(plies) => Self::try_from(plies),
                Err(_) => Err((ErrorKind::InvalidDepth, s).into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_not_and_sign() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
        assert_eq!(Color::White.sign() * 3.0, 3.0);
        assert_eq!(Color::Black.sign() * 3.0, -3.0);
        assert!(Color::White.is_maximizer());
        assert!(!Color::Black.is_maximizer());
    }

    #[test]
    fn color_prefers() {
        assert!(Color::White.prefers(2.0, 1.0));
        assert!(!Color::White.prefers(1.0, 1.0));
        assert!(Color::Black.prefers(-2.0, 1.0));
        assert!(!Color::Black.prefers(1.0, 1.0));
    }

    #[test]
    fn depth_accepts_whole_plies() {
        assert_eq!(Depth::try_from(3i64).unwrap().plies(), 3);
        assert_eq!(Depth::try_from(2.0f64).unwrap().plies(), 2);
        assert_eq!("4".parse::<Depth>().unwrap().plies(), 4);
        assert_eq!("0".parse::<Depth>().unwrap(), Depth::ZERO);
    }

    #[test]
    fn depth_rejects_invalid() {
        for bad in ["-1", "0.5", "1.5", "NaN", "inf", "deep", "17"] {
            let err = bad.parse::<Depth>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDepth, "input {bad}");
        }
        assert!(Depth::try_from(-2i64).is_err());
        assert!(Depth::try_from(f64::NEG_INFINITY).is_err());
        assert!(Depth::new(Depth::MAX.plies() + 1).is_err());
    }

    #[test]
    fn depth_decrement() {
        let depth = Depth::new(1).unwrap();
        assert_eq!(depth.decrement(), Some(Depth::ZERO));
        assert_eq!(Depth::ZERO.decrement(), None);
    }
}
