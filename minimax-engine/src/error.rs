//! Minimax Engine error type.

use std::error;
use std::fmt::{self, Display};
use std::io;
use std::result;

/// Minimax Engine generic result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors for Minimax engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A search was requested from a position with no legal continuation.
    /// The game is already over.
    NoLegalMove,
    /// Requested depth is negative, fractional, or too deep.
    InvalidDepth,
    /// Incrementally maintained encoding differs from a full rebuild.
    /// This is a bug, never an expected runtime condition.
    EncodingMismatch,

    /// Fen string could not be parsed into a position.
    Fen,
    /// A move was given that is not legal in the current position.
    IllegalMove,
    /// Move string could not be parsed.
    ParseMove,
    /// A move was requested after the game finished.
    GameOver,
    /// Reading or writing a stream failed.
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoLegalMove => "no legal move",
            ErrorKind::InvalidDepth => "invalid depth",
            ErrorKind::EncodingMismatch => "encoding mismatch",

            ErrorKind::Fen => "fen",
            ErrorKind::IllegalMove => "illegal move",
            ErrorKind::ParseMove => "parse move malformed",
            ErrorKind::GameOver => "game over",
            ErrorKind::Io => "io",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary and general error type for the Minimax Engine.
#[derive(Debug)]
pub enum Error {
    Simple(ErrorKind),
    Message(ErrorKind, String),
    Custom(ErrorKind, Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub fn new<E>(error_kind: ErrorKind, inner_error: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::Custom(error_kind, inner_error.into())
    }

    /// Returns the kind of this error regardless of any attached detail.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(error_kind) => *error_kind,
            Error::Message(error_kind, _) => *error_kind,
            Error::Custom(error_kind, _) => *error_kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Simple(error_kind) => {
                write!(f, "{error_kind}")
            }
            Error::Message(error_kind, string) => {
                write!(f, "{error_kind}: {string}")
            }
            Error::Custom(error_kind, ref box_error) => {
                write!(f, "{error_kind}, error: {}", *box_error)
            }
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Custom(ErrorKind::Io, error.into())
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_survives_detail() {
        let simple: Error = ErrorKind::NoLegalMove.into();
        let message: Error = (ErrorKind::InvalidDepth, "-1").into();
        let custom = Error::new(ErrorKind::Io, "pipe closed");

        assert_eq!(simple.kind(), ErrorKind::NoLegalMove);
        assert_eq!(message.kind(), ErrorKind::InvalidDepth);
        assert_eq!(custom.kind(), ErrorKind::Io);
    }

    #[test]
    fn display_format() {
        let message: Error = (ErrorKind::InvalidDepth, "0.5").into();
        assert_eq!(message.to_string(), "invalid depth: 0.5");
        let simple: Error = ErrorKind::EncodingMismatch.into();
        assert_eq!(simple.to_string(), "encoding mismatch");
    }
}
