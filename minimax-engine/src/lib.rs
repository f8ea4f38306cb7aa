pub mod coretypes;
pub mod encoder;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod info;
pub mod perft;
pub mod player;
pub mod position;
pub mod search;

pub use coretypes::{Color, Depth, Score};
pub use encoder::{BoardEncoder, FixedVector, PieceCodes};
pub use error::{Error, ErrorKind};
pub use evaluation::{Evaluator, MaterialEvaluator, NoiseEvaluator, PieceValues};
pub use game::Game;
pub use player::{Player, PlayerBuilder};
pub use position::{ChessPosition, Outcome, Position};
pub use search::{SearchResult, SearchTree};
