//! Static evaluation of encoded positions.
//!
//! Every evaluator returns an absolute score: White is the maxing player and
//! Black the minning player, so +3.0 is winning for White and -3.0 for Black.
//! Evaluators must be pure functions of the vector they are given; search
//! relies on this to be repeatable.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::coretypes::Score;
use crate::encoder::{FixedVector, PieceCodes};

/// Leaf evaluation capability.
pub trait Evaluator {
    fn evaluate(&self, features: &FixedVector) -> Score;
}

impl<F> Evaluator for F
where
    F: Fn(&FixedVector) -> Score,
{
    fn evaluate(&self, features: &FixedVector) -> Score {
        self(features)
    }
}

/// Material value per piece kind, in pawns.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PieceValues {
    pub pawn: Score,
    pub knight: Score,
    pub bishop: Score,
    pub rook: Score,
    pub queen: Score,
    pub king: Score,
}

impl PieceValues {
    /// Pawn 1, Knight 3, Bishop 3, Rook 5, Queen 9. The king is never captured
    /// and is worth nothing.
    pub const fn standard() -> Self {
        Self {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.0,
            rook: 5.0,
            queen: 9.0,
            king: 0.0,
        }
    }
}

impl Default for PieceValues {
    fn default() -> Self {
        Self::standard()
    }
}

/// Sums material of both sides: White's material minus Black's.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialEvaluator {
    // Signed value for every possible i8 code, indexed by `code as u8`.
    table: [Score; 256],
}

impl MaterialEvaluator {
    /// `codes` must be the piece codes the evaluated vectors were encoded with.
    pub fn new(codes: PieceCodes, values: PieceValues) -> Self {
        let mut table = [0.0; 256];
        let pairs = [
            (codes.pawn, values.pawn),
            (codes.knight, values.knight),
            (codes.bishop, values.bishop),
            (codes.rook, values.rook),
            (codes.queen, values.queen),
            (codes.king, values.king),
        ];
        for (code, value) in pairs {
            table[code as u8 as usize] = value;
            table[code.wrapping_neg() as u8 as usize] = -value;
        }
        table[0] = 0.0;
        Self { table }
    }

    pub fn value_of(&self, signed_code: i8) -> Score {
        self.table[signed_code as u8 as usize]
    }
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        Self::new(PieceCodes::standard(), PieceValues::standard())
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, features: &FixedVector) -> Score {
        features
            .squares()
            .iter()
            .map(|code| self.value_of(*code))
            .sum()
    }
}

/// Deterministic pseudo-random scores in `[0, 100)`.
///
/// Scores are a hash of the vector and a seed, so repeated evaluation of one
/// position always agrees. The hash is std's `DefaultHasher`, whose algorithm
/// may change between Rust releases, so scores are only reproducible with the
/// same toolchain. Useful as a weak opponent and for exercising the game loop
/// without any chess knowledge.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct NoiseEvaluator {
    seed: u64,
}

impl NoiseEvaluator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Evaluator for NoiseEvaluator {
    fn evaluate(&self, features: &FixedVector) -> Score {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        features.hash(&mut hasher);
        (hasher.finish() % 100) as Score
    }
}
