//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! Counts the number of move paths of an exact length by pushing and popping
//! every legal move. Used to check a `Position` implementation against known
//! counts and to check that pushes are always undone.

use std::ops::{Add, AddAssign};

use crate::coretypes::Depth;
use crate::position::Position;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

// Count the number of nodes at a certain depth.
// Only positions without legal moves end a path early, so draws by rule are
// still expanded. This matches published perft tables.
pub fn perft<P: Position>(position: &mut P, depth: Depth) -> PerftInfo {
    let remaining = match depth.decrement() {
        Some(remaining) => remaining,
        None => return PerftInfo::new(1),
    };

    let legal_moves = position.legal_moves();
    if remaining.is_zero() {
        return PerftInfo::new(legal_moves.len() as u64);
    }

    let mut perft_info = PerftInfo::default();
    for legal_move in legal_moves {
        position.push(legal_move);
        perft_info += perft(position, remaining);
        position.pop();
    }
    perft_info
}

/// Perft split by root move, in enumeration order.
pub fn divide<P: Position>(position: &mut P, depth: Depth) -> Vec<(P::Move, PerftInfo)> {
    let remaining = match depth.decrement() {
        Some(remaining) => remaining,
        None => return Vec::new(),
    };

    let mut divided = Vec::new();
    for legal_move in position.legal_moves() {
        position.push(legal_move);
        divided.push((legal_move, perft(position, remaining)));
        position.pop();
    }
    divided
}
