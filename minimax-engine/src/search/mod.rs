//! Search functions.

mod minimax;
mod tree;

pub use minimax::*;
pub use tree::*;

use std::fmt::{self, Display};
use std::time::Duration;

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::coretypes::{Color, Depth, Score};

/// Longest line a search can produce.
pub const MAX_LINE_LEN: usize = Depth::MAX.plies() as usize;

/// Line is a sequence of moves from the searched root to some node.
pub type Line<M> = ArrayVec<M, MAX_LINE_LEN>;

/// Format a line as space separated moves.
pub fn display<M: Display>(line: &[M]) -> String {
    line.iter()
        .map(|move_| move_.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A line and the absolute score of the position it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath<M> {
    pub path: Line<M>,
    pub score: Score,
}

impl<M: Copy> ScoredPath<M> {
    pub fn new(path: Line<M>, score: Score) -> Self {
        Self { path, score }
    }

    /// The move to play from the root, or None for the root itself.
    pub fn first_move(&self) -> Option<M> {
        self.path.first().copied()
    }
}

impl<M: Display> Display for ScoredPath<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", display(&self.path), self.score)
    }
}

/// Every path that shares the best score found for the root, plus search counters.
#[derive(Debug, Clone, PartialEq)]
pub struct TieSet<M> {
    pub paths: Vec<ScoredPath<M>>,
    /// Nodes visited, root included.
    pub nodes: u64,
    /// Leaves evaluated.
    pub leaves: u64,
}

impl<M: Copy> TieSet<M> {
    /// Shared score of all paths, None if empty.
    pub fn score(&self) -> Option<Score> {
        self.paths.first().map(|scored| scored.score)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pick one path uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ScoredPath<M>> {
        self.paths.choose(rng)
    }

    /// Distinct first moves among the tied paths, in search order.
    pub fn first_moves(&self) -> Vec<M>
    where
        M: Eq,
    {
        let mut moves: Vec<M> = Vec::new();
        for move_ in self.paths.iter().filter_map(ScoredPath::first_move) {
            if !moves.contains(&move_) {
                moves.push(move_);
            }
        }
        moves
    }
}

/// The results found from a player choosing a move.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<M> {
    /// The chosen line. Its first move was played.
    pub path: Line<M>,
    /// Absolute score of the chosen line (+White, -Black).
    pub score: Score,
    /// Number of lines that shared the best score.
    pub ties: usize,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth in plies that was searched.
    pub depth: Depth,
    /// Total number of nodes in the search tree, root included.
    pub nodes: u64,
    /// Total number of leaves evaluated.
    pub leaves: u64,
    /// Total time elapsed from the start to the end of the search.
    pub elapsed: Duration,
}

impl<M: Copy> SearchResult<M> {
    /// The move that was played. A result always holds a non-empty path.
    pub fn best_move(&self) -> Option<M> {
        self.path.first().copied()
    }

    /// Converts the score of the search into one that is relative to search's root player.
    pub fn relative_score(&self) -> Score {
        self.score * self.player.sign()
    }

    /// Returns the color who is leading in the search of the root position, or None if even.
    pub fn leading(&self) -> Option<Color> {
        if self.score > 0.0 {
            Some(Color::White)
        } else if self.score < 0.0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Get average nodes per second of search.
    pub fn nps(&self) -> f64 {
        (self.nodes as f64 / self.elapsed.as_secs_f64()).round()
    }
}

impl<M: Copy + Display> Display for SearchResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let best_move = self
            .best_move()
            .map_or_else(|| String::from("none"), |move_| move_.to_string());

        let mut displayed = String::new();
        displayed.push_str("SearchResult {\n");
        displayed.push_str(&format!("    best_move: {}\n", best_move));
        displayed.push_str(&format!("    abs_score: {}\n", self.score));
        displayed.push_str(&format!("    path     : {}\n", display(&self.path)));
        displayed.push_str(&format!("    ties     : {}\n", self.ties));
        displayed.push_str(&format!("    player   : {}\n", self.player));
        displayed.push_str(&format!("    depth    : {}\n", self.depth));
        displayed.push_str(&format!("    nodes    : {}\n", self.nodes));
        displayed.push_str(&format!("    leaves   : {}\n", self.leaves));
        displayed.push_str(&format!("    nps      : {}\n", self.nps()));
        displayed.push_str(&format!(
            "    elapsed  : {}.{:03}s\n",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        ));
        displayed.push_str("}\n");

        write!(f, "{displayed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scored(moves: &[u8], score: Score) -> ScoredPath<u8> {
        ScoredPath::new(moves.iter().copied().collect(), score)
    }

    #[test]
    fn tie_set_accessors() {
        let ties = TieSet {
            paths: vec![scored(&[1, 5], 2.0), scored(&[1, 6], 2.0), scored(&[3, 4], 2.0)],
            nodes: 9,
            leaves: 6,
        };
        assert_eq!(ties.score(), Some(2.0));
        assert_eq!(ties.len(), 3);
        assert_eq!(ties.first_moves(), vec![1, 3]);

        let mut rng = StdRng::seed_from_u64(3);
        let chosen = ties.choose(&mut rng).unwrap();
        assert!(ties.paths.contains(chosen));

        let empty: TieSet<u8> = TieSet {
            paths: Vec::new(),
            nodes: 1,
            leaves: 0,
        };
        assert!(empty.is_empty());
        assert_eq!(empty.score(), None);
        assert!(empty.choose(&mut rng).is_none());
    }

    #[test]
    fn search_result_scores() {
        let result = SearchResult {
            path: [7u8, 8].into_iter().collect(),
            score: -1.5,
            ties: 1,
            player: Color::Black,
            depth: Depth::new(2).unwrap(),
            nodes: 10,
            leaves: 7,
            elapsed: Duration::from_millis(4),
        };
        assert_eq!(result.best_move(), Some(7));
        assert_eq!(result.relative_score(), 1.5);
        assert_eq!(result.leading(), Some(Color::Black));
        assert!(result.to_string().contains("path     : 7 8"));
    }

    #[test]
    fn display_line() {
        assert_eq!(display(&[1, 2, 3]), "1 2 3");
        assert_eq!(display::<u8>(&[]), "");
        assert_eq!(scored(&[4, 2], 0.5).to_string(), "[4 2] 0.5");
    }
}
