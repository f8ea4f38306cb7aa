//! Player wraps search, evaluation and tie-breaking into a single move chooser.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coretypes::Depth;
use crate::error::{self, ErrorKind};
use crate::evaluation::Evaluator;
use crate::position::Position;
use crate::search::{self, SearchResult, SearchTree, TieSet};

/// Depth used when none is configured.
pub const DEFAULT_DEPTH: Depth = Depth(2);

/// PlayerBuilder allows for parameters of a Player to be set once and reused
/// for every player built from it.
///
/// Default values:
///
/// * `depth`: 2 plies
/// * `seed`: None, ties are broken with an entropy seeded generator
/// * `verify_encoding`: false
/// * `materialize_tree`: true
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlayerBuilder {
    depth: Depth,
    seed: Option<u64>,
    verify_encoding: bool,
    materialize_tree: bool,
}

impl PlayerBuilder {
    /// Create a new default PlayerBuilder.
    pub fn new() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            seed: None,
            verify_encoding: false,
            materialize_tree: true,
        }
    }

    /// Create and return a new Player using `evaluator` at leaves.
    pub fn build<E: Evaluator>(&self, evaluator: E) -> Player<E, StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(evaluator, rng)
    }

    /// Create a Player that breaks ties with a caller supplied random source.
    pub fn build_with_rng<E: Evaluator, R: Rng>(&self, evaluator: E, rng: R) -> Player<E, R> {
        Player {
            evaluator,
            rng,
            depth: self.depth,
            verify_encoding: self.verify_encoding,
            materialize_tree: self.materialize_tree,
        }
    }

    /// Set the depth used by `Player::play`.
    pub fn depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    /// Fix the tie-breaking seed so that choices are repeatable.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the position's incremental encoding against a rebuild before every search.
    pub fn verify_encoding(mut self, verify_encoding: bool) -> Self {
        self.verify_encoding = verify_encoding;
        self
    }

    /// When false, search without building a tree. Results are identical.
    pub fn materialize_tree(mut self, materialize_tree: bool) -> Self {
        self.materialize_tree = materialize_tree;
        self
    }
}

impl Default for PlayerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Chooses moves by minimax search and plays them.
///
/// A player holds no position. The position is borrowed mutably for the length
/// of one call, so no other caller can touch it while a search runs.
#[derive(Debug, Clone)]
pub struct Player<E, R = StdRng> {
    evaluator: E,
    rng: R,
    depth: Depth,
    verify_encoding: bool,
    materialize_tree: bool,
}

impl<E, R> Player<E, R> {
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn set_depth(&mut self, depth: Depth) {
        self.depth = depth;
    }
}

impl<E: Evaluator, R: Rng> Player<E, R> {
    /// Choose a move at this player's configured depth and play it.
    pub fn play<P: Position>(&mut self, position: &mut P) -> error::Result<SearchResult<P::Move>> {
        self.choose_move(position, self.depth)
    }

    /// Search `depth` plies, pick one of the best lines uniformly at random,
    /// and push its first move onto `position`.
    ///
    /// Fails with `NoLegalMove` if the position is terminal and with
    /// `InvalidDepth` for a depth of zero, which cannot produce a move.
    pub fn choose_move<P: Position>(
        &mut self,
        position: &mut P,
        depth: Depth,
    ) -> error::Result<SearchResult<P::Move>> {
        let result = self.search(position, depth)?;
        let best_move = result
            .best_move()
            .ok_or((ErrorKind::NoLegalMove, "search returned an empty line"))?;
        position.push(best_move);
        Ok(result)
    }

    /// Like `choose_move`, but the position is left unchanged.
    pub fn search<P: Position>(
        &mut self,
        position: &mut P,
        depth: Depth,
    ) -> error::Result<SearchResult<P::Move>> {
        if depth.is_zero() {
            return Err((ErrorKind::InvalidDepth, "a move needs at least one ply").into());
        }
        let instant = Instant::now();
        let player = position.side_to_move();
        let ties = self.evaluate_choices(position, depth)?;

        let chosen = ties
            .choose(&mut self.rng)
            .ok_or((ErrorKind::NoLegalMove, "no line to choose from"))?
            .clone();

        Ok(SearchResult {
            path: chosen.path,
            score: chosen.score,
            ties: ties.len(),
            player,
            depth,
            nodes: ties.nodes,
            leaves: ties.leaves,
            elapsed: instant.elapsed(),
        })
    }

    /// Every line sharing the best score for the side to move, without choosing.
    pub fn evaluate_choices<P: Position>(
        &self,
        position: &mut P,
        depth: Depth,
    ) -> error::Result<TieSet<P::Move>> {
        if position.is_terminal() {
            return Err((ErrorKind::NoLegalMove, "position is terminal").into());
        }
        if self.verify_encoding {
            position.verify_features()?;
        }

        let perspective = position.side_to_move();
        if self.materialize_tree {
            let tree = SearchTree::expand(position, depth);
            search::best_paths(&tree, position, &self.evaluator, perspective)
        } else {
            search::stream_best_paths(position, depth, &self.evaluator, perspective)
        }
    }
}
