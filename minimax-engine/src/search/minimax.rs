//! Minimax implementation that keeps every tied line.
//!
//! White is the maxing player and Black the minning player. A leaf is scored by
//! the evaluator; an internal node keeps the union of its children's lines whose
//! score equals the best score for the side to move at that node. Scores are
//! compared exactly, so only exact ties are kept.
//!
//! Two walks produce the same result: [`best_paths`] replays an expanded
//! [`SearchTree`], while [`stream_best_paths`] visits the same nodes depth-first
//! without building one.

use crate::coretypes::{Color, Depth};
use crate::error::{self, ErrorKind};
use crate::evaluation::Evaluator;
use crate::position::Position;
use crate::search::{Line, NodeId, ScoredPath, SearchTree, TieSet};

#[derive(Debug, Default)]
struct Counters {
    nodes: u64,
    leaves: u64,
}

/// Fold a child's lines into the lines kept so far for a node where `player` moves.
/// All lines within one set share a score, so only the first of each is compared.
/// A NaN score ranks below every real score for both players.
fn merge_best<M>(best: &mut Vec<ScoredPath<M>>, child: Vec<ScoredPath<M>>, player: Color) {
    let child_score = match child.first() {
        Some(scored) => scored.score,
        None => return,
    };
    match best.first().map(|scored| scored.score) {
        None => *best = child,
        Some(_) if child_score.is_nan() => (),
        Some(best_score) if best_score.is_nan() => *best = child,
        Some(best_score) if player.prefers(child_score, best_score) => *best = child,
        Some(best_score) if child_score == best_score => best.extend(child),
        Some(_) => (),
    }
}

/// Score every leaf of `tree` and return the lines that are best for `perspective`,
/// the player choosing among the root's children.
///
/// `position` must be the position `tree` was expanded from. Its moves are replayed
/// to reach each leaf and it is restored before returning.
pub fn best_paths<P, E>(
    tree: &SearchTree<P::Move>,
    position: &mut P,
    evaluator: &E,
    perspective: Color,
) -> error::Result<TieSet<P::Move>>
where
    P: Position,
    E: Evaluator + ?Sized,
{
    if !tree.depth().is_zero() && tree.root().is_leaf() && position.is_terminal() {
        return Err((ErrorKind::NoLegalMove, "search root is terminal").into());
    }

    let mut counters = Counters::default();
    let paths = walk_tree(tree, NodeId::ROOT, position, evaluator, perspective, &mut counters);
    Ok(TieSet {
        paths,
        nodes: counters.nodes,
        leaves: counters.leaves,
    })
}

fn walk_tree<P, E>(
    tree: &SearchTree<P::Move>,
    id: NodeId,
    position: &mut P,
    evaluator: &E,
    player: Color,
    counters: &mut Counters,
) -> Vec<ScoredPath<P::Move>>
where
    P: Position,
    E: Evaluator + ?Sized,
{
    counters.nodes += 1;
    let node = tree.node(id);

    if node.is_leaf() {
        counters.leaves += 1;
        let score = evaluator.evaluate(position.features());
        return vec![ScoredPath::new(tree.path(id), score)];
    }

    let mut best = Vec::new();
    for child in node.children() {
        let child_move = match tree.node(*child).move_() {
            Some(child_move) => child_move,
            None => continue,
        };
        position.push(child_move);
        let child_paths = walk_tree(tree, *child, position, evaluator, !player, counters);
        position.pop();
        merge_best(&mut best, child_paths, player);
    }
    best
}

/// Search `position` to `depth` plies without building a tree, returning the
/// lines that are best for `perspective`. Produces the same lines in the same
/// order as expanding a [`SearchTree`] and calling [`best_paths`].
pub fn stream_best_paths<P, E>(
    position: &mut P,
    depth: Depth,
    evaluator: &E,
    perspective: Color,
) -> error::Result<TieSet<P::Move>>
where
    P: Position,
    E: Evaluator + ?Sized,
{
    if !depth.is_zero() && position.is_terminal() {
        return Err((ErrorKind::NoLegalMove, "search root is terminal").into());
    }

    let mut counters = Counters::default();
    let mut line = Line::new();
    let paths = stream_impl(position, depth, evaluator, perspective, &mut line, &mut counters);
    Ok(TieSet {
        paths,
        nodes: counters.nodes,
        leaves: counters.leaves,
    })
}

fn stream_impl<P, E>(
    position: &mut P,
    depth: Depth,
    evaluator: &E,
    player: Color,
    line: &mut Line<P::Move>,
    counters: &mut Counters,
) -> Vec<ScoredPath<P::Move>>
where
    P: Position,
    E: Evaluator + ?Sized,
{
    counters.nodes += 1;

    let legal_moves = match depth.decrement() {
        Some(_) if position.is_terminal() => Vec::new(),
        Some(_) => position.legal_moves(),
        None => Vec::new(),
    };

    // Stop at leaf nodes: last depth or terminal.
    if legal_moves.is_empty() {
        counters.leaves += 1;
        let score = evaluator.evaluate(position.features());
        return vec![ScoredPath::new(line.clone(), score)];
    }

    let remaining = depth.decrement().unwrap_or(Depth::ZERO);
    let mut best = Vec::new();
    for legal_move in legal_moves {
        position.push(legal_move);
        line.push(legal_move);
        let child_paths = stream_impl(position, remaining, evaluator, !player, line, counters);
        line.pop();
        position.pop();
        merge_best(&mut best, child_paths, player);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Score;
    use crate::encoder::FixedVector;

    fn scored(moves: &[u8], score: Score) -> ScoredPath<u8> {
        ScoredPath::new(moves.iter().copied().collect(), score)
    }

    #[test]
    fn merge_keeps_extremum_and_ties() {
        let mut best = Vec::new();
        merge_best(&mut best, vec![scored(&[1], 1.0)], Color::White);
        merge_best(&mut best, vec![scored(&[2], 0.0)], Color::White);
        merge_best(&mut best, vec![scored(&[3], 1.0)], Color::White);
        assert_eq!(best, vec![scored(&[1], 1.0), scored(&[3], 1.0)]);

        merge_best(&mut best, vec![scored(&[4], 2.0)], Color::White);
        assert_eq!(best, vec![scored(&[4], 2.0)]);

        let mut best = Vec::new();
        merge_best(&mut best, vec![scored(&[1], 1.0)], Color::Black);
        merge_best(&mut best, vec![scored(&[2], -1.0)], Color::Black);
        merge_best(&mut best, Vec::new(), Color::Black);
        assert_eq!(best, vec![scored(&[2], -1.0)]);
    }

    #[test]
    fn nan_is_never_preferred() {
        let mut best = vec![scored(&[1], 0.0)];
        merge_best(&mut best, vec![scored(&[2], Score::NAN)], Color::White);
        merge_best(&mut best, vec![scored(&[3], Score::NAN)], Color::Black);
        assert_eq!(best, vec![scored(&[1], 0.0)]);
    }

    #[test]
    fn nan_loses_regardless_of_order() {
        for player in [Color::White, Color::Black] {
            let mut nan_first = vec![scored(&[1], Score::NAN)];
            merge_best(&mut nan_first, vec![scored(&[2], 5.0)], player);
            assert_eq!(nan_first, vec![scored(&[2], 5.0)]);

            let mut nan_last = vec![scored(&[1], 5.0)];
            merge_best(&mut nan_last, vec![scored(&[2], Score::NAN)], player);
            assert_eq!(nan_last, vec![scored(&[1], 5.0)]);
        }
    }

    /// A position with no moves and a fixed evaluation.
    struct Frozen(FixedVector);

    impl Position for Frozen {
        type Move = u8;
        fn legal_moves(&self) -> Vec<u8> {
            Vec::new()
        }
        fn push(&mut self, _: u8) {}
        fn pop(&mut self) -> Option<u8> {
            None
        }
        fn is_terminal(&self) -> bool {
            true
        }
        fn side_to_move(&self) -> Color {
            Color::White
        }
        fn features(&self) -> &FixedVector {
            &self.0
        }
    }

    #[test]
    fn terminal_root() {
        let mut frozen = Frozen(FixedVector::empty());
        let evaluator = |_: &FixedVector| 4.0;
        let one = Depth::new(1).unwrap();

        let err = stream_best_paths(&mut frozen, one, &evaluator, Color::White).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoLegalMove);

        let tree = SearchTree::expand(&mut frozen, one);
        let err = best_paths(&tree, &mut frozen, &evaluator, Color::White).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoLegalMove);

        // With no depth requested, a terminal root is simply evaluated.
        let ties = stream_best_paths(&mut frozen, Depth::ZERO, &evaluator, Color::White).unwrap();
        assert_eq!(ties.paths, vec![scored(&[], 4.0)]);
    }
}
