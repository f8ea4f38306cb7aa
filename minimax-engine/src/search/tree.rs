//! Explicit search tree built by make/unmake traversal.
//!
//! Nodes live in a single arena owned by the tree. Children and parents are
//! referenced by index, so dropping the tree frees every node at once.

use crate::coretypes::Depth;
use crate::position::Position;
use crate::search::Line;

/// Index of a node within the tree that created it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub const fn index(&self) -> usize {
        self.0
    }
}

/// One ply of the tree.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchNode<M> {
    move_: Option<M>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    ply: u32,
}

impl<M: Copy> SearchNode<M> {
    /// Move leading to this node. None only for the root.
    pub fn move_(&self) -> Option<M> {
        self.move_
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in the order their moves were enumerated.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root in plies.
    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Leaves were either reached at full depth or are terminal positions.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// All move sequences reachable from a root position within a fixed depth.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchTree<M> {
    nodes: Vec<SearchNode<M>>,
    depth: Depth,
}

impl<M: Copy> SearchTree<M> {
    /// Expand every line from `position` to `depth` plies.
    ///
    /// Each legal move is pushed, expanded recursively, then popped, so `position`
    /// is returned to its original state. Terminal positions are never expanded.
    pub fn expand<P>(position: &mut P, depth: Depth) -> Self
    where
        P: Position<Move = M>,
    {
        let mut tree = Self {
            nodes: vec![SearchNode {
                move_: None,
                parent: None,
                children: Vec::new(),
                ply: 0,
            }],
            depth,
        };
        tree.expand_node(position, NodeId::ROOT, depth);
        tree
    }

    fn expand_node<P>(&mut self, position: &mut P, id: NodeId, depth: Depth)
    where
        P: Position<Move = M>,
    {
        let remaining = match depth.decrement() {
            Some(remaining) => remaining,
            None => return,
        };
        if position.is_terminal() {
            return;
        }

        for legal_move in position.legal_moves() {
            let child = self.add_child(id, legal_move);
            position.push(legal_move);
            self.expand_node(position, child, remaining);
            position.pop();
        }
    }

    fn add_child(&mut self, parent: NodeId, move_: M) -> NodeId {
        let id = NodeId(self.nodes.len());
        let ply = self.nodes[parent.0].ply + 1;
        self.nodes.push(SearchNode {
            move_: Some(move_),
            parent: Some(parent),
            children: Vec::new(),
            ply,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Depth the tree was expanded to. Lines may be shorter when they end in a
    /// terminal position.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn root(&self) -> &SearchNode<M> {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Node with id `id`, or None if it does not belong to this tree.
    pub fn get(&self, id: NodeId) -> Option<&SearchNode<M>> {
        self.nodes.get(id.0)
    }

    /// Node with id `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &SearchNode<M> {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every node, in creation (depth-first) order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(move |id| self.node(*id).is_leaf())
    }

    /// Moves from the root to `id`, found by following parent links.
    pub fn path(&self, id: NodeId) -> Line<M> {
        let mut path = Line::new();
        let mut current = self.node(id);
        while let (Some(move_), Some(parent)) = (current.move_, current.parent) {
            path.push(move_);
            current = self.node(parent);
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::ChessPosition;

    fn depth(plies: u32) -> Depth {
        Depth::new(plies).unwrap()
    }

    #[test]
    fn depth_zero_is_root_leaf() {
        let mut position = ChessPosition::start_position();
        let tree = SearchTree::expand(&mut position, Depth::ZERO);
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
        assert!(tree.root().is_root());
        assert_eq!(tree.root().move_(), None);
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![NodeId::ROOT]);
        assert!(tree.path(NodeId::ROOT).is_empty());
    }

    #[test]
    fn start_position_node_counts() {
        let mut position = ChessPosition::start_position();
        let original = position.clone();

        let tree = SearchTree::expand(&mut position, depth(1));
        assert_eq!(tree.len(), 1 + 20);
        assert_eq!(tree.leaves().count(), 20);

        let tree = SearchTree::expand(&mut position, depth(2));
        assert_eq!(tree.len(), 1 + 20 + 400);
        assert_eq!(tree.leaves().count(), 400);
        assert_eq!(position, original);
    }

    #[test]
    fn children_follow_enumeration_order() {
        let mut position = ChessPosition::start_position();
        let tree = SearchTree::expand(&mut position, depth(1));
        let expected = position.legal_moves();
        let moves: Vec<_> = tree
            .root()
            .children()
            .iter()
            .filter_map(|id| tree.node(*id).move_())
            .collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn paths_follow_parent_links() {
        let mut position = ChessPosition::start_position();
        let tree = SearchTree::expand(&mut position, depth(3));

        for leaf in tree.leaves().step_by(997) {
            let path = tree.path(leaf);
            assert_eq!(path.len(), 3);
            assert_eq!(tree.node(leaf).ply(), 3);

            // Replaying the path reaches a legal sequence.
            let mut replay = position.clone();
            for move_ in &path {
                replay.push_legal(*move_).unwrap();
            }
        }
    }

    #[test]
    fn terminal_nodes_are_not_expanded() {
        // Fool's mate: after Qh4# the mated side has no children, even with depth left.
        let mut position = ChessPosition::start_position();
        for input in ["f2f3", "e7e5", "g2g4"] {
            position.push(position.parse_move(input).unwrap());
        }
        let tree = SearchTree::expand(&mut position, depth(2));
        let mate = tree
            .ids()
            .find(|id| {
                tree.node(*id).move_().map(|move_| move_.to_string()) == Some("d8h4".into())
            })
            .unwrap();
        assert!(tree.node(mate).is_leaf());
        assert_eq!(tree.node(mate).ply(), 1);

        let mut root_mated = position.clone();
        root_mated.push(root_mated.parse_move("d8h4").unwrap());
        let tree = SearchTree::expand(&mut root_mated, depth(3));
        assert_eq!(tree.len(), 1);
        assert!(tree.get(NodeId(1)).is_none());
    }
}
