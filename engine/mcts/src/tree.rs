//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; parent links are indices too, so
//! dropping the tree is a single deallocation.
//!
//! Nothing in this module reads a clock or a random source.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use engine_core::{Game, Player};

use crate::node::{MctsNode, NodeId};
use crate::selection::{SelectionPolicy, Ucb1};

/// Node type stored in a tree for game `G`.
pub type Node<G> = MctsNode<<G as Game>::State, <G as Game>::Move>;

/// How a simulation outcome is written into the nodes on its path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backup {
    /// Every node records the outcome from the searching player's point of
    /// view, at every depth.
    #[default]
    RootPlayer,

    /// Every node records the outcome from the point of view of the player
    /// who made its incoming move, so selection at each depth maximizes for
    /// the side to move there.
    Negamax,
}

impl Backup {
    pub fn as_str(self) -> &'static str {
        match self {
            Backup::RootPlayer => "root_player",
            Backup::Negamax => "negamax",
        }
    }
}

impl fmt::Display for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "root_player" | "root" => Ok(Backup::RootPlayer),
            "negamax" => Ok(Backup::Negamax),
            other => Err(format!(
                "unknown backup mode '{other}' (expected root_player or negamax)"
            )),
        }
    }
}

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<G: Game> {
    /// Arena storing all nodes
    nodes: Vec<Node<G>>,

    /// Root node index (always 0)
    root: NodeId,
}

impl<G: Game> MctsTree<G> {
    /// Create a tree whose root is `state` with `to_move` to play.
    pub fn new(game: &G, state: G::State, to_move: Player) -> Self {
        let root = Self::make_node(game, NodeId::NONE, None, state, to_move);
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    fn make_node(
        game: &G,
        parent: NodeId,
        incoming_move: Option<G::Move>,
        state: G::State,
        to_move: Player,
    ) -> Node<G> {
        let status = game.terminal_status(&state);
        let untried_moves = if status.is_terminal() {
            Vec::new()
        } else {
            game.legal_moves(&state)
        };
        MctsNode::new(parent, incoming_move, state, to_move, status, untried_moves)
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.index()]
    }

    fn allocate(&mut self, node: Node<G>) -> NodeId {
        let id = u32::try_from(self.nodes.len())
            .ok()
            .filter(|&raw| raw != NodeId::NONE.0)
            .unwrap_or_else(|| panic!("search tree exceeded {} nodes", u32::MAX - 1));
        self.nodes.push(node);
        NodeId(id)
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[Node<G>] {
        &self.nodes
    }

    /// Expand `mv` from `parent` into a new child and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not one of the parent's untried moves.
    pub fn expand(&mut self, game: &G, parent: NodeId, mv: G::Move) -> NodeId {
        let node = self.get_mut(parent);
        let Some(slot) = node.untried_moves.iter().position(|m| *m == mv) else {
            panic!(
                "expand: move {mv:?} is not an untried move of node {}",
                parent.0
            );
        };
        node.untried_moves.remove(slot);

        let mover = node.to_move;
        let next_state = game.apply(&node.state, mv, mover);
        let child = Self::make_node(game, parent, Some(mv), next_state, game.other_player(mover));
        let child_id = self.allocate(child);

        self.get_mut(parent).children.push(child_id);
        child_id
    }

    /// Select the child of `parent` with the highest policy score.
    /// Ties go to the earliest expanded child.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has never been visited.
    pub fn best_child<P>(&self, parent: NodeId, policy: &P, exploration: f64) -> Option<NodeId>
    where
        P: SelectionPolicy + ?Sized,
    {
        let node = self.get(parent);
        assert!(
            node.visit_count > 0,
            "selection from unvisited node {}",
            parent.0
        );

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            let score = policy.score(
                child.win_count,
                child.visit_count,
                node.visit_count,
                exploration,
            );
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// [`MctsTree::best_child`] with the UCB1 policy.
    pub fn best_child_by_ucb1(&self, parent: NodeId, exploration: f64) -> Option<NodeId> {
        self.best_child(parent, &Ucb1, exploration)
    }

    /// Child with the most visits. Ties go to the earliest expanded child.
    pub fn most_visited_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child_id in &self.get(parent).children {
            let visits = self.get(child_id).visit_count;
            if best.map_or(true, |(_, top)| visits > top) {
                best = Some((child_id, visits));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Count one simulation with `outcome` at `id`.
    #[inline]
    pub fn record_outcome(&mut self, id: NodeId, outcome: f64) {
        self.get_mut(id).record_outcome(outcome);
    }

    /// Record `outcome` (scored for `player`) at `leaf` and every ancestor.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: f64, backup: Backup, player: Player) {
        let mut current = leaf;
        while current.is_some() {
            let node = self.get_mut(current);
            let value = match backup {
                Backup::RootPlayer => outcome,
                Backup::Negamax if node.to_move.opponent() == player => outcome,
                Backup::Negamax => -outcome,
            };
            node.record_outcome(value);
            current = node.parent;
        }
    }

    /// Breadth-first search for a node within `max_depth` plies of the root
    /// holding `state` with `to_move` to play.
    pub fn find_state(&self, state: &G::State, to_move: Player, max_depth: u32) -> Option<NodeId> {
        let mut queue = VecDeque::from([(self.root, 0u32)]);
        while let Some((id, depth)) = queue.pop_front() {
            let node = self.get(id);
            if node.to_move == to_move && node.state == *state {
                return Some(id);
            }
            if depth < max_depth {
                queue.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        None
    }

    /// Discard everything outside the subtree at `new_root` and make it the root.
    ///
    /// Node ids are renumbered; statistics inside the subtree are kept.
    pub fn reroot(&mut self, new_root: NodeId) {
        if new_root == self.root {
            return;
        }

        let old = std::mem::take(&mut self.nodes);

        // Breadth-first numbering of the kept subtree
        let mut remap = vec![NodeId::NONE; old.len()];
        let mut order = vec![new_root];
        remap[new_root.index()] = NodeId(0);
        let mut cursor = 0;
        while cursor < order.len() {
            for &child in &old[order[cursor].index()].children {
                remap[child.index()] = NodeId(order.len() as u32);
                order.push(child);
            }
            cursor += 1;
        }

        let mut slots: Vec<Option<Node<G>>> = (0..order.len()).map(|_| None).collect();
        for (old_index, mut node) in old.into_iter().enumerate() {
            let new_id = remap[old_index];
            if new_id.is_none() {
                continue;
            }
            if new_id == NodeId(0) {
                node.parent = NodeId::NONE;
                node.incoming_move = None;
            } else {
                node.parent = remap[node.parent.index()];
            }
            for child in &mut node.children {
                *child = remap[child.index()];
            }
            slots[new_id.index()] = Some(node);
        }

        self.nodes = slots.into_iter().flatten().collect();
        self.root = NodeId(0);
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(id).children.iter().map(|&child| (child, depth + 1)));
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
