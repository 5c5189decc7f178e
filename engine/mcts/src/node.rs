//! MCTS tree node representation.
//!
//! Each node owns a copy of the position reached by playing `incoming_move`
//! from its parent. Statistics change only through `record_outcome`.

use engine_core::{Player, TerminalStatus};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsNode<S, M> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led to this node from parent (None for root)
    pub incoming_move: Option<M>,

    /// Position at this node
    pub state: S,

    /// Side to move in `state`
    pub to_move: Player,

    /// Outcome of `state`, evaluated once at creation
    pub status: TerminalStatus,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Legal moves not yet expanded into children.
    /// Empty for terminal positions.
    pub untried_moves: Vec<M>,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Sum of simulation outcomes recorded at this node
    pub win_count: f64,
}

impl<S, M> MctsNode<S, M> {
    pub fn new(
        parent: NodeId,
        incoming_move: Option<M>,
        state: S,
        to_move: Player,
        status: TerminalStatus,
        untried_moves: Vec<M>,
    ) -> Self {
        Self {
            parent,
            incoming_move,
            state,
            to_move,
            status,
            children: Vec::new(),
            untried_moves,
            visit_count: 0,
            win_count: 0.0,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True once every legal move has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Average outcome, or 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_count / f64::from(self.visit_count)
        }
    }

    /// Count one simulation through this node.
    pub fn record_outcome(&mut self, outcome: f64) {
        assert!(outcome.is_finite(), "simulation outcome must be finite, got {outcome}");
        self.visit_count += 1;
        self.win_count += outcome;
    }
}
