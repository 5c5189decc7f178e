//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: descend with the selection policy while a node is fully
//!    expanded and has children
//! 2. Expansion: add one child for a random untried move
//! 3. Simulation: play the new position out with the rollout policy
//! 4. Backpropagation: record the outcome on every node up to the root

use std::time::{Duration, Instant};

use engine_core::{Game, GameError, Player, TerminalStatus};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{validate_exploration, MctsConfig, SearchBudget};
use crate::node::NodeId;
use crate::rollout::{RolloutPolicy, UniformRollout};
use crate::selection::{SelectionPolicy, Ucb1};
use crate::tree::{Backup, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot search a finished position ({0:?})")]
    TerminalState(TerminalStatus),

    #[error("Invalid state: {0}")]
    InvalidState(#[from] GameError),

    #[error("Position has {found:?} to move, but the engine plays {expected:?}")]
    NotToMove { expected: Player, found: Player },

    #[error("Search budget needs a time limit or an iteration cap")]
    InvalidBudget,

    #[error("Exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("Root parallel search needs at least one thread")]
    InvalidThreads,

    #[error("Failed to build search thread pool: {0}")]
    ThreadPool(String),
}

/// Where a search currently is within its iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Selecting,
    Expanding,
    Simulating,
    Backpropagating,
    Done,
}

/// Statistics of one root child after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: u32,
    pub wins: f64,
}

impl<M> ChildStats<M> {
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / f64::from(self.visits)
        }
    }
}

/// Result of an MCTS search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<M> {
    /// Move to play, or None if the position has no legal moves
    pub best_move: Option<M>,

    /// Iterations completed by this search
    pub iterations: u32,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// Visits recorded at the root (includes reused visits)
    pub root_visits: u32,

    /// Mean outcome at the root for the searching player
    pub root_value: f64,

    /// True if the root had no children and a random legal move was returned
    pub fallback: bool,

    /// Root children in expansion order
    pub children: Vec<ChildStats<M>>,
}

/// MCTS search state.
pub struct MctsSearch<'a, G: Game, P = Ucb1, R = UniformRollout> {
    game: &'a G,
    selection: &'a P,
    rollout: &'a R,
    tree: MctsTree<G>,
    player: Player,
    exploration: f64,
    backup: Backup,
    phase: SearchPhase,
    iterations: u32,
}

impl<'a, G, P, R> MctsSearch<'a, G, P, R>
where
    G: Game,
    P: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    /// Create a new search rooted at `state` with `config.player` to move.
    ///
    /// Rejects malformed and finished positions, and positions where the
    /// engine's player is not the side to move.
    pub fn new(
        game: &'a G,
        selection: &'a P,
        rollout: &'a R,
        config: &MctsConfig,
        state: G::State,
    ) -> Result<Self, SearchError> {
        game.validate(&state)?;
        let status = game.terminal_status(&state);
        if status.is_terminal() {
            return Err(SearchError::TerminalState(status));
        }
        let tree = MctsTree::new(game, state, config.player);
        Self::with_tree(game, selection, rollout, config, tree)
    }

    /// Continue searching an existing tree. Its root must have
    /// `config.player` to move.
    pub fn with_tree(
        game: &'a G,
        selection: &'a P,
        rollout: &'a R,
        config: &MctsConfig,
        tree: MctsTree<G>,
    ) -> Result<Self, SearchError> {
        validate_exploration(config.exploration_constant)?;

        let root = tree.get(tree.root());
        game.validate(&root.state)?;
        if root.is_terminal() {
            return Err(SearchError::TerminalState(root.status));
        }
        let found = game.side_to_move(&root.state);
        if found != config.player {
            return Err(SearchError::NotToMove {
                expected: config.player,
                found,
            });
        }
        assert_eq!(
            root.to_move, config.player,
            "tree root is not the searching player's turn"
        );

        Ok(Self {
            game,
            selection,
            rollout,
            tree,
            player: config.player,
            exploration: config.exploration_constant,
            backup: config.backup,
            phase: SearchPhase::Idle,
            iterations: 0,
        })
    }

    /// Iterate until `budget` is exhausted, then pick the most visited root child.
    pub fn run(
        &mut self,
        budget: SearchBudget,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        budget.validate()?;

        let started = Instant::now();
        let mut completed = 0u32;
        while !budget.is_exhausted(started.elapsed(), completed) {
            self.iterate(rng);
            completed += 1;
        }
        self.phase = SearchPhase::Done;

        let result = self.result(completed, started.elapsed(), rng);
        debug!(
            iterations = result.iterations,
            elapsed_ms = result.elapsed.as_millis() as u64,
            root_visits = result.root_visits,
            root_value = result.root_value,
            nodes = self.tree.len(),
            fallback = result.fallback,
            best_move = ?result.best_move,
            "MCTS search complete"
        );
        Ok(result)
    }

    /// Run one full iteration and return the node the simulation started from.
    pub fn iterate(&mut self, rng: &mut ChaCha20Rng) -> NodeId {
        self.phase = SearchPhase::Selecting;
        let mut current = self.select();

        self.phase = SearchPhase::Expanding;
        if let Some(&mv) = self.tree.get(current).untried_moves.choose(rng) {
            current = self.tree.expand(self.game, current, mv);
        }

        self.phase = SearchPhase::Simulating;
        let node = self.tree.get(current);
        let outcome = self
            .rollout
            .rollout(self.game, &node.state, node.to_move, self.player, rng);

        self.phase = SearchPhase::Backpropagating;
        self.tree
            .backpropagate(current, outcome, self.backup, self.player);
        self.iterations += 1;

        trace!(
            iteration = self.iterations,
            node = current.0,
            outcome,
            "MCTS iteration complete"
        );

        current
    }

    /// Descend from the root while the current node is fully expanded and
    /// has children.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if !node.is_fully_expanded() || node.is_leaf() {
                return current;
            }
            match self
                .tree
                .best_child(current, self.selection, self.exploration)
            {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    fn result(
        &self,
        completed: u32,
        elapsed: Duration,
        rng: &mut ChaCha20Rng,
    ) -> SearchResult<G::Move> {
        let root_id = self.tree.root();
        let root = self.tree.get(root_id);

        let children = root
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.tree.get(id);
                child.incoming_move.map(|mv| ChildStats {
                    mv,
                    visits: child.visit_count,
                    wins: child.win_count,
                })
            })
            .collect();

        let mut fallback = false;
        let best_move = match self
            .tree
            .most_visited_child(root_id)
            .and_then(|id| self.tree.get(id).incoming_move)
        {
            Some(mv) => Some(mv),
            None => {
                fallback = true;
                let mv = self.game.legal_moves(&root.state).choose(rng).copied();
                debug!(move_ = ?mv, "Root has no children, falling back to a random legal move");
                mv
            }
        };

        // Under negamax the root records outcomes for the opponent
        let root_value = match self.backup {
            Backup::RootPlayer => root.mean_value(),
            Backup::Negamax => -root.mean_value(),
        };

        SearchResult {
            best_move,
            iterations: completed,
            elapsed,
            root_visits: root.visit_count,
            root_value,
            fallback,
            children,
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G> {
        &self.tree
    }

    /// Consume the search and keep its tree.
    pub fn into_tree(self) -> MctsTree<G> {
        self.tree
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Iterations run by this search so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Convenience function to run a single search with UCB1 and uniform rollouts.
pub fn run_mcts<G: Game>(
    game: &G,
    state: G::State,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Move>, SearchError> {
    let rollout = UniformRollout::new(config.rollout_max_depth);
    let mut search = MctsSearch::new(game, &Ucb1, &rollout, config, state)?;
    search.run(config.budget, rng)
}
