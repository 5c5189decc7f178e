//! Monte Carlo Tree Search (MCTS) for two-player, zero-sum, perfect-information games.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running simulations.
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 (Upper Confidence Bound) to
//!    balance exploration and exploitation
//! 2. **Expansion**: When reaching a node with untried moves, add one child
//!    for a random untried move
//! 3. **Simulation**: Play random moves from the new node to the end of the game
//! 4. **Backpropagation**: Update visit counts and win totals along the path
//!    from the new node to the root
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Player;
//! use games_tictactoe::{Board, Position, TicTacToe};
//! use mcts::{Mcts, MctsConfig, SearchBudget};
//!
//! let game = TicTacToe::default();
//! let config = MctsConfig::default().with_player(Player::Second).with_seed(42);
//! let mut engine = Mcts::new(game, config);
//!
//! // O to move: (0, 2) wins, (2, 2) hands X the anti-diagonal
//! let board: Board = "OO./XXO/XX.".parse().unwrap();
//! let mv = engine
//!     .choose_action(&board, SearchBudget::iterations(2000), 1.0)
//!     .unwrap();
//! assert_eq!(mv, Some(Position::new(0, 2)));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `exploration_constant`: C in the UCB1 bonus term (default: 1.0)
//! - `budget`: time limit and/or iteration cap (default: 1s or 1000 iterations)
//! - `backup`: how outcomes are signed on the way up (default: [`Backup::RootPlayer`])
//! - `threads`: independent trees searched in parallel (default: 1)
//! - `reuse_tree`: keep the tree between moves (default: false)
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                         MctsSearch                          |
//! +-------------------------------------------------------------+
//! |  +-------------+  +-----------------+  +-----------------+  |
//! |  |  MctsTree   |  | SelectionPolicy |  |  RolloutPolicy  |  |
//! |  |  (arena)    |  |     (UCB1)      |  |    (uniform)    |  |
//! |  +------+------+  +--------+--------+  +--------+--------+  |
//! |         |                  |                    |           |
//! |         v                  v                    v           |
//! |  +------------------------------------------------------+   |
//! |  |         select -> expand -> simulate ->              |   |
//! |  |                     backpropagate                    |   |
//! |  +------------------------------------------------------+   |
//! +-------------------------------------------------------------+
//! ```

pub mod agent;
pub mod config;
pub mod node;
pub mod parallel;
pub mod rollout;
pub mod search;
pub mod selection;
pub mod tree;

// Re-export main types
pub use agent::Mcts;
pub use config::{MctsConfig, SearchBudget};
pub use node::{MctsNode, NodeId};
pub use parallel::search_root_parallel;
pub use rollout::{RolloutPolicy, UniformRollout};
pub use search::{run_mcts, ChildStats, MctsSearch, SearchError, SearchPhase, SearchResult};
pub use selection::{SelectionPolicy, Ucb1};
pub use tree::{Backup, MctsTree, TreeStats};
