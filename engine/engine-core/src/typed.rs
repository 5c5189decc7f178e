//! Typed Game trait consumed by the search engine
//!
//! A game implementation is the only place that knows the board geometry and
//! the win rule. The search engine drives it exclusively through this trait:
//! enumerate legal moves, apply a move to produce a successor, and ask whether
//! the position is over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::GameMetadata;

/// One of the two sides of a game.
///
/// `First` is the side that moves from the initial position (X in
/// tic-tac-toe, red in Connect Four).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// The other side.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Zero-based index (0 for `First`, 1 for `Second`).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

/// Outcome classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    Ongoing,
    Win(Player),
    Draw,
}

impl TerminalStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, TerminalStatus::Ongoing)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            TerminalStatus::Win(player) => Some(player),
            _ => None,
        }
    }

    /// Scalar reward of this status from `perspective`'s point of view:
    /// `+1` for a win, `-1` for a loss, `0` for a draw or an unfinished game.
    #[inline]
    pub fn reward_for(self, perspective: Player) -> f64 {
        match self {
            TerminalStatus::Win(winner) if winner == perspective => 1.0,
            TerminalStatus::Win(_) => -1.0,
            TerminalStatus::Draw | TerminalStatus::Ongoing => 0.0,
        }
    }
}

/// Errors raised by game implementations when constructing games or
/// validating externally supplied positions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("invalid game dimensions: {0}")]
    InvalidDimensions(String),

    #[error("malformed position: {0}")]
    MalformedState(String),

    #[error("failed to parse position: {0}")]
    Parse(String),
}

/// Main trait for game implementations.
///
/// Implementations must be pure: `apply` never mutates its input and all
/// methods are deterministic. `legal_moves` must return moves in a stable
/// order, since the search breaks ties by that order.
///
/// # Example
///
/// ```rust
/// use engine_core::{Game, GameMetadata, Player, TerminalStatus};
///
/// /// Players alternately take 1 or 2 stones; whoever takes the last stone wins.
/// #[derive(Debug)]
/// struct Nim;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Heap {
///     stones: u8,
///     last_mover: Option<Player>,
/// }
///
/// impl Game for Nim {
///     type State = Heap;
///     type Move = u8;
///
///     fn metadata(&self) -> GameMetadata {
///         GameMetadata::new("nim", "Nim")
///     }
///
///     fn initial_state(&self) -> Heap {
///         Heap { stones: 5, last_mover: None }
///     }
///
///     fn legal_moves(&self, heap: &Heap) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= heap.stones).collect()
///     }
///
///     fn apply(&self, heap: &Heap, take: u8, player: Player) -> Heap {
///         Heap { stones: heap.stones - take, last_mover: Some(player) }
///     }
///
///     fn terminal_status(&self, heap: &Heap) -> TerminalStatus {
///         match (heap.stones, heap.last_mover) {
///             (0, Some(player)) => TerminalStatus::Win(player),
///             _ => TerminalStatus::Ongoing,
///         }
///     }
///
///     fn side_to_move(&self, heap: &Heap) -> Player {
///         heap.last_mover.map_or(Player::First, Player::opponent)
///     }
/// }
///
/// let nim = Nim;
/// let heap = nim.apply(&nim.initial_state(), 2, Player::First);
/// assert_eq!(nim.legal_moves(&heap), vec![1, 2]);
/// assert_eq!(nim.side_to_move(&heap), Player::Second);
/// ```
pub trait Game: Send + Sync + std::fmt::Debug + 'static {
    /// Board position. Cloned into every search node, so keep it compact.
    type State: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// A single move. Compared by value when expanding search nodes.
    type Move: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// Display and configuration metadata.
    fn metadata(&self) -> GameMetadata;

    /// The starting position.
    fn initial_state(&self) -> Self::State;

    /// Legal moves from `state` in a deterministic order.
    ///
    /// Callers check `terminal_status` first; the result for a finished
    /// position is unspecified.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Successor of `state` after `player` plays `mv`.
    ///
    /// # Panics
    ///
    /// May panic if `mv` is not legal in `state`.
    fn apply(&self, state: &Self::State, mv: Self::Move, player: Player) -> Self::State;

    /// Whether the game is won, drawn, or still in progress.
    fn terminal_status(&self, state: &Self::State) -> TerminalStatus;

    /// Side that moves next in `state`, inferred from the position.
    fn side_to_move(&self, state: &Self::State) -> Player;

    /// The side that moves after `player`.
    fn other_player(&self, player: Player) -> Player {
        player.opponent()
    }

    /// Check that an externally supplied position is well formed.
    fn validate(&self, _state: &Self::State) -> Result<(), GameError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_alternates() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent(), Player::First);
        assert_eq!(Player::First.opponent().opponent(), Player::First);
    }

    #[test]
    fn test_player_index() {
        assert_eq!(Player::First.index(), 0);
        assert_eq!(Player::Second.index(), 1);
        assert_eq!(Player::ALL.map(Player::index), [0, 1]);
    }

    #[test]
    fn test_reward_for() {
        let first_wins = TerminalStatus::Win(Player::First);
        assert_eq!(first_wins.reward_for(Player::First), 1.0);
        assert_eq!(first_wins.reward_for(Player::Second), -1.0);
        assert_eq!(TerminalStatus::Draw.reward_for(Player::First), 0.0);
        assert_eq!(TerminalStatus::Ongoing.reward_for(Player::Second), 0.0);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(!TerminalStatus::Ongoing.is_terminal());
        assert!(TerminalStatus::Draw.is_terminal());
        assert!(TerminalStatus::Win(Player::Second).is_terminal());
        assert_eq!(
            TerminalStatus::Win(Player::Second).winner(),
            Some(Player::Second)
        );
        assert_eq!(TerminalStatus::Draw.winner(), None);
    }

    #[test]
    fn test_error_display() {
        let err = GameError::MalformedState("two winners".into());
        assert_eq!(err.to_string(), "malformed position: two winners");
    }
}
