//! Simulation policies.
//!
//! A rollout plays a position out to the end on a private copy and reports
//! the result as a scalar reward: `+1` win, `-1` loss, `0` draw, from a fixed
//! perspective. Rollouts never touch the search tree.

use engine_core::{Game, Player};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Default cap on playout length, in plies.
pub const DEFAULT_MAX_DEPTH: u32 = 1000;

/// Plays a position to completion and scores it.
pub trait RolloutPolicy<G: Game>: Send + Sync {
    /// Simulate from `state` with `to_move` to play and return the reward
    /// for `perspective`.
    fn rollout(
        &self,
        game: &G,
        state: &G::State,
        to_move: Player,
        perspective: Player,
        rng: &mut ChaCha20Rng,
    ) -> f64;
}

/// Uniformly random legal moves for both sides until the game ends.
///
/// Playouts longer than `max_depth` plies are scored as draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformRollout {
    pub max_depth: u32,
}

impl UniformRollout {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl Default for UniformRollout {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl<G: Game> RolloutPolicy<G> for UniformRollout {
    fn rollout(
        &self,
        game: &G,
        state: &G::State,
        to_move: Player,
        perspective: Player,
        rng: &mut ChaCha20Rng,
    ) -> f64 {
        let mut state = state.clone();
        let mut mover = to_move;

        for _ in 0..self.max_depth {
            let status = game.terminal_status(&state);
            if status.is_terminal() {
                return status.reward_for(perspective);
            }
            let moves = game.legal_moves(&state);
            let Some(&mv) = moves.choose(rng) else {
                // Ongoing but stuck: nothing left to play
                return 0.0;
            };
            state = game.apply(&state, mv, mover);
            mover = game.other_player(mover);
        }

        // Ongoing scores 0.0 when the depth cap is hit
        game.terminal_status(&state).reward_for(perspective)
    }
}
