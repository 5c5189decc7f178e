//! MCTS configuration parameters.

use std::time::Duration;

use engine_core::Player;

use crate::rollout::DEFAULT_MAX_DEPTH;
use crate::search::SearchError;
use crate::tree::Backup;

/// Bounds on one search: a wall-clock limit, an iteration cap, or both.
///
/// The search stops at whichever bound is hit first. An iteration that has
/// started always runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub time_limit: Option<Duration>,
    pub max_iterations: Option<u32>,
}

impl SearchBudget {
    /// A budget with at least one bound.
    pub fn new(
        time_limit: Option<Duration>,
        max_iterations: Option<u32>,
    ) -> Result<Self, SearchError> {
        let budget = Self {
            time_limit,
            max_iterations,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Stop after exactly `n` iterations.
    pub fn iterations(n: u32) -> Self {
        Self {
            time_limit: None,
            max_iterations: Some(n),
        }
    }

    /// Stop once `limit` has elapsed.
    pub fn time(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
            max_iterations: None,
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.time_limit.is_none() && self.max_iterations.is_none() {
            return Err(SearchError::InvalidBudget);
        }
        Ok(())
    }

    /// Whether a search that has run `iterations` times over `elapsed` must stop.
    #[inline]
    pub fn is_exhausted(&self, elapsed: Duration, iterations: u32) -> bool {
        self.max_iterations.is_some_and(|cap| iterations >= cap)
            || self.time_limit.is_some_and(|limit| elapsed >= limit)
    }
}

impl Default for SearchBudget {
    /// One second or 1000 iterations, whichever comes first.
    fn default() -> Self {
        Self {
            time_limit: Some(Duration::from_secs(1)),
            max_iterations: Some(1000),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Side the engine plays for. All rewards are scored for this player.
    pub player: Player,

    /// Exploration constant C in the UCB1 bonus term.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f64,

    /// Default budget for `Mcts::select_move`.
    pub budget: SearchBudget,

    /// Sign convention used when backing up rollout results.
    pub backup: Backup,

    /// Playouts longer than this many plies are scored as draws.
    pub rollout_max_depth: u32,

    /// Independent trees searched in parallel (root parallelization).
    /// 1 searches on the calling thread.
    pub threads: usize,

    /// Keep the tree between moves and continue from the matching subtree.
    pub reuse_tree: bool,

    /// Seed for the agent's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            player: Player::First,
            exploration_constant: 1.0,
            budget: SearchBudget::default(),
            backup: Backup::RootPlayer,
            rollout_max_depth: DEFAULT_MAX_DEPTH,
            threads: 1,
            reuse_tree: false,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, reproducible config for testing.
    pub fn for_testing() -> Self {
        Self {
            budget: SearchBudget::iterations(200),
            seed: Some(42),
            ..Self::default()
        }
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = player;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder pattern: iteration-only budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.budget = SearchBudget::iterations(n);
        self
    }

    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_rollout_max_depth(mut self, depth: u32) -> Self {
        self.rollout_max_depth = depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_tree_reuse(mut self, reuse: bool) -> Self {
        self.reuse_tree = reuse;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the settings that can be wrong independently of a position.
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_exploration(self.exploration_constant)?;
        self.budget.validate()?;
        if self.threads == 0 {
            return Err(SearchError::InvalidThreads);
        }
        Ok(())
    }
}

pub(crate) fn validate_exploration(c: f64) -> Result<(), SearchError> {
    if c.is_finite() && c >= 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidExploration(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.player, Player::First);
        assert!((config.exploration_constant - 1.0).abs() < 1e-12);
        assert_eq!(config.budget.time_limit, Some(Duration::from_secs(1)));
        assert_eq!(config.budget.max_iterations, Some(1000));
        assert_eq!(config.backup, Backup::RootPlayer);
        assert_eq!(config.threads, 1);
        assert!(!config.reuse_tree);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_player(Player::Second)
            .with_iterations(100)
            .with_exploration(1.4)
            .with_backup(Backup::Negamax)
            .with_threads(4)
            .with_seed(7);

        assert_eq!(config.player, Player::Second);
        assert_eq!(config.budget, SearchBudget::iterations(100));
        assert!((config.exploration_constant - 1.4).abs() < 1e-12);
        assert_eq!(config.backup, Backup::Negamax);
        assert_eq!(config.threads, 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_budget_requires_a_bound() {
        assert!(matches!(
            SearchBudget::new(None, None),
            Err(SearchError::InvalidBudget)
        ));
        assert!(SearchBudget::new(None, Some(0)).is_ok());
        assert!(SearchBudget::new(Some(Duration::ZERO), None).is_ok());
    }

    #[test]
    fn test_budget_exhaustion() {
        let budget = SearchBudget::iterations(10);
        assert!(!budget.is_exhausted(Duration::from_secs(100), 9));
        assert!(budget.is_exhausted(Duration::ZERO, 10));

        let budget = SearchBudget::time(Duration::from_millis(50));
        assert!(!budget.is_exhausted(Duration::from_millis(49), u32::MAX));
        assert!(budget.is_exhausted(Duration::from_millis(50), 0));

        // Either bound stops a combined budget
        let both = SearchBudget::default();
        assert!(both.is_exhausted(Duration::ZERO, 1000));
        assert!(both.is_exhausted(Duration::from_secs(1), 0));
        assert!(!both.is_exhausted(Duration::from_millis(10), 10));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            MctsConfig::default().with_exploration(-1.0).validate(),
            Err(SearchError::InvalidExploration(_))
        ));
        assert!(matches!(
            MctsConfig::default().with_exploration(f64::NAN).validate(),
            Err(SearchError::InvalidExploration(_))
        ));
        assert!(matches!(
            MctsConfig::default().with_threads(0).validate(),
            Err(SearchError::InvalidThreads)
        ));
    }
}
