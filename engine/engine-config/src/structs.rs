//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_game() -> String {
    defaults::game().into()
}
fn d_exploration() -> f64 {
    defaults::exploration_constant()
}
fn d_time_limit_ms() -> u64 {
    defaults::time_limit_ms()
}
fn d_max_iterations() -> u32 {
    defaults::max_iterations()
}
fn d_threads() -> usize {
    defaults::threads()
}
fn d_reuse_tree() -> bool {
    defaults::reuse_tree()
}
fn d_backup() -> String {
    defaults::backup().into()
}
fn d_rollout_max_depth() -> u32 {
    defaults::rollout_max_depth()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_opponent() -> String {
    defaults::opponent().into()
}
fn d_board_size() -> usize {
    defaults::board_size()
}
fn d_win_length() -> usize {
    defaults::win_length()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by every command
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    #[serde(default = "d_game")]
    pub game: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            game: defaults::game().into(),
        }
    }
}

/// Search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_exploration")]
    pub exploration_constant: f64,
    /// Wall-clock limit per move in milliseconds (0 = no time limit)
    #[serde(default = "d_time_limit_ms")]
    pub time_limit_ms: u64,
    /// Iteration cap per move (0 = no iteration cap)
    #[serde(default = "d_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "d_threads")]
    pub threads: usize,
    #[serde(default = "d_reuse_tree")]
    pub reuse_tree: bool,
    /// "root_player" or "negamax"
    #[serde(default = "d_backup")]
    pub backup: String,
    #[serde(default = "d_rollout_max_depth")]
    pub rollout_max_depth: u32,
    /// RNG seed (0 = seed from entropy)
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: defaults::exploration_constant(),
            time_limit_ms: defaults::time_limit_ms(),
            max_iterations: defaults::max_iterations(),
            threads: defaults::threads(),
            reuse_tree: defaults::reuse_tree(),
            backup: defaults::backup().into(),
            rollout_max_depth: defaults::rollout_max_depth(),
            seed: defaults::seed(),
        }
    }
}

/// Match-runner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_opponent")]
    pub opponent: String,
    /// Tic-tac-toe board edge length
    #[serde(default = "d_board_size")]
    pub board_size: usize,
    /// Tic-tac-toe marks in a row needed to win
    #[serde(default = "d_win_length")]
    pub win_length: usize,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            opponent: defaults::opponent().into(),
            board_size: defaults::board_size(),
            win_length: defaults::win_length(),
            log_interval: defaults::log_interval(),
        }
    }
}
