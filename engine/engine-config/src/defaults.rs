//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the documented defaults and the compiled ones cannot drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    game: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    exploration_constant: f64,
    time_limit_ms: u64,
    max_iterations: u32,
    threads: usize,
    reuse_tree: bool,
    backup: String,
    rollout_max_depth: u32,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    games: u32,
    opponent: String,
    board_size: usize,
    win_length: usize,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn game() -> &'static str {
    &DEFAULTS.common.game
}

// MCTS
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn time_limit_ms() -> u64 {
    DEFAULTS.mcts.time_limit_ms
}
pub fn max_iterations() -> u32 {
    DEFAULTS.mcts.max_iterations
}
pub fn threads() -> usize {
    DEFAULTS.mcts.threads
}
pub fn reuse_tree() -> bool {
    DEFAULTS.mcts.reuse_tree
}
pub fn backup() -> &'static str {
    &DEFAULTS.mcts.backup
}
pub fn rollout_max_depth() -> u32 {
    DEFAULTS.mcts.rollout_max_depth
}
pub fn seed() -> u64 {
    DEFAULTS.mcts.seed
}

// Arena
pub fn games() -> u32 {
    DEFAULTS.arena.games
}
pub fn opponent() -> &'static str {
    &DEFAULTS.arena.opponent
}
pub fn board_size() -> usize {
    DEFAULTS.arena.board_size
}
pub fn win_length() -> usize {
    DEFAULTS.arena.win_length
}
pub fn log_interval() -> u32 {
    DEFAULTS.arena.log_interval
}
