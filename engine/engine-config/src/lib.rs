//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the `arena` binary. The search library itself takes a plain
//! `mcts::MctsConfig` and never reads files or the environment.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`PLAYOUT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! PLAYOUT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     PLAYOUT_COMMON_GAME=connect4
//!     PLAYOUT_MCTS_MAX_ITERATIONS=5000
//!     PLAYOUT_MCTS_BACKUP=negamax
//!     PLAYOUT_ARENA_GAMES=500
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
