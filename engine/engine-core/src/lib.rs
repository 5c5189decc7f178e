//! Core traits and types shared by the games and the search engine
//!
//! This crate provides the narrow game abstraction the search is written
//! against:
//! - `Game`: legal move enumeration, move application, terminal detection
//! - `Player` / `TerminalStatus`: side and outcome vocabulary
//! - `GameMetadata`: display information for frontends
//!
//! Each game lives in its own crate and is selected at construction time.

pub mod metadata;
pub mod typed;

// Re-export main types for convenience
pub use metadata::GameMetadata;
pub use typed::{Game, GameError, Player, TerminalStatus};
