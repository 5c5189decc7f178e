//! Command-line configuration for the arena
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine_config::{load_config, CentralConfig};
use engine_core::Player;
use mcts::{Backup, MctsConfig, SearchBudget};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_game() -> GameKind {
    GameKind::from_str(&CENTRAL_CONFIG.common.game, true).unwrap_or(GameKind::Tictactoe)
}

fn default_opponent() -> OpponentKind {
    OpponentKind::from_str(&CENTRAL_CONFIG.arena.opponent, true).unwrap_or(OpponentKind::Random)
}

fn default_backup() -> String {
    CENTRAL_CONFIG.mcts.backup.clone()
}

#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(about = "Playout arena - pit the MCTS engine against opponents")]
#[command(
    long_about = "Plays matches between the MCTS engine and an opponent, or analyzes a
single position and reports the search statistics.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a series of games between the engine and an opponent
    Play(PlayArgs),
    /// Search one tic-tac-toe position and print the root statistics
    Analyze(AnalyzeArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Tictactoe,
    Connect4,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// Uniformly random legal moves
    Random,
    /// A second engine with the same settings and a different seed
    Mcts,
}

/// Settings shared by every command that runs a search.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Exploration constant C in UCB1
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.exploration_constant)]
    pub exploration: f64,

    /// Time limit per move in milliseconds (0 disables the time limit)
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.time_limit_ms)]
    pub time_limit_ms: u64,

    /// Iteration cap per move (0 disables the cap)
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.max_iterations)]
    pub iterations: u32,

    /// Independent root-parallel search trees
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.threads)]
    pub threads: usize,

    /// Keep the search tree between moves
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.reuse_tree)]
    pub reuse_tree: bool,

    /// Outcome backup mode (root_player or negamax)
    #[arg(long, default_value_t = default_backup())]
    pub backup: String,

    /// Plies after which a rollout is scored as a draw
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.rollout_max_depth)]
    pub rollout_max_depth: u32,

    /// Random seed (0 seeds from entropy)
    #[arg(long, default_value_t = CENTRAL_CONFIG.mcts.seed)]
    pub seed: u64,
}

impl SearchArgs {
    pub fn budget(&self) -> Result<SearchBudget> {
        let time_limit = (self.time_limit_ms > 0).then(|| Duration::from_millis(self.time_limit_ms));
        let max_iterations = (self.iterations > 0).then_some(self.iterations);
        SearchBudget::new(time_limit, max_iterations)
            .context("set --time-limit-ms or --iterations to a non-zero value")
    }

    pub fn backup(&self) -> Result<Backup> {
        self.backup.parse().map_err(|e: String| anyhow!(e))
    }

    /// Engine configuration for `player`, seeded with `seed_offset` added to
    /// the configured seed so several engines in one run differ.
    pub fn mcts_config(&self, player: Player, seed_offset: u64) -> Result<MctsConfig> {
        let mut config = MctsConfig::default()
            .with_player(player)
            .with_exploration(self.exploration)
            .with_budget(self.budget()?)
            .with_backup(self.backup()?)
            .with_rollout_max_depth(self.rollout_max_depth)
            .with_threads(self.threads)
            .with_tree_reuse(self.reuse_tree);
        if self.seed != 0 {
            config = config.with_seed(self.seed.wrapping_add(seed_offset));
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Game to play
    #[arg(long, value_enum, default_value_t = default_game())]
    pub game: GameKind,

    /// Number of games to play
    #[arg(long, default_value_t = CENTRAL_CONFIG.arena.games)]
    pub games: u32,

    /// Opponent for the engine
    #[arg(long, value_enum, default_value_t = default_opponent())]
    pub opponent: OpponentKind,

    /// Tic-tac-toe board edge length
    #[arg(long, default_value_t = CENTRAL_CONFIG.arena.board_size)]
    pub board_size: usize,

    /// Tic-tac-toe marks in a row needed to win
    #[arg(long, default_value_t = CENTRAL_CONFIG.arena.win_length)]
    pub win_length: usize,

    /// Log progress every N games (0 to disable)
    #[arg(long, default_value_t = CENTRAL_CONFIG.arena.log_interval)]
    pub log_interval: u32,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Position rows separated by '/', e.g. "XX./OO./..."
    #[arg(long)]
    pub position: String,

    /// Marks in a row needed to win (defaults to the board size)
    #[arg(long)]
    pub win_length: Option<usize>,

    #[command(flatten)]
    pub search: SearchArgs,
}

pub fn validate_log_level(level: &str) -> Result<()> {
    if level.parse::<LevelFilter>().is_err() {
        return Err(anyhow!(
            "invalid log level '{}', expected one of trace, debug, info, warn, error",
            level
        ));
    }
    Ok(())
}

impl PlayArgs {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }
        self.search.budget()?;
        self.search.backup()?;
        if self.search.threads == 0 {
            return Err(anyhow!("threads must be greater than 0"));
        }
        Ok(())
    }
}
