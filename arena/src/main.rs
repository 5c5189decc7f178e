//! Arena - match runner and position analysis for the MCTS engine
//!
//! Two commands:
//! 1. `play` pits the engine against a random player or a second engine
//!    for a number of games and reports the results per seat
//! 2. `analyze` searches one tic-tac-toe position and prints the root
//!    statistics for every candidate move

use anyhow::Result;
use clap::Parser;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use tracing::info;

mod analyze;
mod config;
mod policy;
mod runner;
mod stats;

use crate::config::{Cli, Command, GameKind, PlayArgs};
use crate::runner::Arena;
use crate::stats::MatchStats;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::validate_log_level(&cli.log_level)?;
    init_tracing(&cli.log_level)?;
    info!(log_level = %cli.log_level, "Tracing initialized");

    match cli.command {
        Command::Play(args) => play(args),
        Command::Analyze(args) => {
            let (board, result) = analyze::analyze(&args)?;
            print!("{}", analyze::render(&board, &result));
            Ok(())
        }
    }
}

fn play(args: PlayArgs) -> Result<()> {
    args.validate()?;
    let json = args.json;

    match args.game {
        GameKind::Tictactoe => {
            let game = TicTacToe::new(args.board_size, args.win_length)?;
            let mut arena = Arena::new(game, args);
            report(arena.run()?, json)
        }
        GameKind::Connect4 => {
            let mut arena = Arena::new(Connect4, args);
            report(arena.run()?, json)
        }
    }
}

fn report(stats: &MatchStats, json: bool) -> Result<()> {
    let snapshot = stats.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let overall = snapshot.overall;
    println!(
        "{:?} vs {:?}: {} games in {:.1}s",
        snapshot.game, snapshot.opponent, snapshot.games, snapshot.runtime_seconds
    );
    println!(
        "  overall     {:>4}W {:>4}D {:>4}L  score {:.3}",
        overall.wins, overall.draws, overall.losses, snapshot.score
    );
    for (label, record) in [("as first", snapshot.as_first), ("as second", snapshot.as_second)] {
        println!(
            "  {:<11} {:>4}W {:>4}D {:>4}L  score {:.3}",
            label,
            record.wins,
            record.draws,
            record.losses,
            record.score()
        );
    }
    println!(
        "  avg length {:.1} plies, {:.0} iterations and {:.2}ms per engine move",
        snapshot.avg_game_length, snapshot.avg_iterations_per_move, snapshot.avg_think_ms_per_move
    );
    if snapshot.fallbacks > 0 {
        println!("  {} moves fell back to a random choice", snapshot.fallbacks);
    }
    Ok(())
}
