//! Single-position analysis for tic-tac-toe boards.

use anyhow::{Context, Result};
use engine_core::Game;
use games_tictactoe::{Board, Position, TicTacToe};
use mcts::SearchResult;
use tracing::info;

use crate::config::AnalyzeArgs;
use crate::policy::MctsPolicy;

/// Parse the position, search it for the side to move, and return the report.
pub fn analyze(args: &AnalyzeArgs) -> Result<(Board, SearchResult<Position>)> {
    let board: Board = args
        .position
        .parse()
        .with_context(|| format!("invalid position '{}'", args.position))?;
    let win_length = args.win_length.unwrap_or(board.size());
    let game = TicTacToe::new(board.size(), win_length)?;

    let player = game.side_to_move(&board);
    let config = args.search.mcts_config(player, 0)?;
    info!(
        size = board.size(),
        win_length,
        ?player,
        "Analyzing position"
    );

    let mut engine = MctsPolicy::new(game, config);
    let result = engine.search(&board)?.clone();
    Ok((board, result))
}

/// Human-readable report: the board, the chosen move, and one line per root child.
pub fn render(board: &Board, result: &SearchResult<Position>) -> String {
    let mut out = format!("{board}\n\n");
    match result.best_move {
        Some(mv) if result.fallback => out.push_str(&format!("best move: {mv} (no search, random)\n")),
        Some(mv) => out.push_str(&format!("best move: {mv}\n")),
        None => out.push_str("best move: none\n"),
    }
    out.push_str(&format!(
        "iterations: {}  root visits: {}  value: {:+.3}  time: {:.1}ms\n",
        result.iterations,
        result.root_visits,
        result.root_value,
        result.elapsed.as_secs_f64() * 1000.0
    ));

    let mut children = result.children.clone();
    children.sort_by(|a, b| b.visits.cmp(&a.visits));
    for child in children {
        out.push_str(&format!(
            "  {:<10} visits {:>7}  mean {:+.3}\n",
            child.mv.to_string(),
            child.visits,
            child.mean_value()
        ));
    }
    out
}
