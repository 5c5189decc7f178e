//! Match runner: plays the engine against an opponent for a number of games.

use anyhow::{bail, Result};
use engine_core::{Game, Player};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{OpponentKind, PlayArgs};
use crate::policy::{MctsPolicy, Policy, RandomPolicy};
use crate::stats::{MatchStats, Outcome};

/// Runs a series of games between the engine and one opponent.
///
/// The engine takes the first seat in even-numbered games and the second in
/// odd-numbered ones. Every game gets fresh policies; with a configured seed,
/// each game's seeds derive from its index so a run is reproducible.
pub struct Arena<G: Game + Clone> {
    game: G,
    args: PlayArgs,
    stats: MatchStats,
}

impl<G: Game + Clone> Arena<G> {
    pub fn new(game: G, args: PlayArgs) -> Self {
        let stats = MatchStats::new(args.game, args.opponent);
        Self { game, args, stats }
    }

    pub fn run(&mut self) -> Result<&MatchStats> {
        let metadata = self.game.metadata();
        info!(
            game = %metadata.display_name,
            games = self.args.games,
            opponent = ?self.args.opponent,
            backup = %self.args.search.backup,
            threads = self.args.search.threads,
            "Starting arena"
        );

        let started = Instant::now();
        for index in 0..self.args.games {
            let (outcome, plies) = self.play_game(index)?;
            let played = index + 1;

            if self.args.log_interval > 0 && played % self.args.log_interval == 0 {
                let record = self.stats.overall();
                info!(
                    "Completed {} games: {}W {}D {}L ({:.1}s)",
                    played,
                    record.wins,
                    record.draws,
                    record.losses,
                    started.elapsed().as_secs_f64()
                );
            }
            debug!(game = played, ?outcome, plies, "Game finished");
        }

        Ok(&self.stats)
    }

    fn engine_seat(index: u32) -> Player {
        if index % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn opponent_for(&self, seat: Player, index: u32) -> Result<Box<dyn Policy<G>>> {
        let offset = 2 * u64::from(index) + 1;
        Ok(match self.args.opponent {
            OpponentKind::Random if self.args.search.seed != 0 => Box::new(RandomPolicy::with_seed(
                self.game.clone(),
                self.args.search.seed.wrapping_add(offset),
            )),
            OpponentKind::Random => Box::new(RandomPolicy::new(self.game.clone())),
            OpponentKind::Mcts => Box::new(MctsPolicy::new(
                self.game.clone(),
                self.args.search.mcts_config(seat, offset)?,
            )),
        })
    }

    /// Play one game and return the engine's result and its length in plies.
    fn play_game(&mut self, index: u32) -> Result<(Outcome, u32)> {
        let engine_seat = Self::engine_seat(index);
        let mut engine = MctsPolicy::new(
            self.game.clone(),
            self.args.search.mcts_config(engine_seat, 2 * u64::from(index))?,
        );
        let mut opponent = self.opponent_for(engine_seat.opponent(), index)?;

        let mut state = self.game.initial_state();
        let mut to_move = self.game.side_to_move(&state);
        let mut plies = 0u32;

        let status = loop {
            let status = self.game.terminal_status(&state);
            if status.is_terminal() {
                break status;
            }

            let engine_turn = to_move == engine_seat;
            let policy: &mut dyn Policy<G> = if engine_turn {
                &mut engine
            } else {
                opponent.as_mut()
            };
            let Some(mv) = policy.select_move(&state)? else {
                bail!(
                    "{} player has no legal move in an unfinished game",
                    policy.name()
                );
            };

            if engine_turn {
                if let Some(report) = engine.last_search() {
                    self.stats
                        .record_search(report.iterations, report.elapsed, report.fallback);
                }
            }

            state = self.game.apply(&state, mv, to_move);
            to_move = self.game.other_player(to_move);
            plies += 1;
        };

        let outcome = Outcome::for_player(status, engine_seat);
        self.stats.record_game(engine_seat, outcome, plies);
        Ok((outcome, plies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameKind, SearchArgs};
    use games_connect4::Connect4;
    use games_tictactoe::TicTacToe;

    fn test_args(game: GameKind, opponent: OpponentKind, games: u32) -> PlayArgs {
        PlayArgs {
            game,
            games,
            opponent,
            board_size: 3,
            win_length: 3,
            log_interval: 0,
            json: false,
            search: SearchArgs {
                exploration: 1.0,
                time_limit_ms: 0,
                iterations: 300,
                threads: 1,
                reuse_tree: false,
                backup: "negamax".into(),
                rollout_max_depth: 1000,
                seed: 42,
            },
        }
    }

    #[test]
    fn test_arena_alternates_seats() {
        let args = test_args(GameKind::Tictactoe, OpponentKind::Random, 4);
        let mut arena = Arena::new(TicTacToe::default(), args);

        let snapshot = arena.run().unwrap().snapshot();
        assert_eq!(snapshot.games, 4);
        assert_eq!(snapshot.as_first.games(), 2);
        assert_eq!(snapshot.as_second.games(), 2);
        assert!(snapshot.avg_game_length >= 5.0 && snapshot.avg_game_length <= 9.0);
        assert!((snapshot.avg_iterations_per_move - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_does_not_lose_to_random_tictactoe() {
        let args = test_args(GameKind::Tictactoe, OpponentKind::Random, 6);
        let mut arena = Arena::new(TicTacToe::default(), args);

        let record = arena.run().unwrap().overall();
        assert_eq!(record.games(), 6);
        assert!(record.losses <= 1, "engine lost {} games", record.losses);
    }

    #[test]
    fn test_engine_vs_engine_connect4() {
        let mut args = test_args(GameKind::Connect4, OpponentKind::Mcts, 2);
        args.search.iterations = 40;
        args.search.reuse_tree = true;
        let mut arena = Arena::new(Connect4, args);

        let snapshot = arena.run().unwrap().snapshot();
        assert_eq!(snapshot.games, 2);
        assert!(snapshot.avg_game_length >= 7.0);
        assert_eq!(snapshot.fallbacks, 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let play = || {
            let args = test_args(GameKind::Tictactoe, OpponentKind::Random, 3);
            let mut arena = Arena::new(TicTacToe::default(), args);
            let snapshot = arena.run().unwrap().snapshot();
            (snapshot.overall, snapshot.avg_game_length)
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_engine_seat() {
        assert_eq!(Arena::<TicTacToe>::engine_seat(0), Player::First);
        assert_eq!(Arena::<TicTacToe>::engine_seat(1), Player::Second);
        assert_eq!(Arena::<TicTacToe>::engine_seat(2), Player::First);
    }
}
