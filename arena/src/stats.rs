//! Match statistics tracking.
//!
//! Tracks results from the engine's point of view, split by which seat the
//! engine played, together with search effort per move. A snapshot can be
//! serialized to JSON for scripts comparing engine settings.

use std::time::{Duration, Instant};

use engine_core::{Player, TerminalStatus};
use serde::{Deserialize, Serialize};

use crate::config::{GameKind, OpponentKind};

/// Result of one finished game for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Outcome for `engine` of a game that ended with `status`.
    pub fn for_player(status: TerminalStatus, engine: Player) -> Self {
        match status.winner() {
            Some(winner) if winner == engine => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Draw,
        }
    }
}

/// Win/draw/loss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Record {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Points per game with a draw worth half a win.
    pub fn score(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (f64::from(self.wins) + 0.5 * f64::from(self.draws)) / f64::from(games)
    }
}

/// Aggregated statistics for one arena run.
#[derive(Debug)]
pub struct MatchStats {
    game: GameKind,
    opponent: OpponentKind,
    overall: Record,
    as_first: Record,
    as_second: Record,
    total_plies: u64,
    engine_moves: u64,
    engine_iterations: u64,
    engine_think_time: Duration,
    fallbacks: u32,
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub game: GameKind,
    pub opponent: OpponentKind,
    pub games: u32,
    pub overall: Record,
    pub as_first: Record,
    pub as_second: Record,
    pub score: f64,
    pub avg_game_length: f64,
    pub avg_iterations_per_move: f64,
    pub avg_think_ms_per_move: f64,
    pub fallbacks: u32,
    pub runtime_seconds: f64,
}

impl MatchStats {
    pub fn new(game: GameKind, opponent: OpponentKind) -> Self {
        Self {
            game,
            opponent,
            overall: Record::default(),
            as_first: Record::default(),
            as_second: Record::default(),
            total_plies: 0,
            engine_moves: 0,
            engine_iterations: 0,
            engine_think_time: Duration::ZERO,
            fallbacks: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a finished game.
    pub fn record_game(&mut self, engine_seat: Player, outcome: Outcome, plies: u32) {
        self.overall.add(outcome);
        match engine_seat {
            Player::First => self.as_first.add(outcome),
            Player::Second => self.as_second.add(outcome),
        }
        self.total_plies += u64::from(plies);
    }

    /// Record one engine search.
    pub fn record_search(&mut self, iterations: u32, elapsed: Duration, fallback: bool) {
        self.engine_moves += 1;
        self.engine_iterations += u64::from(iterations);
        self.engine_think_time += elapsed;
        if fallback {
            self.fallbacks += 1;
        }
    }

    pub fn games(&self) -> u32 {
        self.overall.games()
    }

    pub fn overall(&self) -> Record {
        self.overall
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let games = self.games();
        let avg_game_length = if games > 0 {
            self.total_plies as f64 / f64::from(games)
        } else {
            0.0
        };
        let (avg_iterations_per_move, avg_think_ms_per_move) = if self.engine_moves > 0 {
            let moves = self.engine_moves as f64;
            (
                self.engine_iterations as f64 / moves,
                self.engine_think_time.as_secs_f64() * 1000.0 / moves,
            )
        } else {
            (0.0, 0.0)
        };

        MatchStatsSnapshot {
            game: self.game,
            opponent: self.opponent,
            games,
            overall: self.overall,
            as_first: self.as_first,
            as_second: self.as_second,
            score: self.overall.score(),
            avg_game_length,
            avg_iterations_per_move,
            avg_think_ms_per_move,
            fallbacks: self.fallbacks,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_for_player() {
        let x_won = TerminalStatus::Win(Player::First);
        assert_eq!(Outcome::for_player(x_won, Player::First), Outcome::Win);
        assert_eq!(Outcome::for_player(x_won, Player::Second), Outcome::Loss);
        assert_eq!(
            Outcome::for_player(TerminalStatus::Draw, Player::Second),
            Outcome::Draw
        );
    }

    #[test]
    fn test_record_score() {
        let mut record = Record::default();
        assert_eq!(record.score(), 0.0);

        record.add(Outcome::Win);
        record.add(Outcome::Draw);
        record.add(Outcome::Loss);
        record.add(Outcome::Win);
        assert_eq!(record.games(), 4);
        assert!((record.score() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_record_game_splits_by_seat() {
        let mut stats = MatchStats::new(GameKind::Tictactoe, OpponentKind::Random);
        stats.record_game(Player::First, Outcome::Win, 5);
        stats.record_game(Player::Second, Outcome::Draw, 9);
        stats.record_game(Player::Second, Outcome::Win, 8);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.games, 3);
        assert_eq!(
            snapshot.as_first,
            Record {
                wins: 1,
                draws: 0,
                losses: 0
            }
        );
        assert_eq!(
            snapshot.as_second,
            Record {
                wins: 1,
                draws: 1,
                losses: 0
            }
        );
        assert!((snapshot.avg_game_length - 22.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_search_averages() {
        let mut stats = MatchStats::new(GameKind::Connect4, OpponentKind::Mcts);
        stats.record_search(1000, Duration::from_millis(20), false);
        stats.record_search(0, Duration::from_millis(10), true);

        let snapshot = stats.snapshot();
        assert!((snapshot.avg_iterations_per_move - 500.0).abs() < 1e-12);
        assert!((snapshot.avg_think_ms_per_move - 15.0).abs() < 1e-9);
        assert_eq!(snapshot.fallbacks, 1);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut stats = MatchStats::new(GameKind::Tictactoe, OpponentKind::Random);
        stats.record_game(Player::First, Outcome::Loss, 7);

        let json = serde_json::to_string(&stats.snapshot()).unwrap();
        assert!(json.contains("\"game\":\"tictactoe\""));
        assert!(json.contains("\"opponent\":\"random\""));

        let parsed: MatchStatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.overall.losses, 1);
    }
}
