//! Move selection policies for the arena

use anyhow::Result;
use engine_core::Game;
use mcts::{Mcts, MctsConfig, SearchResult};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

/// Something that picks moves for one side of a game.
pub trait Policy<G: Game> {
    /// Short label for logs and summaries.
    fn name(&self) -> &'static str;

    /// Pick a move for the side to move in `state`, or `None` if it has none.
    fn select_move(&mut self, state: &G::State) -> Result<Option<G::Move>>;

    /// Report of the most recent search, for policies that search.
    fn last_search(&self) -> Option<&SearchResult<G::Move>> {
        None
    }
}

/// Policy that selects legal moves uniformly at random.
#[derive(Debug)]
pub struct RandomPolicy<G> {
    game: G,
    rng: ChaCha20Rng,
}

impl<G: Game> RandomPolicy<G> {
    pub fn new(game: G) -> Self {
        let rng = ChaCha20Rng::from_entropy();
        Self { game, rng }
    }

    pub fn with_seed(game: G, seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        Self { game, rng }
    }
}

impl<G: Game> Policy<G> for RandomPolicy<G> {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_move(&mut self, state: &G::State) -> Result<Option<G::Move>> {
        Ok(self.game.legal_moves(state).choose(&mut self.rng).copied())
    }
}

/// Policy backed by the MCTS engine.
#[derive(Debug)]
pub struct MctsPolicy<G: Game> {
    engine: Mcts<G>,
    last: Option<SearchResult<G::Move>>,
}

impl<G: Game> MctsPolicy<G> {
    pub fn new(game: G, config: MctsConfig) -> Self {
        Self {
            engine: Mcts::new(game, config),
            last: None,
        }
    }

    /// Run a search with the configured budget and keep its report.
    pub fn search(&mut self, state: &G::State) -> Result<&SearchResult<G::Move>> {
        let config = self.engine.config();
        let (budget, exploration) = (config.budget, config.exploration_constant);
        let result = self.engine.search(state, budget, exploration)?;
        Ok(self.last.insert(result))
    }
}

impl<G: Game> Policy<G> for MctsPolicy<G> {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn select_move(&mut self, state: &G::State) -> Result<Option<G::Move>> {
        Ok(self.search(state)?.best_move)
    }

    fn last_search(&self) -> Option<&SearchResult<G::Move>> {
        self.last.as_ref()
    }
}
