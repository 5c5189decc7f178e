//! The engine as a player: owns its configuration, random source and
//! (optionally) the tree retained between moves.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use engine_core::Game;

use crate::config::{MctsConfig, SearchBudget};
use crate::parallel::search_root_parallel;
use crate::rollout::{RolloutPolicy, UniformRollout};
use crate::search::{MctsSearch, SearchError, SearchResult};
use crate::selection::{SelectionPolicy, Ucb1};
use crate::tree::MctsTree;

/// Depth below the retained root searched for the next real position.
/// Two plies covers the engine's move plus the opponent's reply.
const REUSE_DEPTH: u32 = 2;

/// An MCTS player for game `G`.
#[derive(Debug)]
pub struct Mcts<G: Game, P = Ucb1, R = UniformRollout> {
    game: G,
    selection: P,
    rollout: R,
    config: MctsConfig,
    rng: ChaCha20Rng,
    retained: Option<MctsTree<G>>,
}

impl<G: Game> Mcts<G> {
    /// UCB1 selection and uniform random rollouts.
    pub fn new(game: G, config: MctsConfig) -> Self {
        let rollout = UniformRollout::new(config.rollout_max_depth);
        Self::with_policies(game, Ucb1, rollout, config)
    }
}

impl<G, P, R> Mcts<G, P, R>
where
    G: Game,
    P: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    pub fn with_policies(game: G, selection: P, rollout: R, config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            game,
            selection,
            rollout,
            config,
            rng,
            retained: None,
        }
    }

    /// Choose a move for the configured player in `state`.
    ///
    /// Returns `Ok(None)` when the side to move has no legal move.
    pub fn choose_action(
        &mut self,
        state: &G::State,
        budget: SearchBudget,
        exploration_constant: f64,
    ) -> Result<Option<G::Move>, SearchError> {
        Ok(self.search(state, budget, exploration_constant)?.best_move)
    }

    /// Choose a move using the configured budget and exploration constant.
    pub fn select_move(&mut self, state: &G::State) -> Result<Option<G::Move>, SearchError> {
        let budget = self.config.budget;
        let exploration = self.config.exploration_constant;
        self.choose_action(state, budget, exploration)
    }

    /// Run a full search and return its report.
    pub fn search(
        &mut self,
        state: &G::State,
        budget: SearchBudget,
        exploration_constant: f64,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        let config = MctsConfig {
            budget,
            exploration_constant,
            ..self.config.clone()
        };
        config.validate()?;

        if config.threads > 1 {
            // Independent trees are not kept between moves
            self.retained = None;
            return search_root_parallel(
                &self.game,
                &self.selection,
                &self.rollout,
                &config,
                state,
                &mut self.rng,
            );
        }

        let mut search = match self.take_reusable_tree(state) {
            Some(tree) => {
                MctsSearch::with_tree(&self.game, &self.selection, &self.rollout, &config, tree)?
            }
            None => MctsSearch::new(
                &self.game,
                &self.selection,
                &self.rollout,
                &config,
                state.clone(),
            )?,
        };

        let result = search.run(budget, &mut self.rng)?;
        if config.reuse_tree {
            self.retained = Some(search.into_tree());
        }
        Ok(result)
    }

    /// Pull the retained subtree rooted at `state`, if there is one.
    fn take_reusable_tree(&mut self, state: &G::State) -> Option<MctsTree<G>> {
        if !self.config.reuse_tree {
            return None;
        }
        let mut tree = self.retained.take()?;
        let node = tree.find_state(state, self.config.player, REUSE_DEPTH)?;
        tree.reroot(node);
        debug!(
            nodes = tree.len(),
            root_visits = tree.get(tree.root()).visit_count,
            "Reusing search tree"
        );
        Some(tree)
    }

    /// Forget any tree kept from the previous game.
    pub fn reset_for_new_game(&mut self) {
        self.retained = None;
    }

    /// Nodes in the retained tree, if one is kept.
    pub fn retained_nodes(&self) -> Option<usize> {
        self.retained.as_ref().map(MctsTree::len)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Player;
    use games_tictactoe::{Board, Position, TicTacToe};

    #[test]
    fn test_select_move_is_legal() {
        let mut agent = Mcts::new(TicTacToe::default(), MctsConfig::for_testing());
        let board = Board::from_rows(&["X..", ".O.", "..."]).unwrap();
        let legal = agent.game().legal_moves(&board);

        let mv = agent.select_move(&board).unwrap().unwrap();
        assert!(legal.contains(&mv));
    }

    #[test]
    fn test_seeded_agents_agree() {
        let config = MctsConfig::for_testing().with_seed(123);
        let board = TicTacToe::default().initial_state();

        let mut a = Mcts::new(TicTacToe::default(), config.clone());
        let mut b = Mcts::new(TicTacToe::default(), config);
        for _ in 0..3 {
            let left = a.search(&board, SearchBudget::iterations(150), 1.0).unwrap();
            let right = b.search(&board, SearchBudget::iterations(150), 1.0).unwrap();
            assert_eq!(left.best_move, right.best_move);
            assert_eq!(left.children, right.children);
        }
    }

    #[test]
    fn test_tree_is_retained_and_reused() {
        let config = MctsConfig::for_testing()
            .with_player(Player::Second)
            .with_tree_reuse(true)
            .with_iterations(300);
        let mut agent = Mcts::new(TicTacToe::default(), config);

        // X opened in the centre
        let first = Board::from_rows(&["...", ".X.", "..."]).unwrap();
        let mv = agent.select_move(&first).unwrap().unwrap();
        assert!(agent.retained_nodes().is_some());

        // O plays, X replies with its first legal move
        let mut next = agent.game().apply(&first, mv, Player::Second);
        let reply = agent
            .game()
            .legal_moves(&next)
            .into_iter()
            .next()
            .unwrap();
        next = agent.game().apply(&next, reply, Player::First);

        let result = agent
            .search(&next, SearchBudget::iterations(300), 1.0)
            .unwrap();
        assert_eq!(result.iterations, 300);
        assert!(
            result.root_visits > 300,
            "reused root should keep earlier visits, got {}",
            result.root_visits
        );

        agent.reset_for_new_game();
        assert_eq!(agent.retained_nodes(), None);
    }

    #[test]
    fn test_no_reuse_without_flag() {
        let mut agent = Mcts::new(TicTacToe::default(), MctsConfig::for_testing());
        agent.select_move(&TicTacToe::default().initial_state()).unwrap();
        assert_eq!(agent.retained_nodes(), None);
    }

    #[test]
    fn test_unrelated_position_starts_fresh() {
        let config = MctsConfig::for_testing().with_tree_reuse(true);
        let mut agent = Mcts::new(TicTacToe::default(), config);

        agent
            .select_move(&Board::from_rows(&["X..", ".O.", "..."]).unwrap())
            .unwrap();

        let elsewhere = Board::from_rows(&["..X", "...", "O.."]).unwrap();
        let result = agent
            .search(&elsewhere, SearchBudget::iterations(100), 1.0)
            .unwrap();
        assert_eq!(result.root_visits, 100);
    }

    #[test]
    fn test_parallel_agent_picks_win() {
        let config = MctsConfig::for_testing()
            .with_threads(3)
            .with_backup(crate::tree::Backup::Negamax);
        let mut agent = Mcts::new(TicTacToe::default(), config);
        let board = Board::from_rows(&["XX.", "OO.", "..."]).unwrap();

        let result = agent.search(&board, SearchBudget::iterations(300), 1.0).unwrap();
        assert_eq!(result.iterations, 900);
        assert_eq!(result.root_visits, 900);
        assert_eq!(result.best_move, Some(Position::new(0, 2)));
    }
}
