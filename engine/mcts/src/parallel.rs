//! Root parallelization.
//!
//! Each worker grows a private tree from the same root with its own seeded
//! random source and the full budget. Workers share nothing while they
//! search; root-child statistics are summed per move once all of them finish.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::debug;

use engine_core::Game;

use crate::config::MctsConfig;
use crate::rollout::RolloutPolicy;
use crate::search::{ChildStats, MctsSearch, SearchError, SearchResult};
use crate::selection::SelectionPolicy;

/// Run `config.threads` independent searches from `state` and merge them.
///
/// Worker seeds are drawn from `rng`, so a seeded caller gets the same
/// merged result on every run with an iteration-only budget. The merged
/// best move is the one with the most summed visits; ties go to the move
/// listed first by `legal_moves`.
pub fn search_root_parallel<G, P, R>(
    game: &G,
    selection: &P,
    rollout: &R,
    config: &MctsConfig,
    state: &G::State,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Move>, SearchError>
where
    G: Game,
    P: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    config.validate()?;

    let started = Instant::now();
    let seeds: Vec<u64> = (0..config.threads).map(|_| rng.gen()).collect();

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|idx| format!("mcts-root-{idx}"))
        .build()
        .map_err(|e| SearchError::ThreadPool(e.to_string()))?;

    let results = pool.install(|| {
        seeds
            .par_iter()
            .map(|&seed| {
                let mut worker_rng = ChaCha20Rng::seed_from_u64(seed);
                let mut search = MctsSearch::new(game, selection, rollout, config, state.clone())?;
                search.run(config.budget, &mut worker_rng)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let merged = merge_root_stats(game.legal_moves(state), &results);

    let mut best: Option<&ChildStats<G::Move>> = None;
    for stats in merged.iter().filter(|s| s.visits > 0) {
        if best.map_or(true, |top| stats.visits > top.visits) {
            best = Some(stats);
        }
    }

    let mut fallback = false;
    let best_move = match best {
        Some(stats) => Some(stats.mv),
        None => {
            fallback = true;
            game.legal_moves(state).choose(rng).copied()
        }
    };

    let iterations = results.iter().map(|r| r.iterations).sum();
    let root_visits: u32 = results.iter().map(|r| r.root_visits).sum();
    let root_value = if root_visits == 0 {
        0.0
    } else {
        results
            .iter()
            .map(|r| r.root_value * f64::from(r.root_visits))
            .sum::<f64>()
            / f64::from(root_visits)
    };

    let result = SearchResult {
        best_move,
        iterations,
        elapsed: started.elapsed(),
        root_visits,
        root_value,
        fallback,
        children: merged.into_iter().filter(|s| s.visits > 0).collect(),
    };

    debug!(
        threads = config.threads,
        iterations = result.iterations,
        root_visits = result.root_visits,
        fallback = result.fallback,
        best_move = ?result.best_move,
        "Root-parallel search complete"
    );

    Ok(result)
}

/// Sum the root-child statistics of every worker, one entry per legal move
/// in `legal` order.
fn merge_root_stats<M: Copy + PartialEq>(
    legal: Vec<M>,
    results: &[SearchResult<M>],
) -> Vec<ChildStats<M>> {
    let mut merged: Vec<ChildStats<M>> = legal
        .into_iter()
        .map(|mv| ChildStats {
            mv,
            visits: 0,
            wins: 0.0,
        })
        .collect();

    for child in results.iter().flat_map(|r| &r.children) {
        if let Some(slot) = merged.iter_mut().find(|s| s.mv == child.mv) {
            slot.visits += child.visits;
            slot.wins += child.wins;
        }
    }
    merged
}
