//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full MCTS search with varying iteration counts
//! - Tree operations (expansion, selection, backpropagation)
//! - Search from different game states (opening, midgame, near-terminal)
//! - Game comparison (TicTacToe vs Connect4)
//! - Root parallelization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{Game, Player};
use games_connect4::Connect4;
use games_tictactoe::{Board, Position, TicTacToe};
use mcts::{
    search_root_parallel, Backup, MctsConfig, MctsSearch, MctsTree, SearchBudget, Ucb1,
    UniformRollout,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn run_search<G: Game>(game: &G, state: G::State, config: &MctsConfig) -> Option<G::Move> {
    let rollout = UniformRollout::default();
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut search = MctsSearch::new(game, &Ucb1, &rollout, config, state).unwrap();
    search.run(config.budget, &mut rng).unwrap().best_move
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    let game = TicTacToe::default();

    for iterations in [50, 100, 200, 400, 800, 1600] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("tictactoe", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::for_testing().with_iterations(iterations);
                b.iter(|| black_box(run_search(&game, game.initial_state(), &config)));
            },
        );
    }

    group.finish();
}

fn bench_mcts_connect4(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_connect4");
    let game = Connect4;

    // Connect4 has a larger state space and much longer rollouts
    for iterations in [50, 100, 200, 400, 800] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("opening", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::for_testing().with_iterations(iterations);
                b.iter(|| black_box(run_search(&game, game.initial_state(), &config)));
            },
        );
    }

    group.finish();
}

fn bench_mcts_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let game = TicTacToe::default();
    let config = MctsConfig::for_testing();

    let positions = [
        ("opening", game.initial_state()),
        // X centre and corner, O two corners
        ("midgame", Board::from_rows(&["O.X", ".X.", "O.."]).unwrap()),
        // X completes the top row next move
        ("near_terminal", Board::from_rows(&["XX.", "OO.", "..."]).unwrap()),
    ];

    for (name, board) in positions {
        group.bench_function(name, |b| {
            b.iter(|| black_box(run_search(&game, board.clone(), &config)));
        });
    }

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");
    let game = TicTacToe::default();

    group.bench_function("expand_all_root_moves", |b| {
        b.iter(|| {
            let mut tree = MctsTree::new(&game, game.initial_state(), Player::First);
            let root = tree.root();
            while let Some(&mv) = tree.get(root).untried_moves.first() {
                tree.expand(&game, root, mv);
            }
            black_box(tree.len())
        });
    });

    group.bench_function("select_child", |b| {
        let mut tree = MctsTree::new(&game, game.initial_state(), Player::First);
        let root = tree.root();
        for i in 0..9u8 {
            let child = tree.expand(&game, root, Position::new(i / 3, i % 3));
            let node = tree.get_mut(child);
            node.visit_count = (u32::from(i) + 1) * 10;
            node.win_count = (f64::from(i) - 4.0) * 0.1 * f64::from(node.visit_count);
        }
        tree.get_mut(root).visit_count = 450;

        b.iter(|| black_box(tree.best_child_by_ucb1(root, 1.0)));
    });

    for backup in [Backup::RootPlayer, Backup::Negamax] {
        group.bench_function(format!("backpropagate_depth_5_{backup}"), |b| {
            b.iter_batched(
                || {
                    let mut tree = MctsTree::new(&game, game.initial_state(), Player::First);
                    let mut parent = tree.root();
                    for mv in [0u8, 3, 1, 4, 8] {
                        parent = tree.expand(&game, parent, Position::new(mv / 3, mv % 3));
                    }
                    (tree, parent)
                },
                |(mut tree, leaf)| {
                    tree.backpropagate(leaf, 1.0, backup, Player::First);
                    black_box(tree)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Root Parallelization Benchmarks
// =============================================================================

fn bench_root_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_root_parallel");
    let game = Connect4;
    let rollout = UniformRollout::default();

    for threads in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::new("connect4", threads), &threads, |b, &threads| {
            let config = MctsConfig::for_testing()
                .with_budget(SearchBudget::iterations(200))
                .with_threads(threads);
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                black_box(
                    search_root_parallel(
                        &game,
                        &Ucb1,
                        &rollout,
                        &config,
                        &game.initial_state(),
                        &mut rng,
                    )
                    .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_iterations,
    bench_mcts_connect4,
    bench_mcts_game_phases,
    bench_tree_operations,
    bench_root_parallel,
);
criterion_main!(benches);
