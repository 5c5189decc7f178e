use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::{Game, Player};
use games_tictactoe::{Board, Position, TicTacToe};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_legal_moves");
    let game = TicTacToe::default();
    let board: Board = "X.O/.X./O..".parse().unwrap();
    group.bench_function("3x3_midgame", |b| {
        b.iter(|| game.legal_moves(black_box(&board)))
    });
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_apply");
    let game = TicTacToe::default();
    let board = game.initial_state();
    group.bench_function("apply_center", |b| {
        b.iter(|| game.apply(black_box(&board), Position::new(1, 1), Player::First))
    });
    group.finish();
}

fn bench_terminal_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_terminal_status");

    let classic = TicTacToe::default();
    let draw: Board = "XOX/XOO/OXX".parse().unwrap();
    group.bench_function("3x3_full_board", |b| {
        b.iter(|| classic.terminal_status(black_box(&draw)))
    });

    let gomoku = TicTacToe::new(9, 5).unwrap();
    let empty = gomoku.initial_state();
    group.bench_function("9x9_k5_empty", |b| {
        b.iter(|| gomoku.terminal_status(black_box(&empty)))
    });

    group.finish();
}

fn bench_random_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_random_game");
    let game = TicTacToe::default();
    group.bench_function("play_to_end", |b| {
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(42),
            |mut rng| {
                let mut state = game.initial_state();
                let mut player = Player::First;
                while !game.terminal_status(&state).is_terminal() {
                    let moves = game.legal_moves(&state);
                    let Some(&mv) = moves.choose(&mut rng) else {
                        break;
                    };
                    state = game.apply(&state, mv, player);
                    player = game.other_player(player);
                }
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves,
    bench_apply,
    bench_terminal_status,
    bench_random_game
);
criterion_main!(benches);
