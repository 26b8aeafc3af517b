//! Chess Engine Benchmarks
//!
//! Performance benchmarks for legality filtering and check detection using Criterion.

use chess_engine::move_gen::pseudo_legal_moves;
use chess_engine::{ChessGame, Move, Position, Side};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_new_game(c: &mut Criterion) {
    c.bench_function("new_game", |b| b.iter(|| black_box(ChessGame::new())));
}

fn bench_pseudo_legal_starting(c: &mut Criterion) {
    let game = ChessGame::new();

    c.bench_function("pseudo_legal_moves_starting_position", |b| {
        b.iter(|| {
            let total: usize = game
                .board()
                .pieces()
                .map(|(at, piece)| pseudo_legal_moves(game.board(), piece, at).len())
                .sum();
            black_box(total)
        })
    });
}

fn bench_legal_moves_all_squares(c: &mut Criterion) {
    let mut game = ChessGame::new();

    c.bench_function("legal_moves_all_squares", |b| {
        b.iter(|| {
            let total: usize = Position::all()
                .filter_map(|at| game.legal_moves(at))
                .map(|moves| moves.len())
                .sum();
            black_box(total)
        })
    });
}

fn bench_status_open_middlegame(c: &mut Criterion) {
    let mut game = ChessGame::new();
    for mv in [
        Move::new(Position::new(2, 5), Position::new(4, 5)),
        Move::new(Position::new(7, 5), Position::new(5, 5)),
        Move::new(Position::new(1, 4), Position::new(5, 8)),
        Move::new(Position::new(8, 2), Position::new(6, 3)),
    ] {
        game.apply_move(&mv).expect("scripted move is legal");
    }

    c.bench_function("status_open_middlegame", |b| {
        b.iter(|| black_box(game.status(Side::White)))
    });
}

criterion_group!(
    benches,
    bench_new_game,
    bench_pseudo_legal_starting,
    bench_legal_moves_all_squares,
    bench_status_open_middlegame
);
criterion_main!(benches);
