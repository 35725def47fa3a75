use core_2048::board::Board;
use core_2048::engine::{self, Move};
use core_2048::evaluator::LinearEvaluator;
use core_2048::expectimax::{Expectimax, ExpectimaxConfig, MoveChooser};
use core_2048::rng::SplitMix64;
use core_2048::session::GameSession;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = SplitMix64::new(7777);
    let mut boards = Vec::new();
    let mut b = engine::spawn_random(engine::spawn_random(Board::EMPTY, &mut rng), &mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        if let Some(res) = engine::apply_move(b, seq[i % seq.len()]) {
            b = engine::spawn_random(res.board, &mut rng);
        }
        boards.push(b);
    }
    boards
}

fn bench_decisions(c: &mut Criterion) {
    let boards = corpus();
    let mut ex = Expectimax::new(LinearEvaluator::default());

    c.bench_function("expectimax/best_move", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for &bd in &boards {
                acc ^= ex.best_move(bd).map(|mv| mv as u64).unwrap_or(0);
            }
            black_box(acc)
        })
    });

    c.bench_function("expectimax/state_value", |bch| {
        bch.iter(|| {
            let mut acc = 0.0;
            for &bd in &boards { acc += ex.state_value(bd); }
            black_box(acc)
        })
    });
}

fn bench_e2e(c: &mut Criterion) {
    let cfg = ExpectimaxConfig { base_depth: 2, ..Default::default() };
    let mut ex = Expectimax::with_config(LinearEvaluator::default(), cfg);
    c.bench_function("e2e/64_moves", |bch| {
        bch.iter(|| {
            let mut game = GameSession::new_game(13);
            let mut steps = 0;
            while steps < 64 {
                match ex.choose_move(&game) {
                    Some(dir) => { game.apply(dir); }
                    None => break,
                }
                steps += 1;
            }
            black_box((game.board().raw(), steps))
        })
    });
}

criterion_group!(expectimax, bench_decisions, bench_e2e);
criterion_main!(expectimax);
