use core_2048::board::Board;
use core_2048::engine::{self, Move};
use core_2048::evaluator::{BoardEvaluator, LinearEvaluator};
use core_2048::rng::SplitMix64;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn warm() { engine::init(); }

fn corpus() -> Vec<Board> {
    let mut rng = SplitMix64::new(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = engine::spawn_random(engine::spawn_random(Board::EMPTY, &mut rng), &mut rng);
    boards.push(b);
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        if let Some(res) = engine::apply_move(b, seq[i % seq.len()]) {
            b = engine::spawn_random(res.board, &mut rng);
        }
        boards.push(b);
    }
    boards
}

fn bench_apply_move(c: &mut Criterion) {
    warm();
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("apply_move/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    if let Some(res) = engine::apply_move(bd, dir) {
                        acc ^= res.board.raw();
                    }
                }
                black_box(acc)
            })
        });
    }
    // Arbitrary packed words, dense boards with many merges
    let mut rng = SplitMix64::seed_from_u64(99);
    let raw: Vec<Board> = (0..256).map(|_| Board::from_raw(rng.gen())).collect();
    c.bench_function("apply_move/random_raw", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for &bd in &raw {
                for dir in Move::ALL {
                    if let Some(res) = engine::apply_move(bd, dir) {
                        acc = acc.wrapping_add(res.score_gain as u64);
                    }
                }
            }
            black_box(acc)
        })
    });
    c.bench_function("is_terminal", |bch| {
        bch.iter(|| boards.iter().filter(|&&bd| engine::is_terminal(bd)).count())
    });
}

fn bench_spawn(c: &mut Criterion) {
    warm();
    c.bench_function("board/spawn_random", |bch| {
        bch.iter_batched(
            || (Board::EMPTY, SplitMix64::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for _ in 0..16 { bd = engine::spawn_random(bd, &mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let eval = LinearEvaluator::default();
    let boards = corpus();
    c.bench_function("evaluator/linear", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for &bd in &boards { acc += eval.evaluate(bd); }
            black_box(acc)
        })
    });
}

criterion_group!(engine_ops, bench_apply_move, bench_spawn, bench_evaluate);
criterion_main!(engine_ops);
