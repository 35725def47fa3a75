use core_2048::evaluator::{Feature, LinearEvaluator, Weights};
use core_2048::expectimax::{Expectimax, MoveChooser};
use core_2048::rng::SplitMix64;
use core_2048::session::GameSession;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Optional seed as the only argument, random otherwise
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SplitMix64::from_entropy().gen::<u64>());
    info!(seed, "starting game");

    let mut expectimax = Expectimax::new(LinearEvaluator::new(Weights::baseline()));
    let weights = expectimax.evaluator().weights();
    for feature in Feature::ALL {
        info!(feature = %feature, weight = weights.get(feature), version = %weights.version, "evaluator weight");
    }
    let mut game = GameSession::new_game(seed);
    println!("{}", game.board());
    let mut move_count = 0u64;
    let mut total_states = 0u64;
    while let Some(direction) = expectimax.choose_move(&game) {
        game.apply(direction);
        move_count += 1;
        total_states = total_states.saturating_add(expectimax.last_stats().nodes);
        println!("{direction}\n{}", game.board());
    }
    println!(
        "Seed: {}, Moves made: {}, Score: {}, Max tile: {}, States considered: {}, Max states considered for a move: {}",
        seed,
        move_count,
        game.score(),
        1u32 << game.max_exponent(),
        total_states,
        expectimax.last_stats().peak_nodes
    );
}
