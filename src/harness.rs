//! Batch play: run a move chooser over many seeded games and summarize.
//!
//! Game `i` of a batch starts from seed `seed + i`. The parallel runner gives
//! every game its own engine and cache, so both runners report the same
//! numbers for the same inputs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Exponent};
use crate::evaluator::{LinearEvaluator, Weights};
use crate::expectimax::{Expectimax, ExpectimaxConfig, MoveChooser};
use crate::session::GameSession;

/// Exponent of the 2048 tile.
const WIN_EXPONENT: Exponent = 11;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("at least one game is required")]
    NoGames,
}

/// Final state of one played game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub seed: u64,
    pub score: u64,
    pub max_exponent: Exponent,
    pub steps: u64,
    pub final_board: Board,
}

/// Aggregate results of a batch of games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub games: usize,
    pub avg_score: f64,
    pub avg_max_exponent: f64,
    pub max_max_exponent: Exponent,
    /// Fraction of games that reached 2048 or better.
    pub win_rate_2048: f64,
}

/// Play one game from `seed` until no move is left or `max_steps` moves
/// have been made.
///
/// ```
/// use core_2048::evaluator::LinearEvaluator;
/// use core_2048::expectimax::{Expectimax, ExpectimaxConfig};
/// use core_2048::harness::play_game;
/// let cfg = ExpectimaxConfig { base_depth: 1, ..Default::default() };
/// let mut ex = Expectimax::with_config(LinearEvaluator::default(), cfg);
/// let out = play_game(&mut ex, 3, Some(4));
/// assert_eq!(out.steps, 4);
/// ```
pub fn play_game<C: MoveChooser + ?Sized>(chooser: &mut C, seed: u64, max_steps: Option<u64>) -> GameOutcome {
    let mut session = GameSession::new_game(seed);
    let mut steps = 0u64;
    while max_steps.map_or(true, |limit| steps < limit) {
        let Some(mv) = chooser.choose_move(&session) else { break };
        if !session.apply(mv) {
            break;
        }
        steps += 1;
    }
    let outcome = GameOutcome {
        seed,
        score: session.score(),
        max_exponent: session.max_exponent(),
        steps,
        final_board: session.board(),
    };
    debug!(seed, score = outcome.score, max_exponent = outcome.max_exponent, steps, "game finished");
    outcome
}

/// Play `games` full games on one engine, one after another.
pub fn run_games(
    weights: &Weights,
    games: usize,
    seed: u64,
    cfg: &ExpectimaxConfig,
) -> Result<EvalReport, HarnessError> {
    if games == 0 {
        return Err(HarnessError::NoGames);
    }
    let mut ex = Expectimax::with_config(LinearEvaluator::new(weights.clone()), cfg.clone());
    let outcomes: Vec<GameOutcome> =
        (0..games).map(|i| play_game(&mut ex, seed.wrapping_add(i as u64), None)).collect();
    Ok(summarize(&outcomes))
}

/// Like [`run_games`], but spreads games over the rayon pool.
pub fn run_games_parallel(
    weights: &Weights,
    games: usize,
    seed: u64,
    cfg: &ExpectimaxConfig,
) -> Result<EvalReport, HarnessError> {
    if games == 0 {
        return Err(HarnessError::NoGames);
    }
    let outcomes: Vec<GameOutcome> = (0..games)
        .into_par_iter()
        .map(|i| {
            let mut ex = Expectimax::with_config(LinearEvaluator::new(weights.clone()), cfg.clone());
            play_game(&mut ex, seed.wrapping_add(i as u64), None)
        })
        .collect();
    Ok(summarize(&outcomes))
}

fn summarize(outcomes: &[GameOutcome]) -> EvalReport {
    let games = outcomes.len();
    let n = games as f64;
    let total_score: f64 = outcomes.iter().map(|o| o.score as f64).sum();
    let total_max: f64 = outcomes.iter().map(|o| o.max_exponent as f64).sum();
    let wins = outcomes.iter().filter(|o| o.max_exponent >= WIN_EXPONENT).count();
    EvalReport {
        games,
        avg_score: total_score / n,
        avg_max_exponent: total_max / n,
        max_max_exponent: outcomes.iter().map(|o| o.max_exponent).max().unwrap_or(0),
        win_rate_2048: wins as f64 / n,
    }
}
