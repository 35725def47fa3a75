//! Expectimax search policy for 2048.
//!
//! [`Expectimax`] alternates decision nodes (the player picks the best move)
//! and chance nodes (the game spawns a 2 or 4 on an empty cell). Depth grows
//! as the board fills up, crowded chance nodes are evaluated on a
//! deterministic sample of empty cells, and subresults are memoized in a
//! [`TranspositionCache`] that lives for exactly one decision.
//!
//! Notes
//! - The engine's lookup and heuristic tables are initialized lazily; the
//!   constructors warm them for you.
//! - The search is deterministic: the same board and configuration always
//!   produce the same move. Randomness only occurs when a
//!   [`GameSession`](crate::session::GameSession) spawns a tile.
//! - One engine owns one cache. Run independent games on independent engines.
//!
//! Quick start
//! ```
//! use core_2048::evaluator::{LinearEvaluator, Weights};
//! use core_2048::expectimax::{Expectimax, MoveChooser};
//! use core_2048::session::GameSession;
//!
//! let mut ex = Expectimax::new(LinearEvaluator::new(Weights::baseline()));
//! let mut game = GameSession::new_game(123);
//! let mv = ex.choose_move(&game).unwrap();
//! assert!(game.apply(mv));
//! ```

use crate::engine::{self, Move};
use crate::heuristic;
use crate::session::GameSession;

mod search;
mod tt;

pub use search::Expectimax;
pub use tt::{NodeKind, SearchKey, TranspositionCache};

/// Hard ceiling on the adaptive search depth.
pub const MAX_SEARCH_DEPTH: u32 = 8;

/// Chooses the next move for a session; `None` means the game is over.
pub trait MoveChooser {
    fn choose_move(&mut self, session: &GameSession) -> Option<Move>;
}

/// Configurable knobs for Expectimax.
///
/// - `base_depth`: depth before the adaptive bonus for crowded boards.
/// - `sample_width`: chance nodes with more empty cells than this evaluate
///   only this many of them. `0` always evaluates every empty cell.
/// - `tt_capacity`: transposition cache size; the cache is wiped whenever it
///   would overflow. `0` disables caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectimaxConfig {
    pub base_depth: u32,
    pub sample_width: usize,
    pub tt_capacity: usize,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { base_depth: 3, sample_width: 6, tt_capacity: 200_000 }
    }
}

/// Per-branch expected value at the root.
///
/// - `ev` is the score gained by `dir` plus the expected value of the
///   position it leads to.
/// - `legal` is false when the move is a no-op for the current board; `ev`
///   is then 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub ev: f64,
    pub legal: bool,
}

/// Basic search stats for a single decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Depth chosen by the adaptive policy.
    pub depth: u32,
    /// Nodes visited, cache hits included.
    pub nodes: u64,
    pub cache_hits: u64,
    /// Largest `nodes` seen since the last [`Expectimax::reset_stats`].
    pub peak_nodes: u64,
}

/// Common helper for constructors to ensure tables are initialized.
fn warm_engine_and_heuristics() {
    // Safe to call multiple times.
    engine::init();
    heuristic::warm();
}
