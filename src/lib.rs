//! core-2048: a bit-packed 2048 engine + Expectimax policy
//!
//! This crate provides:
//! - A compact `Board` type (16 nibbles in a `u64`) and its bit-level primitives (`board` module)
//! - Table-driven move rules and tile spawning (`engine` module)
//! - A seeded SplitMix64 generator shared by gameplay and search (`rng` module)
//! - A weighted linear evaluator over precomputed row features (`heuristic`, `evaluator` modules)
//! - A sampled, memoized Expectimax move chooser (`expectimax` module)
//! - Batch evaluation of weights over many seeded games (`harness` module)
//!
//! Quick start:
//! ```
//! use core_2048::engine::{self, Move};
//! use core_2048::session::GameSession;
//!
//! // One-time table init (optional, tables are also built on first use)
//! engine::init();
//!
//! // Deterministic game from a seed
//! let mut game = GameSession::new_game(42);
//! assert_eq!(game.board().count_empty(), 14);
//! let legal = engine::legal_moves(game.board());
//! assert!(game.apply(legal[0]));
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use core_2048::evaluator::{LinearEvaluator, Weights};
//! use core_2048::expectimax::{Expectimax, MoveChooser};
//! use core_2048::session::GameSession;
//!
//! // 1) Build a policy from weights
//! let mut policy = Expectimax::new(LinearEvaluator::new(Weights::baseline()));
//!
//! // 2) Start a seeded game
//! let mut game = GameSession::new_game(123);
//! let mut moves = 0u32;
//!
//! // 3) Loop a couple of moves to demonstrate flow (keep doctests fast)
//! while moves < 4 {
//!     match policy.choose_move(&game) {
//!         Some(mv) => {
//!             game.apply(mv);
//!             moves += 1;
//!         }
//!         None => break,
//!     }
//! }
//!
//! // 4) Inspect final state
//! assert!(moves > 0);
//! let _score = game.score();
//! ```
//!
pub mod board;
pub mod engine;
pub mod evaluator;
pub mod expectimax;
pub mod harness;
pub mod heuristic;
pub mod rng;
pub mod session;
