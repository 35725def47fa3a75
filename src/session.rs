use crate::board::{Board, Exponent};
use crate::engine::{self, Move};
use crate::rng::SplitMix64;

/// One game in progress: board, cumulative score and the spawn generator.
///
/// A session is a plain value. Cloning it forks the game, including the
/// random tile sequence still to come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSession {
    board: Board,
    score: u64,
    rng: SplitMix64,
}

impl GameSession {
    /// Fresh game: two random tiles on an empty board.
    ///
    /// ```
    /// use core_2048::session::GameSession;
    /// let a = GameSession::new_game(42);
    /// assert_eq!(a.board().count_empty(), 14);
    /// assert_eq!(a, GameSession::new_game(42));
    /// ```
    pub fn new_game(seed: u64) -> Self {
        engine::init();
        let mut rng = SplitMix64::new(seed);
        let board = engine::spawn_random(Board::EMPTY, &mut rng);
        let board = engine::spawn_random(board, &mut rng);
        Self { board, score: 0, rng }
    }

    pub fn from_parts(board: Board, score: u64, rng: SplitMix64) -> Self { Self { board, score, rng } }

    #[inline]
    pub fn board(&self) -> Board { self.board }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    #[inline]
    pub fn rng(&self) -> &SplitMix64 { &self.rng }

    #[inline]
    pub fn max_exponent(&self) -> Exponent { self.board.max_exponent() }

    pub fn is_terminal(&self) -> bool { engine::is_terminal(self.board) }

    /// Apply `mv`, add its score and spawn a tile.
    ///
    /// Returns `false` and leaves the session untouched when `mv` is illegal.
    pub fn apply(&mut self, mv: Move) -> bool {
        let Some(res) = engine::apply_move(self.board, mv) else {
            return false;
        };
        self.score = self.score.saturating_add(res.score_gain as u64);
        self.board = engine::spawn_random(res.board, &mut self.rng);
        true
    }
}
