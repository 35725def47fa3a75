use tracing::{debug, trace};

use crate::board::Board;
use crate::engine::{self, Move};
use crate::evaluator::{BoardEvaluator, LinearEvaluator};
use crate::rng::SplitMix64;
use crate::session::GameSession;

use super::{
    warm_engine_and_heuristics, BranchEval, ExpectimaxConfig, MoveChooser, NodeKind, SearchKey, SearchStats,
    TranspositionCache, MAX_SEARCH_DEPTH,
};

// Mixes the remaining depth into the sampling seed.
const SAMPLE_SEED_MIX: u64 = 0xD6E8_FEB8_6659_FD93;

/// Single-threaded Expectimax search over a [`BoardEvaluator`].
///
/// Constructors warm the engine and heuristic tables. The engine owns its
/// transposition cache; it is emptied at the start of every decision.
pub struct Expectimax<E = LinearEvaluator> {
    evaluator: E,
    cfg: ExpectimaxConfig,
    tt: TranspositionCache,
    stats: SearchStats,
}

impl<E: BoardEvaluator> Expectimax<E> {
    pub fn new(evaluator: E) -> Self { Self::with_config(evaluator, ExpectimaxConfig::default()) }

    pub fn with_config(evaluator: E, cfg: ExpectimaxConfig) -> Self {
        warm_engine_and_heuristics();
        let tt = TranspositionCache::new(cfg.tt_capacity);
        Self { evaluator, cfg, tt, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    #[inline]
    pub fn evaluator(&self) -> &E { &self.evaluator }

    /// Compute the best move using expectimax.
    ///
    /// Ties keep the first move in `Up, Down, Left, Right` order. Returns
    /// `None` only when no move is legal.
    ///
    /// Example
    /// ```
    /// use core_2048::board::Board;
    /// use core_2048::evaluator::LinearEvaluator;
    /// use core_2048::expectimax::Expectimax;
    /// let mut ex = Expectimax::new(LinearEvaluator::default());
    /// let b = Board::EMPTY.with_cell(0, 1).with_cell(1, 1);
    /// assert!(ex.best_move(b).is_some());
    /// ```
    pub fn best_move(&mut self, board: Board) -> Option<Move> {
        let branches = self.branch_evals(board);
        let mut best: Option<BranchEval> = None;
        for branch in branches.into_iter().filter(|b| b.legal) {
            if best.map_or(true, |b| branch.ev > b.ev) {
                best = Some(branch);
            }
        }
        let chosen = best.map(|b| b.dir);
        debug!(
            board = ?board,
            chosen = ?chosen,
            depth = self.stats.depth,
            nodes = self.stats.nodes,
            cache_hits = self.stats.cache_hits,
            "expectimax decision"
        );
        chosen
    }

    /// Compute EV for each direction.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// illegal moves as `legal=false`. Counts as one decision: the cache is
    /// reset and the depth is chosen exactly as in [`Self::best_move`].
    ///
    /// Example
    /// ```
    /// use core_2048::board::Board;
    /// use core_2048::engine::Move;
    /// use core_2048::evaluator::LinearEvaluator;
    /// use core_2048::expectimax::Expectimax;
    /// let mut ex = Expectimax::new(LinearEvaluator::default());
    /// let branches = ex.branch_evals(Board::EMPTY.with_cell(0, 1));
    /// assert_eq!(branches.map(|b| b.legal), [false, true, false, true]);
    /// assert_eq!(branches[1].dir, Move::Down);
    /// ```
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        self.tt.clear();
        let depth = self.search_depth(board);
        self.stats.depth = depth;
        self.stats.nodes = 0;
        self.stats.cache_hits = 0;

        let out = Move::ALL.map(|dir| match engine::apply_move(board, dir) {
            Some(res) => {
                let ev = res.score_gain as f64
                    + self.expectimax(res.board, depth.saturating_sub(1), NodeKind::Chance);
                trace!(?dir, ev, "root branch");
                BranchEval { dir, ev, legal: true }
            }
            None => BranchEval { dir, ev: 0.0, legal: false },
        });
        self.stats.peak_nodes = self.stats.peak_nodes.max(self.stats.nodes);
        out
    }

    /// EV at root, equivalent to the best branch EV. For a board with no
    /// legal move this is the evaluator's value.
    pub fn state_value(&mut self, board: Board) -> f64 {
        self.branch_evals(board)
            .iter()
            .filter(|b| b.legal)
            .map(|b| b.ev)
            .reduce(f64::max)
            .unwrap_or_else(|| self.evaluator.evaluate(board))
    }

    /// Statistics collected from the last call to [`Self::best_move`],
    /// [`Self::branch_evals`] or [`Self::state_value`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    /// Depth used for a decision on `board`: the base depth plus 3, 2 or 1
    /// when at most 2, 4 or 7 cells are empty, capped at [`MAX_SEARCH_DEPTH`].
    pub fn search_depth(&self, board: Board) -> u32 {
        let bonus = match board.count_empty() {
            0..=2 => 3,
            3..=4 => 2,
            5..=7 => 1,
            _ => 0,
        };
        self.cfg.base_depth.saturating_add(bonus).min(MAX_SEARCH_DEPTH)
    }

    fn expectimax(&mut self, board: Board, depth: u32, node: NodeKind) -> f64 {
        self.stats.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(board);
        }
        let key = SearchKey { board, depth, kind: node };
        if let Some(score) = self.tt.get(&key) {
            self.stats.cache_hits += 1;
            return score;
        }
        let score = match node {
            NodeKind::Decision => self.evaluate_decision(board, depth),
            NodeKind::Chance => self.evaluate_chance(board, depth),
        };
        self.tt.insert(key, score);
        score
    }

    fn evaluate_decision(&mut self, board: Board, depth: u32) -> f64 {
        let mut best: Option<f64> = None;
        for dir in Move::ALL {
            if let Some(res) = engine::apply_move(board, dir) {
                let score = res.score_gain as f64 + self.expectimax(res.board, depth - 1, NodeKind::Chance);
                best = Some(best.map_or(score, |b| b.max(score)));
            }
        }
        // Terminal position: nothing to look ahead to.
        best.unwrap_or_else(|| self.evaluator.evaluate(board))
    }

    fn evaluate_chance(&mut self, board: Board, depth: u32) -> f64 {
        let empties = engine::empty_cells(board);
        if empties.is_empty() {
            return self.evaluator.evaluate(board);
        }
        let slots = self.sample_empty_cells(empties, board, depth);
        let mut score = 0.0;
        for &idx in &slots {
            let board2 = engine::spawn(board, idx, 1);
            score += 0.9 * self.expectimax(board2, depth - 1, NodeKind::Decision);
            let board4 = engine::spawn(board, idx, 2);
            score += 0.1 * self.expectimax(board4, depth - 1, NodeKind::Decision);
        }
        score / slots.len() as f64
    }

    /// Keep at most `sample_width` empty cells, chosen by a partial
    /// Fisher-Yates shuffle seeded from `(board, depth)`.
    fn sample_empty_cells(&self, mut empties: Vec<usize>, board: Board, depth: u32) -> Vec<usize> {
        let k = self.cfg.sample_width;
        if k == 0 || empties.len() <= k {
            return empties;
        }
        let mut rng = SplitMix64::new(board.raw().wrapping_add((depth as u64).wrapping_mul(SAMPLE_SEED_MIX)));
        for i in 0..k {
            let j = i + rng.next_bounded(empties.len() - i);
            empties.swap(i, j);
        }
        empties.truncate(k);
        empties
    }
}

impl<E: BoardEvaluator> MoveChooser for Expectimax<E> {
    #[inline]
    fn choose_move(&mut self, session: &GameSession) -> Option<Move> { self.best_move(session.board()) }
}

impl Default for Expectimax<LinearEvaluator> {
    fn default() -> Self { Self::new(LinearEvaluator::default()) }
}
