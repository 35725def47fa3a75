//! Per-row heuristic tables and the board-level features built from them.
//!
//! Each table is indexed by the 16-bit row value, exactly like the row
//! transition table in [`engine`](crate::engine). A board is scored by
//! summing the four rows and, through a transpose, the four columns.

use std::sync::OnceLock;

use crate::board::{Board, Exponent, Row, ROW_COUNT};

const LINE_TABLE_SIZE: usize = 0x1_0000;

const CORNERS: [usize; 4] = [0, 3, 12, 15];

struct RowFeatureTables {
    smooth: Box<[i16]>,
    mono: Box<[i16]>,
    merge_potential: Box<[u8]>,
}

static ROW_FEATURES: OnceLock<RowFeatureTables> = OnceLock::new();

pub(crate) fn warm() {
    let _ = tables();
}

#[inline(always)]
fn tables() -> &'static RowFeatureTables {
    ROW_FEATURES.get_or_init(create_tables)
}

fn create_tables() -> RowFeatureTables {
    let mut smooth = vec![0i16; LINE_TABLE_SIZE];
    let mut mono = vec![0i16; LINE_TABLE_SIZE];
    let mut merge_potential = vec![0u8; LINE_TABLE_SIZE];
    for row in 0..LINE_TABLE_SIZE {
        let tiles = row_to_tiles(row as Row);
        smooth[row] = calc_smoothness(&tiles);
        mono[row] = calc_monotonicity(&tiles);
        merge_potential[row] = calc_merge_potential(&tiles);
    }
    RowFeatureTables {
        smooth: smooth.into_boxed_slice(),
        mono: mono.into_boxed_slice(),
        merge_potential: merge_potential.into_boxed_slice(),
    }
}

fn row_to_tiles(row: Row) -> [Exponent; 4] {
    [0, 1, 2, 3].map(|c| ((row >> (c * 4)) & 0xf) as Exponent)
}

/// Negative sum of exponent gaps between adjacent non-empty cells.
fn calc_smoothness(tiles: &[Exponent; 4]) -> i16 {
    tiles
        .windows(2)
        .filter(|w| w[0] != 0 && w[1] != 0)
        .map(|w| -((w[0] as i16 - w[1] as i16).abs()))
        .sum()
}

/// `-min(total increase, total decrease)` over the three adjacent pairs.
/// Zero for a row that never turns around.
fn calc_monotonicity(tiles: &[Exponent; 4]) -> i16 {
    let mut inc = 0i16;
    let mut dec = 0i16;
    for w in tiles.windows(2) {
        let (a, b) = (w[0] as i16, w[1] as i16);
        if a > b {
            dec += a - b;
        } else {
            inc += b - a;
        }
    }
    -inc.min(dec)
}

fn calc_merge_potential(tiles: &[Exponent; 4]) -> u8 {
    tiles.windows(2).filter(|w| w[0] != 0 && w[0] == w[1]).count() as u8
}

/// Raw feature values for a board, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoardFeatures {
    pub empty: f64,
    pub max_exponent: f64,
    pub smooth: f64,
    pub mono: f64,
    pub merge_potential: f64,
    pub corner_max: f64,
}

impl BoardFeatures {
    /// Compute all features for `board`.
    ///
    /// ```
    /// use core_2048::board::Board;
    /// use core_2048::heuristic::BoardFeatures;
    /// // 4 in the top-left corner next to a 2.
    /// let f = BoardFeatures::of(Board::EMPTY.with_cell(0, 2).with_cell(1, 1));
    /// assert_eq!(f.empty, 14.0);
    /// assert_eq!(f.max_exponent, 2.0);
    /// assert_eq!(f.smooth, -1.0);
    /// assert_eq!(f.corner_max, 2.0);
    /// ```
    pub fn of(board: Board) -> Self {
        let t = tables();
        let transposed = board.transpose();
        let (mut smooth, mut mono, mut merge) = (0i32, 0i32, 0i32);
        for line in (0..ROW_COUNT).flat_map(|r| [board.row(r), transposed.row(r)]) {
            let idx = line as usize;
            smooth += t.smooth[idx] as i32;
            mono += t.mono[idx] as i32;
            merge += t.merge_potential[idx] as i32;
        }

        let max_e = board.max_exponent();
        BoardFeatures {
            empty: board.count_empty() as f64,
            max_exponent: max_e as f64,
            smooth: smooth as f64,
            mono: mono as f64,
            merge_potential: merge as f64,
            corner_max: corner_max(board, max_e),
        }
    }
}

// First matching corner wins; the bonus is the max exponent itself.
fn corner_max(board: Board, max_e: Exponent) -> f64 {
    CORNERS
        .iter()
        .find(|&&idx| board.cell(idx) == max_e)
        .map_or(0.0, |_| max_e as f64)
}
