use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::board::{self, Board, Exponent, Row, CELL_COUNT, MAX_EXPONENT, ROW_COUNT};
use crate::rng::SplitMix64;

/// A direction to move/merge tiles.
///
/// The declaration order is the enumeration order used everywhere a move is
/// tried in turn, and it decides ties in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in enumeration order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown move: {0:?}")]
pub struct ParseMoveError(String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseMoveError(s.to_owned()))
    }
}

/// Board after a legal move plus the score it earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub board: Board,
    /// Sum of the values of every tile created by a merge.
    pub score_gain: u32,
}

/// Outcome of sliding a single row towards column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowMove {
    pub out_row: Row,
    pub score_gain: u32,
}

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

static ROW_TABLE: OnceLock<Box<[RowMove]>> = OnceLock::new();

/// Initialize the row table. Safe to call multiple times; every other entry
/// point initializes lazily as well.
pub fn init() {
    let _ = row_table();
}

#[inline(always)]
fn row_table() -> &'static [RowMove] {
    ROW_TABLE.get_or_init(create_row_table)
}

fn create_row_table() -> Box<[RowMove]> {
    // Allocate on the heap to avoid large stack frames
    let mut table = vec![RowMove::default(); LINE_TABLE_SIZE];
    for (row, slot) in table.iter_mut().enumerate() {
        *slot = slide_row_left(row as Row);
    }
    table.into_boxed_slice()
}

/// Table lookup for sliding `row` towards column 0.
///
/// ```
/// use core_2048::engine::move_row_left;
/// // [2, 2, 4, 0] slides to [4, 4, 0, 0] and scores 4.
/// let mv = move_row_left(0x0211);
/// assert_eq!(mv.out_row, 0x0022);
/// assert_eq!(mv.score_gain, 4);
/// ```
#[inline(always)]
pub fn move_row_left(row: Row) -> RowMove {
    // Any u16 indexes a 65,536-entry table.
    row_table()[row as usize]
}

fn slide_row_left(row: Row) -> RowMove {
    let mut tiles = [0 as Exponent; 4];
    let mut len = 0;
    for c in 0..4 {
        let e = ((row >> (c * 4)) & 0xf) as Exponent;
        if e != 0 {
            tiles[len] = e;
            len += 1;
        }
    }

    let mut out = [0 as Exponent; 4];
    let mut score_gain = 0u32;
    let (mut src, mut dst) = (0, 0);
    while src < len {
        let e = tiles[src];
        if src + 1 < len && tiles[src + 1] == e {
            out[dst] = (e + 1).min(MAX_EXPONENT);
            score_gain += 1 << (e as u32 + 1);
            src += 2;
        } else {
            out[dst] = e;
            src += 1;
        }
        dst += 1;
    }

    let out_row = out.iter().enumerate().fold(0, |acc, (c, &e)| acc | ((e as Row) << (c * 4)));
    RowMove { out_row, score_gain }
}

/// Apply `mv` to `board`.
///
/// Returns `None` when no row (or column) changes, which is the only
/// legality signal: an illegal move leaves the board as it was.
///
/// ```
/// use core_2048::board::Board;
/// use core_2048::engine::{apply_move, Move};
/// let b = Board::EMPTY.with_cell(1, 1).with_cell(3, 1);
/// let res = apply_move(b, Move::Left).unwrap();
/// assert_eq!(res.board, Board::EMPTY.with_cell(0, 2));
/// assert_eq!(res.score_gain, 4);
/// assert!(apply_move(res.board, Move::Left).is_none());
/// ```
pub fn apply_move(board: Board, mv: Move) -> Option<MoveResult> {
    match mv {
        Move::Left => shift_rows(board, false),
        Move::Right => shift_rows(board, true),
        Move::Up => shift_rows(board.transpose(), false).map(transpose_result),
        Move::Down => shift_rows(board.transpose(), true).map(transpose_result),
    }
}

#[inline]
fn transpose_result(res: MoveResult) -> MoveResult {
    MoveResult { board: res.board.transpose(), score_gain: res.score_gain }
}

#[inline]
fn shift_rows(board: Board, reversed: bool) -> Option<MoveResult> {
    let mut out = 0;
    let mut score_gain = 0;
    let mut moved = false;
    for r in 0..ROW_COUNT {
        let row = board.row(r);
        let new_row = if reversed {
            let mv = move_row_left(board::reverse_row(row));
            score_gain += mv.score_gain;
            board::reverse_row(mv.out_row)
        } else {
            let mv = move_row_left(row);
            score_gain += mv.score_gain;
            mv.out_row
        };
        moved |= new_row != row;
        out |= board::decode_row(new_row, r);
    }
    moved.then(|| MoveResult { board: Board::from_raw(out), score_gain })
}

/// Moves that change `board`, in enumeration order.
pub fn legal_moves(board: Board) -> Vec<Move> {
    Move::ALL.into_iter().filter(|&m| apply_move(board, m).is_some()).collect()
}

/// True if no move in any direction changes the board.
pub fn is_terminal(board: Board) -> bool {
    Move::ALL.into_iter().all(|m| apply_move(board, m).is_none())
}

/// Indices of empty cells, ascending.
pub fn empty_cells(board: Board) -> Vec<usize> {
    let mut cells = Vec::with_capacity(CELL_COUNT);
    let mut tmp = board.raw();
    for idx in 0..CELL_COUNT {
        if tmp & 0xf == 0 {
            cells.push(idx);
        }
        tmp >>= 4;
    }
    cells
}

/// Place a tile with `exponent` on the empty cell `idx`.
#[inline]
pub fn spawn(board: Board, idx: usize, exponent: Exponent) -> Board {
    debug_assert!(exponent > 0, "spawned tile must be non-empty");
    debug_assert_eq!(board.cell(idx), 0, "cell {idx} is occupied");
    board.with_cell(idx, exponent)
}

/// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
///
/// Draws the cell first, then the tile. A full board is returned unchanged
/// and consumes no randomness.
pub fn spawn_random(board: Board, rng: &mut SplitMix64) -> Board {
    let empties = empty_cells(board);
    if empties.is_empty() {
        return board;
    }
    let idx = empties[rng.next_bounded(empties.len())];
    let exponent = if rng.next_bounded(10) == 0 { 2 } else { 1 };
    spawn(board, idx, exponent)
}
