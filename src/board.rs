use std::fmt;

/// Raw packed board: 16 nibbles, cell `i` lives in bits `4*i .. 4*i + 4`.
pub type BoardRaw = u64;
/// Four packed cells; cell `c` of a row lives in bits `4*c .. 4*c + 4`.
pub type Row = u16;
/// Stored tile exponent. `0` is an empty cell, `e > 0` is the tile `2^e`.
pub type Exponent = u8;

pub const CELL_COUNT: usize = 16;
pub const ROW_COUNT: usize = 4;
pub const MAX_EXPONENT: Exponent = 0xf;

/// Packed 4x4 2048 board as 16 4-bit nibbles in a `u64`.
///
/// Cell indices run `0..16` row-major; index `r * 4 + c` is row `r`, column `c`.
/// Row `r` occupies the 16 bits starting at bit `16 * r`, and within a row
/// column 0 is the lowest nibble.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub const fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    /// Build a board from 16 exponents in row-major order.
    ///
    /// ```
    /// use core_2048::board::Board;
    /// let b = Board::from_cells([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
    /// assert_eq!(b.cell(0), 1);
    /// assert_eq!(b.cell(15), 2);
    /// ```
    pub fn from_cells(cells: [Exponent; CELL_COUNT]) -> Self {
        cells
            .iter()
            .enumerate()
            .fold(Board::EMPTY, |board, (idx, &e)| board.with_cell(idx, e))
    }

    /// Consume this `Board`, returning the raw packed `u64`.
    #[inline]
    pub const fn into_raw(self) -> BoardRaw { self.0 }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub const fn raw(&self) -> BoardRaw { self.0 }

    /// Exponent stored at `idx`.
    #[inline]
    pub fn cell(self, idx: usize) -> Exponent { get_cell(self.0, idx) }

    /// Copy of this board with cell `idx` overwritten by `exponent`.
    #[inline]
    pub fn with_cell(self, idx: usize, exponent: Exponent) -> Self { Board(set_cell(self.0, idx, exponent)) }

    /// The 16-bit row at `row_idx` (a column once the board is transposed).
    #[inline]
    pub fn row(self, row_idx: usize) -> Row { encode_row(self.0, row_idx) }

    #[inline]
    pub fn transpose(self) -> Self { Board(transpose(self.0)) }

    /// Largest exponent present (0 for an empty board).
    #[inline]
    pub fn max_exponent(self) -> Exponent { max_exponent(self.0) }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize { empty_count(self.0) }

    /// Actual tile value at `idx` (`0` if empty), e.g. 2, 4, 8, ...
    #[inline]
    pub fn tile_value(self, idx: usize) -> u32 {
        match self.cell(idx) {
            0 => 0,
            e => 1u32 << e,
        }
    }

    /// All 16 exponents in row-major order.
    pub fn cells(self) -> [Exponent; CELL_COUNT] {
        let mut out = [0; CELL_COUNT];
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(idx);
        }
        out
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..ROW_COUNT {
            if r > 0 {
                writeln!(f, "-------+-------+-------+-------")?;
            }
            let line: Vec<String> = (0..4).map(|c| format_val(self.tile_value(r * 4 + c))).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

impl From<BoardRaw> for Board { fn from(v: BoardRaw) -> Self { Board::from_raw(v) } }
impl From<Board> for BoardRaw { fn from(b: Board) -> Self { b.into_raw() } }

fn format_val(val: u32) -> String {
    match val {
        0 => format!("{:^7}", "."),
        v => format!("{:^7}", v),
    }
}

/// Read the `idx`-th nibble.
///
/// Panics if `idx >= 16`.
#[inline]
pub fn get_cell(board: BoardRaw, idx: usize) -> Exponent {
    assert!(idx < CELL_COUNT, "cell index {idx} out of range");
    ((board >> (idx * 4)) & 0xf) as Exponent
}

/// Overwrite the `idx`-th nibble with `exponent`.
///
/// Panics if `idx >= 16` or `exponent > 15`.
#[inline]
pub fn set_cell(board: BoardRaw, idx: usize, exponent: Exponent) -> BoardRaw {
    assert!(idx < CELL_COUNT, "cell index {idx} out of range");
    assert!(exponent <= MAX_EXPONENT, "exponent {exponent} does not fit in a nibble");
    let shift = idx * 4;
    (board & !(0xf_u64 << shift)) | ((exponent as BoardRaw) << shift)
}

/// Extract the 16-bit row at `row_idx`.
#[inline]
pub fn encode_row(board: BoardRaw, row_idx: usize) -> Row {
    assert!(row_idx < ROW_COUNT, "row index {row_idx} out of range");
    ((board >> (row_idx * 16)) & 0xffff) as Row
}

/// Place `row` at `row_idx` in an otherwise empty board.
#[inline]
pub fn decode_row(row: Row, row_idx: usize) -> BoardRaw {
    assert!(row_idx < ROW_COUNT, "row index {row_idx} out of range");
    (row as BoardRaw) << (row_idx * 16)
}

/// Reorder the four nibbles of `row` back-to-front.
#[inline]
pub fn reverse_row(row: Row) -> Row {
    ((row & 0x000f) << 12) | ((row & 0x00f0) << 4) | ((row & 0x0f00) >> 4) | ((row & 0xf000) >> 12)
}

// Credit to Nneonneo
#[inline]
pub fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

pub fn max_exponent(board: BoardRaw) -> Exponent {
    let mut max_e = 0;
    let mut tmp = board;
    for _ in 0..CELL_COUNT {
        max_e = max_e.max((tmp & 0xf) as Exponent);
        tmp >>= 4;
    }
    max_e
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
/// Count the number of zero nibbles.
#[inline]
pub fn empty_count(board: BoardRaw) -> usize {
    CELL_COUNT - count_non_empty(board)
}

fn count_non_empty(board: BoardRaw) -> usize {
    let mut board_copy = board;
    board_copy |= board_copy >> 1;
    board_copy |= board_copy >> 2;
    board_copy &= 0x1111111111111111;
    board_copy.count_ones() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SplitMix64;

    fn random_board(rng: &mut SplitMix64) -> BoardRaw {
        (0..CELL_COUNT).fold(0, |b, idx| set_cell(b, idx, (rng.next_u64() & 0xf) as Exponent))
    }

    fn transpose_slow(board: BoardRaw) -> BoardRaw {
        let mut out = 0;
        for r in 0..4 {
            for c in 0..4 {
                out = set_cell(out, r * 4 + c, get_cell(board, c * 4 + r));
            }
        }
        out
    }

    #[test]
    fn it_get_set_cell() {
        let mut board = 0;
        for idx in 0..CELL_COUNT {
            board = set_cell(board, idx, idx as Exponent);
        }
        assert_eq!(board, 0xfedcba9876543210);
        for idx in 0..CELL_COUNT {
            assert_eq!(get_cell(board, idx), idx as Exponent);
        }
        assert_eq!(get_cell(set_cell(board, 5, 0), 5), 0);
    }

    #[test]
    #[should_panic]
    fn it_rejects_out_of_range_cell() {
        let _ = get_cell(0, 16);
    }

    #[test]
    #[should_panic]
    fn it_rejects_oversized_exponent() {
        let _ = set_cell(0, 0, 16);
    }

    #[test]
    fn it_encode_decode_rows() {
        let mut rng = SplitMix64::new(123);
        for _ in 0..1_000 {
            let board = random_board(&mut rng);
            let rebuilt = (0..ROW_COUNT).fold(0, |acc, r| acc | decode_row(encode_row(board, r), r));
            assert_eq!(rebuilt, board);
        }
        assert_eq!(encode_row(0x4444_3333_2222_1111, 2), 0x3333);
    }

    #[test]
    fn it_reverse_row_is_involution() {
        for row in 0..=Row::MAX {
            assert_eq!(reverse_row(reverse_row(row)), row);
        }
        assert_eq!(reverse_row(0x1234), 0x4321);
    }

    #[test]
    fn it_transpose_matches_naive() {
        let mut rng = SplitMix64::new(456);
        for _ in 0..5_000 {
            let board = random_board(&mut rng);
            let fast = transpose(board);
            assert_eq!(fast, transpose_slow(board), "{}", Board::from_raw(board));
            assert_eq!(transpose(fast), board);
        }
    }

    #[test]
    fn it_count_empty() {
        assert_eq!(empty_count(0), 16);
        assert_eq!(empty_count(0x1111000011110000), 8);
        assert_eq!(empty_count(0x1100000000000000), 14);
        assert_eq!(empty_count(0x0123456789abcdef), 1);
    }

    #[test]
    fn it_max_exponent() {
        assert_eq!(max_exponent(0), 0);
        assert_eq!(max_exponent(0x0000_0000_0b00_0301), 11);
        assert_eq!(max_exponent(0xf000_0000_0000_0000), 15);
    }

    #[test]
    fn it_tile_value() {
        let b = Board::from_raw(0xfedcba9876543210);
        assert_eq!(b.tile_value(0), 0);
        assert_eq!(b.tile_value(3), 8);
        assert_eq!(b.tile_value(10), 1024);
        assert_eq!(b.tile_value(15), 32768);
    }

    #[test]
    fn it_displays_grid() {
        let b = Board::EMPTY.with_cell(0, 1).with_cell(5, 11);
        let s = b.to_string();
        assert_eq!(s.lines().count(), 7);
        assert!(s.lines().next().unwrap().contains('2'));
        assert!(s.contains("2048"));
    }
}
