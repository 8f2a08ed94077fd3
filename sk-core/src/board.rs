//! English (cross-shaped) peg-solitaire board.
//!
//! The grid is 7×7. The four 2×2 corner blocks are off-board and never change;
//! the remaining 33 cells hold either a peg or a hole.

use std::fmt;

use thiserror::Error;

/// Side length of the square grid that contains the cross.
pub const SIZE: usize = 7;

/// Number of on-board cells (7×7 minus four 2×2 corners).
pub const ON_BOARD_CELLS: usize = SIZE * SIZE - 16;

/// The centre cell, empty in the initial layout.
pub const CENTER: Pos = Pos { row: 3, col: 3 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    OutOfBounds,
    Empty,
    Peg,
}

/// Grid coordinate; row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// True if (row, col) lies on the cross, i.e. inside the grid and outside the
/// four 2×2 corner blocks.
#[inline]
pub const fn is_on_board(row: usize, col: usize) -> bool {
    if row >= SIZE || col >= SIZE {
        return false;
    }
    let row_edge = row < 2 || row >= SIZE - 2;
    let col_edge = col < 2 || col >= SIZE - 2;
    !(row_edge && col_edge)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("layout has {0} rows, expected 7")]
    RowCount(usize),
    #[error("row {row} is {len} cells wide, expected at most 7")]
    RowTooLong { row: usize, len: usize },
    #[error("unexpected character {ch:?} at ({row},{col})")]
    BadChar { row: usize, col: usize, ch: char },
    #[error("cell ({row},{col}) is a corner cell and must be off-board")]
    CornerNotOffBoard { row: usize, col: usize },
    #[error("cell ({row},{col}) is on the board and must be a peg or a hole")]
    MissingCell { row: usize, col: usize },
    #[error("position {0} is off the board")]
    OffBoard(Pos),
}

/// Board state. Plain `Copy` value: every trial owns its own instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    /// Initial layout: every on-board cell holds a peg except the centre.
    pub fn new() -> Self {
        let mut b = Self::filled(Cell::Peg);
        b.cells[CENTER.row][CENTER.col] = Cell::Empty;
        b
    }

    /// All on-board cells empty.
    pub fn empty() -> Self {
        Self::filled(Cell::Empty)
    }

    fn filled(on_board: Cell) -> Self {
        let mut cells = [[Cell::OutOfBounds; SIZE]; SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if is_on_board(r, c) {
                    *cell = on_board;
                }
            }
        }
        Self { cells }
    }

    /// Empty board with pegs at exactly `pegs`.
    pub fn with_pegs(pegs: &[Pos]) -> Result<Self, BoardError> {
        let mut b = Self::empty();
        for &p in pegs {
            if !is_on_board(p.row, p.col) {
                return Err(BoardError::OffBoard(p));
            }
            b.cells[p.row][p.col] = Cell::Peg;
        }
        Ok(b)
    }

    /// Parse a text layout: seven rows, `o` for a peg, `.` for a hole, space or
    /// `#` for off-board cells. Trailing off-board cells may be omitted.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    /// Like [`Board::parse`], one string per row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, BoardError> {
        if rows.len() != SIZE {
            return Err(BoardError::RowCount(rows.len()));
        }
        let mut b = Self::empty();
        for (r, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.as_ref().chars().collect();
            if chars.len() > SIZE {
                return Err(BoardError::RowTooLong {
                    row: r,
                    len: chars.len(),
                });
            }
            for c in 0..SIZE {
                let ch = chars.get(c).copied().unwrap_or(' ');
                let cell = match ch {
                    'o' | 'O' | 'x' | 'X' => Cell::Peg,
                    '.' => Cell::Empty,
                    ' ' | '#' => Cell::OutOfBounds,
                    other => {
                        return Err(BoardError::BadChar {
                            row: r,
                            col: c,
                            ch: other,
                        })
                    }
                };
                match (is_on_board(r, c), cell) {
                    (false, Cell::OutOfBounds) => {}
                    (false, _) => return Err(BoardError::CornerNotOffBoard { row: r, col: c }),
                    (true, Cell::OutOfBounds) => {
                        return Err(BoardError::MissingCell { row: r, col: c })
                    }
                    (true, cell) => b.cells[r][c] = cell,
                }
            }
        }
        Ok(b)
    }

    /// Cell at `p`; anything outside the 7x7 grid reads as `OutOfBounds`.
    #[inline]
    pub fn get(&self, p: Pos) -> Cell {
        self.cells
            .get(p.row)
            .and_then(|row| row.get(p.col))
            .copied()
            .unwrap_or(Cell::OutOfBounds)
    }

    #[inline]
    pub(crate) fn set(&mut self, p: Pos, cell: Cell) {
        debug_assert!(is_on_board(p.row, p.col), "set on off-board cell {p}");
        self.cells[p.row][p.col] = cell;
    }

    /// Row-major view of the grid.
    pub fn cells(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.cells
    }

    /// Number of pegs. Lower is better; 1 means solved.
    pub fn remaining_pegs(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::Peg)
            .count() as u32
    }

    /// Positions of all pegs in row-major order.
    pub fn pegs(&self) -> Vec<Pos> {
        let mut out = Vec::with_capacity(ON_BOARD_CELLS);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                if cell == Cell::Peg {
                    out.push(Pos::new(r, c));
                }
            }
        }
        out
    }

    /// Text layout rows, the inverse of [`Board::from_rows`].
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::OutOfBounds => ' ',
                        Cell::Empty => '.',
                        Cell::Peg => 'o',
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Fresh initial board.
pub fn new_board() -> Board {
    Board::new()
}
