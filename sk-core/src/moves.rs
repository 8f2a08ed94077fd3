//! Jump moves, legal move generation and move application.
//!
//! A jump takes a peg two cells in a straight line over an adjacent peg into a
//! hole, removing the jumped peg. Only the four axis directions are allowed.

use std::fmt;
use std::sync::OnceLock;

use thiserror::Error;

use crate::board::{is_on_board, Board, Cell, Pos, SIZE};

/// Axis directions, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Increasing row.
    South,
    /// Increasing column.
    East,
    /// Decreasing row.
    North,
    /// Decreasing column.
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// (d_row, d_col) unit step.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::North => (-1, 0),
            Direction::West => (0, -1),
        }
    }

    fn step(self, p: Pos, n: isize) -> Option<Pos> {
        let (dr, dc) = self.delta();
        let r = p.row.checked_add_signed(dr * n)?;
        let c = p.col.checked_add_signed(dc * n)?;
        is_on_board(r, c).then_some(Pos::new(r, c))
    }
}

/// One jump: `from` jumps over `over` and lands on `to`.
///
/// Moves built with [`Move::jump`] are always collinear and evenly spaced.
/// The fields are public, so [`Board::apply`] re-checks the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Pos,
    pub over: Pos,
    pub to: Pos,
}

impl Move {
    /// The jump starting at `from` in direction `dir`, if all three cells are on
    /// the board.
    pub fn jump(from: Pos, dir: Direction) -> Option<Move> {
        is_on_board(from.row, from.col).then_some(())?;
        Some(Move {
            from,
            over: dir.step(from, 1)?,
            to: dir.step(from, 2)?,
        })
    }

    /// Direction of travel, or `None` if the move is not a straight two-cell jump.
    pub fn direction(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| Move::jump(self.from, d).as_ref() == Some(self))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} -> {}", self.from, self.over, self.to)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("{mv} is not a straight two-cell jump on the board")]
    NotAJump { mv: Move },
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: &'static str },
}

/// Every geometrically possible jump on the cross, grouped by direction.
fn candidate_jumps() -> &'static [Move] {
    static JUMPS: OnceLock<Vec<Move>> = OnceLock::new();
    JUMPS.get_or_init(|| {
        let mut out = Vec::new();
        for dir in Direction::ALL {
            for row in 0..SIZE {
                for col in 0..SIZE {
                    if !is_on_board(row, col) {
                        continue;
                    }
                    if let Some(m) = Move::jump(Pos::new(row, col), dir) {
                        out.push(m);
                    }
                }
            }
        }
        out
    })
}

/// Number of geometrically possible jumps on the English board.
pub fn candidate_jump_count() -> usize {
    candidate_jumps().len()
}

#[inline]
fn is_legal_on(board: &Board, m: &Move) -> bool {
    board.get(m.from) == Cell::Peg && board.get(m.over) == Cell::Peg && board.get(m.to) == Cell::Empty
}

/// All legal jumps on `board`. Empty when no capture exists.
///
/// All four directions are scanned on every call.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut out = Vec::new();
    legal_moves_into(board, &mut out);
    out
}

/// Like [`legal_moves`], writing into a caller-owned buffer (cleared first).
pub fn legal_moves_into(board: &Board, out: &mut Vec<Move>) {
    out.clear();
    out.extend(candidate_jumps().iter().filter(|m| is_legal_on(board, m)));
}

/// Apply `mv` to a copy of `board`.
pub fn apply_move(mut board: Board, mv: &Move) -> Result<Board, ApplyError> {
    board.apply(mv)?;
    Ok(board)
}

impl Board {
    /// Apply a jump in place: `from` and `over` become holes, `to` gets the peg.
    ///
    /// Fails if `mv` is not a straight jump or is not legal on this board.
    pub fn apply(&mut self, mv: &Move) -> Result<(), ApplyError> {
        if mv.direction().is_none() {
            return Err(ApplyError::NotAJump { mv: *mv });
        }
        if self.get(mv.from) != Cell::Peg {
            return Err(ApplyError::IllegalMove {
                mv: *mv,
                reason: "no peg on the source cell",
            });
        }
        if self.get(mv.over) != Cell::Peg {
            return Err(ApplyError::IllegalMove {
                mv: *mv,
                reason: "no peg to jump over",
            });
        }
        if self.get(mv.to) != Cell::Empty {
            return Err(ApplyError::IllegalMove {
                mv: *mv,
                reason: "landing cell is not empty",
            });
        }
        self.apply_unchecked(mv);
        Ok(())
    }

    /// Apply a move taken from [`legal_moves`] for this exact board.
    #[inline]
    pub(crate) fn apply_unchecked(&mut self, mv: &Move) {
        debug_assert!(is_legal_on(self, mv), "applying illegal move {mv}");
        self.set(mv.from, Cell::Empty);
        self.set(mv.over, Cell::Empty);
        self.set(mv.to, Cell::Peg);
    }
}
