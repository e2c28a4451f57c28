//! Board coordinates.

use serde::{Deserialize, Serialize};

/// Side length of the square board.
pub const BOARD_SIZE: usize = 15;

/// A cell coordinate on the 15x15 board.
///
/// A `Position` is always in bounds; out-of-range coordinates are
/// rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, or `None` if either coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Creates a position from untrusted signed coordinates (e.g. off the wire).
    pub fn from_signed(row: i64, col: i64) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        Self::new(row, col)
    }

    /// Row index (0 is the top row).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column index (0 is the left column).
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major index (0..225).
    pub fn to_index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// Inverse of [`Position::to_index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
        } else {
            None
        }
    }

    /// Steps by a signed offset, staying on the board.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row().checked_add_signed(d_row)?;
        let col = self.col().checked_add_signed(d_col)?;
        Self::new(row, col)
    }

    /// All positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Self::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
