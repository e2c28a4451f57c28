//! Core domain types for five-in-a-row.

use super::action::Move;
use super::position::{BOARD_SIZE, Position};
use serde::{Deserialize, Serialize};

/// Participant in a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// Red stones, participant id 1.
    Red,
    /// Blue stones, participant id 2.
    Blue,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Numeric participant identifier (1 for red, 2 for blue).
    pub fn id(self) -> u8 {
        match self {
            Player::Red => 1,
            Player::Blue => 2,
        }
    }

    /// Parses a participant identifier. Anything but 1 or 2 is `None`.
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Player::Red),
            2 => Some(Player::Blue),
            _ => None,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Stone of the given player.
    Occupied(Player),
}

impl Cell {
    /// Grid code: 0 empty, otherwise the player id.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(player) => player.id(),
        }
    }

    /// Inverse of [`Cell::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            other => Player::from_id(other.into()).map(Cell::Occupied),
        }
    }
}

/// 15x15 five-in-a-row board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells indexed `[row][col]`.
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Rebuilds a board by placing every move of `history` in order.
    ///
    /// No validation happens here; use [`GameEngine::replay`](crate::GameEngine::replay)
    /// for a rule-checked replay.
    pub fn from_history(history: &[Move]) -> Self {
        let mut board = Self::new();
        for mv in history {
            board.set(mv.position(), Cell::Occupied(mv.player()));
        }
        board
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row()][pos.col()]
    }

    /// Sets the cell at the given position.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row()][pos.col()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns true when the cell holds a stone of `player`.
    pub fn is_owned_by(&self, pos: Position, player: Player) -> bool {
        self.get(pos) == Cell::Occupied(player)
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|&pos| self.is_empty(pos))
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    /// Grid of cell codes, `[row][col]`.
    pub fn to_codes(&self) -> [[u8; BOARD_SIZE]; BOARD_SIZE] {
        self.cells.map(|row| row.map(Cell::code))
    }

    /// Builds a board from cell codes. Returns `None` on an unknown code.
    pub fn from_codes(codes: &[[u8; BOARD_SIZE]; BOARD_SIZE]) -> Option<Self> {
        let mut board = Self::new();
        for (r, row) in codes.iter().enumerate() {
            for (c, code) in row.iter().enumerate() {
                let pos = Position::new(r, c)?;
                board.set(pos, Cell::from_code(*code)?);
            }
        }
        Some(board)
    }

    /// Formats the board as a human-readable string.
    ///
    /// `.` is empty, `R` red, `B` blue; one line per row, top row first.
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(BOARD_SIZE * (BOARD_SIZE * 2 + 1));
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                result.push(match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Red) => 'R',
                    Cell::Occupied(Player::Blue) => 'B',
                });
                if c + 1 < BOARD_SIZE {
                    result.push(' ');
                }
            }
            if r + 1 < BOARD_SIZE {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids() {
        assert_eq!(Player::Red.id(), 1);
        assert_eq!(Player::Blue.id(), 2);
        assert_eq!(Player::from_id(2), Some(Player::Blue));
        assert_eq!(Player::from_id(0), None);
        assert_eq!(Player::from_id(3), None);
        assert_eq!(Player::Red.opponent(), Player::Blue);
    }

    #[test]
    fn test_set_and_count() {
        let mut board = Board::new();
        let pos = Position::new(3, 9).unwrap();
        board.set(pos, Cell::Occupied(Player::Blue));
        assert!(!board.is_empty(pos));
        assert!(board.is_owned_by(pos, Player::Blue));
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.empty_cells().count(), BOARD_SIZE * BOARD_SIZE - 1);
    }

    #[test]
    fn test_codes_round_trip() {
        let mut board = Board::new();
        board.set(Position::new(0, 0).unwrap(), Cell::Occupied(Player::Red));
        board.set(Position::new(14, 2).unwrap(), Cell::Occupied(Player::Blue));
        let codes = board.to_codes();
        assert_eq!(codes[0][0], 1);
        assert_eq!(codes[14][2], 2);
        assert_eq!(Board::from_codes(&codes), Some(board));
    }

    #[test]
    fn test_from_codes_rejects_unknown_code() {
        let mut codes = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        codes[5][5] = 7;
        assert_eq!(Board::from_codes(&codes), None);
    }

    #[test]
    fn test_display_marks() {
        let mut board = Board::new();
        board.set(Position::new(0, 1).unwrap(), Cell::Occupied(Player::Red));
        let text = board.display();
        assert!(text.starts_with(". R ."));
        assert_eq!(text.lines().count(), BOARD_SIZE);
    }
}
