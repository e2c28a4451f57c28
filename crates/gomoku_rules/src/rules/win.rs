//! Win detection logic for five-in-a-row.
//!
//! Two entry points share one definition of a winning line:
//!
//! - [`detect`] scans a whole board snapshot in a fixed order and is what
//!   observers call on a board they did not build themselves.
//! - [`line_through`] only looks at the four lines crossing one stone and is
//!   what the engine runs after each accepted move.
//!
//! Both report the same orientation and anchor for a board whose only
//! winning lines pass through the last stone played.

use super::super::{Board, Cell, Player, Position};
use super::draw::is_full;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Number of contiguous stones needed to win.
pub const WIN_LENGTH: usize = 5;

/// Orientation of a line, in scan order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Top to bottom within one column.
    #[display("column")]
    Column,
    /// Left to right within one row.
    #[display("row")]
    Row,
    /// Top-left to bottom-right.
    #[display("diagonal")]
    Diagonal,
    /// Top-right to bottom-left.
    #[display("anti-diagonal")]
    AntiDiagonal,
}

impl Direction {
    /// `(d_row, d_col)` step walking forward along the line.
    ///
    /// Forward always moves later in row-major order, so walking backward
    /// from any stone reaches the run's anchor.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Column => (1, 0),
            Direction::Row => (0, 1),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// Outcome of a match as seen by the rules.
///
/// Exactly one variant holds at a time. `Ongoing` is transient and never
/// recorded as a final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinResult {
    /// No terminal condition yet.
    Ongoing,
    /// Five (or more) in a row.
    Win {
        /// Owner of the line.
        player: Player,
        /// First cell of the run in row-major order.
        anchor: Position,
        /// Orientation of the run.
        direction: Direction,
    },
    /// Board filled with no line.
    Tie,
    /// The opponent ran out of thinking time.
    TimeoutWin {
        /// Player awarded the match.
        winner: Player,
    },
}

impl WinResult {
    /// True for every variant but `Ongoing`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WinResult::Ongoing)
    }

    /// Winner of a normal or timeout win.
    pub fn winner(&self) -> Option<Player> {
        match self {
            WinResult::Win { player, .. } => Some(*player),
            WinResult::TimeoutWin { winner } => Some(*winner),
            WinResult::Ongoing | WinResult::Tie => None,
        }
    }

    /// True only for `TimeoutWin`.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WinResult::TimeoutWin { .. })
    }
}

impl std::fmt::Display for WinResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinResult::Ongoing => write!(f, "ongoing"),
            WinResult::Win {
                player,
                anchor,
                direction,
            } => write!(f, "{} wins with a {} line at {}", player, direction, anchor),
            WinResult::Tie => write!(f, "tie"),
            WinResult::TimeoutWin { winner } => write!(f, "{} wins on time", winner),
        }
    }
}

/// Scans a board snapshot for a terminal outcome.
///
/// Order is fixed: red before blue, then column, row, diagonal and
/// anti-diagonal, then anchors in row-major order. The first hit is
/// reported and scanning stops, so a board holding two lines reports only
/// one of them. A full board without a line is a tie.
#[instrument(skip(board))]
pub fn detect(board: &Board) -> WinResult {
    for player in Player::iter() {
        if let Some((direction, anchor)) = find_line(board, player) {
            return WinResult::Win {
                player,
                anchor,
                direction,
            };
        }
    }

    if is_full(board) {
        WinResult::Tie
    } else {
        WinResult::Ongoing
    }
}

/// First winning line of `player` under the fixed scan order.
pub fn find_line(board: &Board, player: Player) -> Option<(Direction, Position)> {
    Direction::iter().find_map(|direction| {
        Position::all()
            .find(|&anchor| run_from(board, anchor, player, direction) >= WIN_LENGTH)
            .map(|anchor| (direction, anchor))
    })
}

/// Winning line through the stone at `pos`, if any.
///
/// Counts same-colored stones outward in each orientation instead of
/// rescanning the board. Returns the orientation and the anchor (run start).
pub fn line_through(board: &Board, pos: Position) -> Option<(Direction, Position)> {
    let player = match board.get(pos) {
        Cell::Occupied(player) => player,
        Cell::Empty => return None,
    };

    for direction in Direction::iter() {
        let (d_row, d_col) = direction.step();

        let mut anchor = pos;
        while let Some(prev) = anchor.offset(-d_row, -d_col) {
            if !board.is_owned_by(prev, player) {
                break;
            }
            anchor = prev;
        }

        if run_from(board, anchor, player, direction) >= WIN_LENGTH {
            return Some((direction, anchor));
        }
    }

    None
}

/// Length of the run of `player` stones starting at `start` and walking forward.
fn run_from(board: &Board, start: Position, player: Player, direction: Direction) -> usize {
    let (d_row, d_col) = direction.step();
    let mut len = 0;
    let mut cursor = Some(start);
    while let Some(pos) = cursor {
        if !board.is_owned_by(pos, player) {
            break;
        }
        len += 1;
        cursor = pos.offset(d_row, d_col);
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, player: Player, cells: &[(usize, usize)]) {
        for &(r, c) in cells {
            board.set(Position::new(r, c).unwrap(), Cell::Occupied(player));
        }
    }

    fn pos(r: usize, c: usize) -> Position {
        Position::new(r, c).unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(detect(&board), WinResult::Ongoing);
    }

    #[test]
    fn test_red_row_anchor_is_left_end() {
        let mut board = Board::new();
        place(&mut board, Player::Red, &[(7, 0), (7, 1), (7, 2), (7, 3), (7, 4)]);
        assert_eq!(
            detect(&board),
            WinResult::Win {
                player: Player::Red,
                anchor: pos(7, 0),
                direction: Direction::Row,
            }
        );
    }

    #[test]
    fn test_column_anchor_is_top_end() {
        let mut board = Board::new();
        place(&mut board, Player::Blue, &[(10, 3), (11, 3), (12, 3), (13, 3), (14, 3)]);
        assert_eq!(
            detect(&board),
            WinResult::Win {
                player: Player::Blue,
                anchor: pos(10, 3),
                direction: Direction::Column,
            }
        );
    }

    #[test]
    fn test_anti_diagonal_anchor_is_top_right_end() {
        let mut board = Board::new();
        place(&mut board, Player::Red, &[(2, 10), (3, 9), (4, 8), (5, 7), (6, 6)]);
        assert_eq!(
            line_through(&board, pos(4, 8)),
            Some((Direction::AntiDiagonal, pos(2, 10)))
        );
        assert_eq!(
            detect(&board),
            WinResult::Win {
                player: Player::Red,
                anchor: pos(2, 10),
                direction: Direction::AntiDiagonal,
            }
        );
    }

    #[test]
    fn test_four_is_not_enough() {
        let mut board = Board::new();
        place(&mut board, Player::Red, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(detect(&board), WinResult::Ongoing);
        assert_eq!(line_through(&board, pos(3, 3)), None);
    }

    #[test]
    fn test_overline_counts() {
        let mut board = Board::new();
        place(&mut board, Player::Blue, &[(4, 5), (4, 6), (4, 7), (4, 8), (4, 9), (4, 10)]);
        assert_eq!(
            line_through(&board, pos(4, 7)),
            Some((Direction::Row, pos(4, 5)))
        );
    }

    #[test]
    fn test_line_broken_by_opponent() {
        let mut board = Board::new();
        place(&mut board, Player::Red, &[(9, 0), (9, 1), (9, 3), (9, 4), (9, 5)]);
        place(&mut board, Player::Blue, &[(9, 2)]);
        assert_eq!(detect(&board), WinResult::Ongoing);
    }

    #[test]
    fn test_double_line_reports_first_in_scan_order() {
        // The stone at (5, 5) completes a row and a column at once; the
        // fixed order names the column only.
        let mut board = Board::new();
        place(&mut board, Player::Red, &[(5, 1), (5, 2), (5, 3), (5, 4)]);
        place(&mut board, Player::Red, &[(1, 5), (2, 5), (3, 5), (4, 5)]);
        place(&mut board, Player::Red, &[(5, 5)]);

        let expected = WinResult::Win {
            player: Player::Red,
            anchor: pos(1, 5),
            direction: Direction::Column,
        };
        assert_eq!(detect(&board), expected);
        assert_eq!(line_through(&board, pos(5, 5)), Some((Direction::Column, pos(1, 5))));
    }

    #[test]
    fn test_red_scanned_before_blue() {
        let mut board = Board::new();
        place(&mut board, Player::Blue, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        place(&mut board, Player::Red, &[(14, 0), (14, 1), (14, 2), (14, 3), (14, 4)]);
        assert_eq!(detect(&board).winner(), Some(Player::Red));
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(serde_json::to_string(&Direction::AntiDiagonal).unwrap(), "\"anti_diagonal\"");
        assert_eq!(Direction::AntiDiagonal.to_string(), "anti-diagonal");
    }

    #[test]
    fn test_win_result_helpers() {
        let timeout = WinResult::TimeoutWin { winner: Player::Blue };
        assert!(timeout.is_terminal());
        assert!(timeout.is_timeout());
        assert_eq!(timeout.winner(), Some(Player::Blue));
        assert_eq!(WinResult::Tie.winner(), None);
        assert!(!WinResult::Ongoing.is_terminal());
    }
}
