//! Tie detection logic for five-in-a-row.

use super::super::{Board, Player};
use super::win::find_line;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Checks if the board is full (no empty cell left).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.empty_cells().next().is_none()
}

/// A full board on which neither player has five in a row.
#[instrument(skip(board))]
pub fn is_tie(board: &Board) -> bool {
    is_full(board) && Player::iter().all(|player| find_line(board, player).is_none())
}
