//! First-class move types.
//!
//! Moves are domain events: a participant placing a stone, optionally
//! stamped with how long the participant thought about it.

use super::{Player, Position};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stone placed by a player.
///
/// Immutable once recorded in the engine history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    player: Player,
    position: Position,
    thinking_time: Option<Duration>,
}

impl Move {
    /// Creates a new move without timing information.
    pub fn new(player: Player, position: Position) -> Self {
        Self {
            player,
            position,
            thinking_time: None,
        }
    }

    /// Attaches the elapsed thinking time.
    pub fn with_thinking_time(mut self, elapsed: Duration) -> Self {
        self.thinking_time = Some(elapsed);
        self
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Time the player spent choosing this move, if measured.
    pub fn thinking_time(&self) -> Option<Duration> {
        self.thinking_time
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// Why a move was not applied.
///
/// Rejection is an expected outcome, not a fault: the engine state is
/// untouched whenever one of these is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveRejection {
    /// Coordinates are off the 15x15 board.
    #[display("Position ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The cell already holds a stone.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// It is the other participant's turn.
    #[display("It's not {}'s turn", _0)]
    WrongTurn(Player),

    /// The participant identifier is not 1 or 2.
    #[display("Invalid participant id {}", _0)]
    InvalidParticipant(i64),

    /// The match is already terminal.
    #[display("Match is already over")]
    MatchOver,
}

impl std::error::Error for MoveRejection {}
