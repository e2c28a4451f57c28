//! JSON wire format shared by the match server and remote participants.
//!
//! A move request names a position and the sender's participant id. Every
//! reply, to a move or a state query alike, is a full [`StateSnapshot`].
//! Board cells travel as `0` (empty), `1` (red) and `2` (blue); `who_is_next`
//! uses the same ids with `0` meaning nobody is to move.

use derive_more::{Display, Error};
use gomoku_rules::{BOARD_SIZE, Board, Direction, GameEngine, Player, Position, WinResult};
use serde::{Deserialize, Serialize};

/// Route accepting [`MoveRequest`]s.
pub const MOVE_PATH: &str = "/move";
/// Route returning the current [`StateSnapshot`].
pub const STATE_PATH: &str = "/state";
/// Route accepting [`ResetRequest`]s.
pub const RESET_PATH: &str = "/reset";
/// Liveness route.
pub const HEALTH_PATH: &str = "/health";

/// Raw board encoding on the wire.
pub type Grid = [[u8; BOARD_SIZE]; BOARD_SIZE];

/// A participant asking to place a stone.
///
/// Coordinates and id are signed and unchecked; the engine rejects
/// anything off the board or outside `{1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// `[row, col]`.
    pub position: [i64; 2],
    /// `1` for red, `2` for blue.
    pub player_id: i64,
}

impl MoveRequest {
    /// Request placing `player`'s stone on `position`.
    pub fn new(position: Position, player: Player) -> Self {
        Self {
            position: [position.row() as i64, position.col() as i64],
            player_id: i64::from(player.id()),
        }
    }
}

/// Starts a new match on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Id of the starting participant; random when `null`.
    #[serde(default)]
    pub starting_player: Option<i64>,
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndOfGame {
    /// Five in a row.
    Win {
        /// Winner id.
        player_id: u8,
        /// First cell of the line, `[row, col]`.
        anchor: [u8; 2],
        /// Orientation of the line.
        direction: Direction,
    },
    /// Full board, no line.
    Tie,
    /// The other participant ran out of time.
    TimeoutWin {
        /// Winner id.
        player_id: u8,
    },
}

impl EndOfGame {
    /// Wire form of a terminal outcome; `None` while ongoing.
    pub fn from_outcome(outcome: WinResult) -> Option<Self> {
        match outcome {
            WinResult::Ongoing => None,
            WinResult::Win {
                player,
                anchor,
                direction,
            } => Some(EndOfGame::Win {
                player_id: player.id(),
                anchor: [anchor.row() as u8, anchor.col() as u8],
                direction,
            }),
            WinResult::Tie => Some(EndOfGame::Tie),
            WinResult::TimeoutWin { winner } => Some(EndOfGame::TimeoutWin {
                player_id: winner.id(),
            }),
        }
    }

    /// Engine form, validating ids and coordinates.
    pub fn to_outcome(self) -> Result<WinResult, ProtocolError> {
        match self {
            EndOfGame::Win {
                player_id,
                anchor,
                direction,
            } => Ok(WinResult::Win {
                player: decode_player(player_id)?,
                anchor: Position::new(usize::from(anchor[0]), usize::from(anchor[1])).ok_or_else(
                    || ProtocolError::new(format!("anchor {:?} is off the board", anchor)),
                )?,
                direction,
            }),
            EndOfGame::Tie => Ok(WinResult::Tie),
            EndOfGame::TimeoutWin { player_id } => Ok(WinResult::TimeoutWin {
                winner: decode_player(player_id)?,
            }),
        }
    }
}

/// Full match state as sent on the wire.
///
/// Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Cell codes, row-major.
    pub board: Grid,
    /// Id of the participant to move, `0` when the match is over.
    pub who_is_next: u8,
    /// `null` while the match is live.
    pub end_of_game: Option<EndOfGame>,
    /// Whether the request this answers placed a stone.
    pub move_accepted: bool,
}

impl StateSnapshot {
    /// Captures the engine state.
    pub fn capture(engine: &GameEngine, move_accepted: bool) -> Self {
        Self {
            board: engine.board().to_codes(),
            who_is_next: engine.who_is_next().map_or(0, Player::id),
            end_of_game: EndOfGame::from_outcome(engine.check_outcome()),
            move_accepted,
        }
    }

    /// Validates and converts into engine types.
    pub fn decode(&self) -> Result<MatchView, ProtocolError> {
        let board = Board::from_codes(&self.board)
            .ok_or_else(|| {
                ProtocolError::new("board holds a cell code other than 0, 1 or 2".to_string())
            })?;

        let who_is_next = match self.who_is_next {
            0 => None,
            id => Some(decode_player(id)?),
        };

        let outcome = match self.end_of_game {
            Some(end) => end.to_outcome()?,
            None => WinResult::Ongoing,
        };

        if outcome.is_terminal() == who_is_next.is_some() {
            return Err(ProtocolError::new(format!(
                "who_is_next {} contradicts end_of_game {:?}",
                self.who_is_next, self.end_of_game
            )));
        }

        Ok(MatchView {
            board,
            who_is_next,
            outcome,
            move_accepted: self.move_accepted,
        })
    }
}

/// A decoded [`StateSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    /// Board contents.
    pub board: Board,
    /// Participant to move.
    pub who_is_next: Option<Player>,
    /// `Ongoing` while live.
    pub outcome: WinResult,
    /// Whether the answered request placed a stone.
    pub move_accepted: bool,
}

/// A reply that does not describe a coherent match state.
#[derive(Debug, Clone, Display, Error)]
#[display("Protocol error: {} at {}:{}", message, file, line)]
pub struct ProtocolError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new protocol error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[track_caller]
fn decode_player(id: u8) -> Result<Player, ProtocolError> {
    Player::from_id(i64::from(id))
        .ok_or_else(|| ProtocolError::new(format!("unknown participant id {}", id)))
}
