//! Participant trait and implementations.

mod strategy_player;

pub use strategy_player::StrategyPlayer;

use derive_getters::Getters;
use derive_new::new;
use derive_more::{Display, Error};
use gomoku_rules::{Board, Player, Position};
use std::time::Duration;

/// What a participant sees when asked for a move.
#[derive(Debug, Clone, Getters, new)]
pub struct TurnContext {
    /// Current board.
    board: Board,
    /// Color the participant plays.
    me: Player,
    /// Thinking time left for this participant.
    remaining: Duration,
    /// Match number within the tournament.
    match_index: usize,
}

/// Trait for participants that can make moves.
#[async_trait::async_trait]
pub trait Participant: Send {
    /// Chooses the next cell to play.
    ///
    /// An illegal answer is not an error: the controller rejects it and asks
    /// again. Return an error only when the participant cannot continue.
    async fn choose_move(&mut self, turn: &TurnContext) -> Result<Position, ParticipantError>;

    /// Returns the participant's display name.
    fn name(&self) -> &str;
}

/// A participant that cannot produce a move.
#[derive(Debug, Clone, Display, Error)]
#[display("Participant error: {} at {}:{}", message, file, line)]
pub struct ParticipantError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ParticipantError {
    /// Creates a new participant error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
