//! Gomoku Arena library - five-in-a-row over the network
//!
//! This library serves authoritative five-in-a-row matches to remote
//! participants and runs timed tournaments between in-process participants.
//! The rules themselves live in the `gomoku_rules` crate.
//!
//! # Architecture
//!
//! - **Protocol**: JSON move requests and full-state replies
//! - **Server**: HTTP endpoints over one shared, lock-protected match
//! - **Client**: remote participant loop with a pluggable strategy
//! - **Tournament**: sequential matches with per-participant thinking budgets
//! - **Events**: progress notifications for an optional observer
//!
//! # Example
//!
//! ```no_run
//! use gomoku_arena::{
//!     FirstEmptyStrategy, RandomStrategy, StrategyPlayer, Tournament, TournamentSettings,
//! };
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), gomoku_arena::TournamentError> {
//! let settings = TournamentSettings::new(10, Duration::from_secs(10)).with_seed(42);
//! let mut tournament = Tournament::new(
//!     settings,
//!     Box::new(StrategyPlayer::new("random", Box::new(RandomStrategy::with_seed(1)))),
//!     Box::new(StrategyPlayer::new("first", Box::new(FirstEmptyStrategy))),
//! );
//! let report = tournament.run().await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod clock;
mod config;
mod events;
mod participants;
mod protocol;
mod server;
mod session;
mod stats;
mod strategy;
mod tournament;

// Public module declarations
pub mod app;
pub mod cli;
pub mod client;

// Crate-level exports - Configuration
pub use config::{ArenaConfig, ClientConfig, ConfigError, ServerConfig, TournamentConfig};

// Crate-level exports - Wire protocol
pub use protocol::{
    EndOfGame, Grid, HEALTH_PATH, MOVE_PATH, MatchView, MoveRequest, ProtocolError, RESET_PATH,
    ResetRequest, STATE_PATH, StateSnapshot,
};

// Crate-level exports - Server
pub use server::MatchServer;
pub use session::{MatchSession, SharedMatch};

// Crate-level exports - Client
pub use client::{MatchClient, RemoteParticipant, SessionEnd, TransportError, TransportErrorKind};

// Crate-level exports - Participants and strategies
pub use participants::{Participant, ParticipantError, StrategyPlayer, TurnContext};
pub use strategy::{FirstEmptyStrategy, MoveStrategy, RandomStrategy};

// Crate-level exports - Tournament
pub use clock::{RemainingTime, ThinkingClock};
pub use events::{ArenaEvent, EventSink};
pub use stats::{MatchStats, ParticipantTotals, Score, TournamentSummary};
pub use tournament::{Tournament, TournamentError, TournamentReport, TournamentSettings};

// Crate-level exports - Game rules
pub use gomoku_rules::{
    BOARD_SIZE, Board, Cell, Direction, GameEngine, Move, MoveRejection, Player, Position,
    WIN_LENGTH, WinResult,
};
