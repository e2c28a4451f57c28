//! Pure five-in-a-row game logic.
//!
//! This crate holds the authoritative rules for a 15x15 five-in-a-row match
//! and nothing else: no I/O, no clocks, no rendering.
//!
//! # Architecture
//!
//! - **Board**: cell storage plus text rendering
//! - **Rules**: pure win and tie detection over a board snapshot
//! - **Engine**: validates and applies moves, advances the turn, owns the outcome
//! - **Invariants**: testable properties the engine maintains after every move
//!
//! # Example
//!
//! ```
//! use gomoku_rules::{GameEngine, Player, Position};
//!
//! let mut engine = GameEngine::with_seed(7);
//! engine.reset(Some(Player::Red));
//! let center = Position::new(7, 7).unwrap();
//! assert!(engine.apply_move(center, Player::Red));
//! assert!(!engine.apply_move(center, Player::Blue));
//! assert_eq!(engine.who_is_next(), Some(Player::Blue));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
pub mod invariants;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveRejection};
pub use engine::{GameEngine, random_empty_cell};
pub use position::{BOARD_SIZE, Position};
pub use rules::{Direction, WIN_LENGTH, WinResult};
pub use types::{Board, Cell, Player};
