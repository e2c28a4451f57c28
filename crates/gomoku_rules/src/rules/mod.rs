//! Game rules for five-in-a-row.
//!
//! Pure functions over a [`Board`](crate::Board) snapshot. They hold no
//! state and never mutate, so they are safe to call repeatedly on shared
//! read-only boards.

pub mod draw;
pub mod win;

pub use draw::{is_full, is_tie};
pub use win::{Direction, WIN_LENGTH, WinResult, detect, line_through};
