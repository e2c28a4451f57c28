//! History consistency invariant: history length matches occupied cells.

use super::Invariant;
use crate::GameEngine;

/// Invariant: history length equals the number of occupied cells.
///
/// Every move in history corresponds to exactly one stone on the board.
pub struct HistoryConsistentInvariant;

impl Invariant<GameEngine> for HistoryConsistentInvariant {
    fn holds(engine: &GameEngine) -> bool {
        engine.history().len() == engine.board().occupied_count()
    }

    fn description() -> &'static str {
        "History length matches number of occupied cells"
    }
}
