//! Built-in move strategies.

use gomoku_rules::{Board, Player, Position, random_empty_cell};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

/// Picks a cell for `me` on `board`.
pub trait MoveStrategy: Send {
    /// Chosen cell, or `None` when there is nothing to choose.
    fn choose(&mut self, board: &Board, me: Player) -> Option<Position>;

    /// Short strategy label.
    fn label(&self) -> &'static str;
}

/// Uniformly random empty cell.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStrategy for RandomStrategy {
    fn choose(&mut self, board: &Board, me: Player) -> Option<Position> {
        let choice = random_empty_cell(board, &mut self.rng);
        debug!(%me, ?choice, "Random strategy chose");
        choice
    }

    fn label(&self) -> &'static str {
        "random"
    }
}

/// First empty cell in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEmptyStrategy;

impl MoveStrategy for FirstEmptyStrategy {
    fn choose(&mut self, board: &Board, _me: Player) -> Option<Position> {
        board.empty_cells().next()
    }

    fn label(&self) -> &'static str {
        "first-empty"
    }
}
