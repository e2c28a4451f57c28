//! Per-participant thinking budgets.
//!
//! Each participant owns a countdown that only runs while it is the
//! active mover. The idle participant's budget is frozen.

use gomoku_rules::Player;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Remaining thinking time of both participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    /// Red's remaining budget.
    pub red: Duration,
    /// Blue's remaining budget.
    pub blue: Duration,
}

impl RemainingTime {
    /// Remaining budget of `player`.
    pub fn of(&self, player: Player) -> Duration {
        match player {
            Player::Red => self.red,
            Player::Blue => self.blue,
        }
    }

    fn slot(&mut self, player: Player) -> &mut Duration {
        match player {
            Player::Red => &mut self.red,
            Player::Blue => &mut self.blue,
        }
    }
}

/// Two countdown timers, at most one of them running.
#[derive(Debug, Clone)]
pub struct ThinkingClock {
    budget: Duration,
    remaining: RemainingTime,
    running: Option<(Player, Instant)>,
}

impl ThinkingClock {
    /// Both participants start with `budget`.
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            remaining: RemainingTime {
                red: budget,
                blue: budget,
            },
            running: None,
        }
    }

    /// Restores both budgets and stops the running timer.
    pub fn reset(&mut self) {
        self.remaining = RemainingTime {
            red: self.budget,
            blue: self.budget,
        };
        self.running = None;
    }

    /// Stored budgets, not counting a running turn.
    pub fn remaining(&self) -> RemainingTime {
        self.remaining
    }

    /// Budgets as of `now`, counting the running turn.
    pub fn remaining_at(&self, now: Instant) -> RemainingTime {
        let mut remaining = self.remaining;
        if let Some((player, started)) = self.running {
            let slot = remaining.slot(player);
            *slot = slot.saturating_sub(now.saturating_duration_since(started));
        }
        remaining
    }

    /// True once `player` has no time left.
    pub fn is_exhausted(&self, player: Player) -> bool {
        self.remaining.of(player).is_zero()
    }

    /// Debits `elapsed` from `player` and returns what is left.
    #[instrument(skip(self))]
    pub fn charge(&mut self, player: Player, elapsed: Duration) -> Duration {
        let slot = self.remaining.slot(player);
        *slot = slot.saturating_sub(elapsed);
        debug!(remaining = ?*slot, "Charged thinking time");
        *slot
    }

    /// Starts `player`'s countdown, settling any turn still running.
    pub fn start_turn(&mut self, player: Player, now: Instant) {
        self.stop_turn(now);
        self.running = Some((player, now));
    }

    /// Stops the running countdown and charges its elapsed time.
    ///
    /// Returns the player that was running and its remaining budget.
    pub fn stop_turn(&mut self, now: Instant) -> Option<(Player, Duration)> {
        let (player, started) = self.running.take()?;
        let left = self.charge(player, now.saturating_duration_since(started));
        Some((player, left))
    }

    /// Whether a countdown is running.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The running participant, if its budget has run out by `now`.
    pub fn expired(&self, now: Instant) -> Option<Player> {
        let (player, _) = self.running?;
        self.remaining_at(now).of(player).is_zero().then_some(player)
    }
}
