//! In-process participant driven by a [`MoveStrategy`].

use super::{Participant, ParticipantError, TurnContext};
use crate::strategy::MoveStrategy;
use gomoku_rules::Position;
use std::time::Duration;
use tracing::debug;

/// Plays whatever its strategy picks.
pub struct StrategyPlayer {
    name: String,
    strategy: Box<dyn MoveStrategy>,
    delay: Duration,
}

impl StrategyPlayer {
    /// Creates a player answering immediately.
    pub fn new(name: impl Into<String>, strategy: Box<dyn MoveStrategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
            delay: Duration::ZERO,
        }
    }

    /// Sleeps `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl Participant for StrategyPlayer {
    async fn choose_move(&mut self, turn: &TurnContext) -> Result<Position, ParticipantError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let choice = self
            .strategy
            .choose(turn.board(), *turn.me())
            .ok_or_else(|| ParticipantError::new(format!("{} found no empty cell", self.name)))?;
        debug!(
            player = %self.name,
            strategy = self.strategy.label(),
            position = %choice,
            "Strategy chose"
        );
        Ok(choice)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
