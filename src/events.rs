//! Progress events for an attached observer.
//!
//! Producers never block on the observer. Events go through an unbounded
//! channel; sending to a dropped receiver is ignored.

use crate::clock::RemainingTime;
use crate::stats::{Score, TournamentSummary};
use gomoku_rules::{Board, Move, Player, WinResult};
use tokio::sync::mpsc;
use tracing::trace;

/// Something an observer may want to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaEvent {
    /// A stone was placed.
    MoveApplied {
        /// Match number within the run.
        match_index: usize,
        /// The accepted move.
        mv: Move,
        /// Board after the move.
        board: Board,
        /// Participant to move next.
        who_is_next: Option<Player>,
        /// Budgets after the move, when a clock is running.
        remaining: Option<RemainingTime>,
    },
    /// A match reached a terminal outcome.
    MatchEnded {
        /// Match number within the run.
        match_index: usize,
        /// Final board.
        board: Board,
        /// Terminal outcome.
        outcome: WinResult,
        /// Budgets at the end, when a clock is running.
        remaining: Option<RemainingTime>,
        /// Tally including this match.
        score: Score,
    },
    /// A tournament completed.
    TournamentFinished(TournamentSummary),
}

/// Sending half of the event channel, possibly disconnected.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<ArenaEvent>>,
}

impl EventSink {
    /// Sink forwarding to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<ArenaEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sink that discards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Connected sink plus the receiver an observer reads.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ArenaEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Sends `event`; failures are ignored.
    pub fn emit(&self, event: ArenaEvent) {
        if let Some(tx) = &self.tx
            && tx.send(event).is_err()
        {
            trace!("Event observer dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_survives_dropped_receiver() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(ArenaEvent::MatchEnded {
            match_index: 0,
            board: Board::new(),
            outcome: WinResult::Tie,
            remaining: None,
            score: Score::default(),
        });
        EventSink::disabled().emit(ArenaEvent::MatchEnded {
            match_index: 0,
            board: Board::new(),
            outcome: WinResult::Tie,
            remaining: None,
            score: Score::default(),
        });
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sink, mut rx) = EventSink::channel();
        for match_index in 0..3 {
            sink.emit(ArenaEvent::MatchEnded {
                match_index,
                board: Board::new(),
                outcome: WinResult::Tie,
                remaining: None,
                score: Score::default(),
            });
        }
        for expected in 0..3 {
            match rx.recv().await {
                Some(ArenaEvent::MatchEnded { match_index, .. }) => {
                    assert_eq!(match_index, expected)
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }
}
