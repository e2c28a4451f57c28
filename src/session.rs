//! Server-side match state shared between request handlers.
//!
//! A [`SharedMatch`] serializes every request through one lock. Applying a
//! move and capturing the reply snapshot happen under the same guard, so a
//! reply never mixes the effect of one request with another's.
//!
//! The thinking clock stays idle until the first request of a match arrives,
//! so time spent before any participant connects is not charged.

use crate::clock::{RemainingTime, ThinkingClock};
use crate::events::{ArenaEvent, EventSink};
use crate::protocol::{MoveRequest, StateSnapshot};
use crate::stats::Score;
use gomoku_rules::{GameEngine, Player};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// One authoritative match plus its optional thinking clock.
#[derive(Debug)]
pub struct MatchSession {
    engine: GameEngine,
    clock: Option<ThinkingClock>,
    score: Score,
    match_index: usize,
    events: EventSink,
}

impl MatchSession {
    /// Wraps `engine`; a budget enables server-side timeouts.
    pub fn new(engine: GameEngine, time_budget: Option<Duration>, events: EventSink) -> Self {
        Self::starting_at(engine, time_budget, events, Instant::now())
    }

    /// Like [`MatchSession::new`], logging creation at `now`.
    ///
    /// The clock starts with the first request, not here.
    #[instrument(skip(engine, events, now))]
    pub fn starting_at(
        engine: GameEngine,
        time_budget: Option<Duration>,
        events: EventSink,
        now: Instant,
    ) -> Self {
        let mut session = Self {
            engine,
            clock: time_budget.map(ThinkingClock::new),
            score: Score::default(),
            match_index: 0,
            events,
        };
        session.restart_clock();
        info!(
            starting_player = %session.engine.starting_player(),
            created_at = ?now,
            "Match session created"
        );
        session
    }

    /// The engine.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Results of every match finished on this session.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Number of resets so far.
    pub fn match_index(&self) -> usize {
        self.match_index
    }

    /// Budgets as of `now`, if a clock is configured.
    pub fn remaining(&self, now: Instant) -> Option<RemainingTime> {
        self.clock.as_ref().map(|clock| clock.remaining_at(now))
    }

    /// Validates and applies a move request, returning the reply.
    #[instrument(
        skip(self, request),
        fields(player_id = request.player_id, position = ?request.position)
    )]
    pub fn submit(&mut self, request: MoveRequest, now: Instant) -> StateSnapshot {
        self.arm_clock(now);
        self.enforce_clock(now);

        let [row, col] = request.position;
        let accepted = match self.engine.try_apply_raw(row, col, request.player_id) {
            Ok(()) => {
                self.after_move(now);
                true
            }
            Err(rejection) => {
                debug!(%rejection, "Move rejected");
                false
            }
        };

        StateSnapshot::capture(&self.engine, accepted)
    }

    /// Current state; also applies an expired clock.
    pub fn snapshot(&mut self, now: Instant) -> StateSnapshot {
        self.arm_clock(now);
        self.enforce_clock(now);
        StateSnapshot::capture(&self.engine, false)
    }

    /// Starts a new match with fresh budgets.
    #[instrument(skip(self))]
    pub fn reset(&mut self, starting_player: Option<Player>, now: Instant) -> StateSnapshot {
        self.engine.reset(starting_player);
        self.match_index += 1;
        self.restart_clock();
        self.arm_clock(now);
        info!(
            match_index = self.match_index,
            starting_player = %self.engine.starting_player(),
            "Match reset"
        );
        StateSnapshot::capture(&self.engine, false)
    }

    fn restart_clock(&mut self) {
        if let Some(clock) = &mut self.clock {
            clock.reset();
        }
    }

    /// Starts the mover's countdown if the match is live and the clock idle.
    fn arm_clock(&mut self, now: Instant) {
        let Some(clock) = &mut self.clock else {
            return;
        };
        if clock.is_running() {
            return;
        }
        if let Some(next) = self.engine.who_is_next() {
            debug!(%next, "Thinking clock started");
            clock.start_turn(next, now);
        }
    }

    fn after_move(&mut self, now: Instant) {
        let Some(mv) = self.engine.history().last().copied() else {
            return;
        };

        if let Some(clock) = &mut self.clock {
            clock.stop_turn(now);
            if let Some(next) = self.engine.who_is_next() {
                clock.start_turn(next, now);
            }
        }

        self.events.emit(ArenaEvent::MoveApplied {
            match_index: self.match_index,
            mv,
            board: self.engine.board().clone(),
            who_is_next: self.engine.who_is_next(),
            remaining: self.remaining(now),
        });

        if self.engine.is_terminal() {
            self.finish(now);
        }
    }

    fn enforce_clock(&mut self, now: Instant) {
        let Some(loser) = self.clock.as_ref().and_then(|clock| clock.expired(now)) else {
            return;
        };

        if self.engine.declare_timeout(loser) {
            if let Some(clock) = &mut self.clock {
                clock.stop_turn(now);
            }
            self.finish(now);
        }
    }

    fn finish(&mut self, now: Instant) {
        let outcome = self.engine.check_outcome();
        self.score.record(outcome);
        info!(match_index = self.match_index, %outcome, "Match over");
        self.events.emit(ArenaEvent::MatchEnded {
            match_index: self.match_index,
            board: self.engine.board().clone(),
            outcome,
            remaining: self.remaining(now),
            score: self.score,
        });
    }
}

/// Cloneable handle to a [`MatchSession`].
#[derive(Debug, Clone)]
pub struct SharedMatch {
    inner: Arc<Mutex<MatchSession>>,
}

impl SharedMatch {
    /// Shares `session`.
    pub fn new(session: MatchSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MatchSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a move request atomically.
    pub fn submit(&self, request: MoveRequest) -> StateSnapshot {
        let mut session = self.lock();
        session.submit(request, Instant::now())
    }

    /// Current state.
    pub fn snapshot(&self) -> StateSnapshot {
        let mut session = self.lock();
        session.snapshot(Instant::now())
    }

    /// Starts a new match.
    pub fn reset(&self, starting_player: Option<Player>) -> StateSnapshot {
        let mut session = self.lock();
        session.reset(starting_player, Instant::now())
    }

    /// Runs `f` against the locked session.
    pub fn inspect<R>(&self, f: impl FnOnce(&MatchSession) -> R) -> R {
        f(&self.lock())
    }
}
