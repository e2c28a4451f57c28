//! Tournament controller.
//!
//! Runs a fixed number of sequential matches between two in-process
//! participants. Each participant has a thinking budget per match that is
//! charged only while it is choosing a move; running out hands the match to
//! the opponent. The first half of the matches (rounded up) is started by
//! red, the rest by blue.

mod error;

pub use error::TournamentError;

use crate::clock::ThinkingClock;
use crate::config::TournamentConfig;
use crate::events::{ArenaEvent, EventSink};
use crate::participants::{Participant, TurnContext};
use crate::stats::{MatchStats, Score, TournamentSummary};
use derive_getters::Getters;
use gomoku_rules::{GameEngine, Move, Player};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Parameters of a tournament run.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TournamentSettings {
    /// Number of matches.
    matches: usize,
    /// Thinking budget per participant per match.
    time_budget: Duration,
    /// Seed for the match engines.
    seed: Option<u64>,
    /// Rejected moves in a row tolerated before giving up.
    max_consecutive_rejections: usize,
}

impl TournamentSettings {
    /// `matches` matches with `time_budget` each; unseeded.
    pub fn new(matches: usize, time_budget: Duration) -> Self {
        Self {
            matches,
            time_budget,
            seed: None,
            max_consecutive_rejections: 1000,
        }
    }

    /// Makes engine randomness reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the stall limit.
    pub fn with_max_consecutive_rejections(mut self, limit: usize) -> Self {
        self.max_consecutive_rejections = limit;
        self
    }

    /// Settings from the `[tournament]` config section.
    pub fn from_config(config: &TournamentConfig) -> Self {
        Self {
            matches: *config.matches(),
            time_budget: config.time_budget(),
            seed: *config.seed(),
            max_consecutive_rejections: *config.max_consecutive_rejections(),
        }
    }

    fn validate(&self) -> Result<(), TournamentError> {
        if self.matches == 0 {
            return Err(TournamentError::InvalidSettings {
                reason: "at least one match is required".to_string(),
            });
        }
        if self.max_consecutive_rejections == 0 {
            return Err(TournamentError::InvalidSettings {
                reason: "max_consecutive_rejections must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything a finished tournament produced.
#[derive(Debug, Clone, Getters)]
pub struct TournamentReport {
    /// One record per match, in play order.
    matches: Vec<MatchStats>,
    /// Aggregate counts.
    summary: TournamentSummary,
}

/// Runs matches between a red and a blue participant.
pub struct Tournament {
    settings: TournamentSettings,
    red: Box<dyn Participant>,
    blue: Box<dyn Participant>,
    rng: StdRng,
    events: EventSink,
    score: Score,
}

impl Tournament {
    /// Creates a tournament; `red` plays red in every match.
    pub fn new(
        settings: TournamentSettings,
        red: Box<dyn Participant>,
        blue: Box<dyn Participant>,
    ) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            settings,
            red,
            blue,
            rng,
            events: EventSink::disabled(),
            score: Score::default(),
        }
    }

    /// Reports progress to `events`.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Who starts match `match_index` of `matches`.
    pub fn starter_for(match_index: usize, matches: usize) -> Player {
        if match_index < matches.div_ceil(2) {
            Player::Red
        } else {
            Player::Blue
        }
    }

    /// Plays every match and aggregates the results.
    ///
    /// # Errors
    ///
    /// Fails on invalid settings, on a participant error, or when a
    /// participant exceeds the consecutive rejection limit.
    #[instrument(
        skip(self),
        fields(
            matches = self.settings.matches,
            red = self.red.name(),
            blue = self.blue.name()
        )
    )]
    pub async fn run(&mut self) -> Result<TournamentReport, TournamentError> {
        self.settings.validate()?;
        info!("Starting tournament");

        let mut records = Vec::with_capacity(self.settings.matches);
        for match_index in 0..self.settings.matches {
            records.push(self.play_match(match_index).await?);
        }

        let summary = TournamentSummary::from_matches(self.red.name(), self.blue.name(), &records);
        info!(
            red_wins = summary.red().wins(),
            blue_wins = summary.blue().wins(),
            ties = summary.ties(),
            "Tournament finished"
        );
        self.events
            .emit(ArenaEvent::TournamentFinished(summary.clone()));

        Ok(TournamentReport {
            matches: records,
            summary,
        })
    }

    fn participant_mut(&mut self, player: Player) -> &mut dyn Participant {
        match player {
            Player::Red => self.red.as_mut(),
            Player::Blue => self.blue.as_mut(),
        }
    }

    fn name_of(&self, player: Player) -> &str {
        match player {
            Player::Red => self.red.name(),
            Player::Blue => self.blue.name(),
        }
    }

    #[instrument(skip(self))]
    async fn play_match(&mut self, match_index: usize) -> Result<MatchStats, TournamentError> {
        let starter = Self::starter_for(match_index, self.settings.matches);
        let mut engine = GameEngine::from_rng(StdRng::from_rng(&mut self.rng));
        engine.reset(Some(starter));
        let mut clock = ThinkingClock::new(self.settings.time_budget);
        let mut rejections = 0;

        info!(%starter, "Match started");

        while let Some(mover) = engine.who_is_next() {
            let remaining = clock.remaining().of(mover);
            if remaining.is_zero() {
                engine.declare_timeout(mover);
                break;
            }

            let turn = TurnContext::new(engine.board().clone(), mover, remaining, match_index);
            let started = Instant::now();
            let answer = {
                let participant = self.participant_mut(mover);
                tokio::time::timeout(remaining, participant.choose_move(&turn)).await
            };
            let elapsed = started.elapsed();
            let left = clock.charge(mover, elapsed);

            let position = match answer {
                Err(_) => {
                    info!(%mover, ?elapsed, "Participant ran out of time while thinking");
                    engine.declare_timeout(mover);
                    break;
                }
                Ok(Err(source)) => {
                    return Err(TournamentError::Participant {
                        name: self.name_of(mover).to_string(),
                        match_index,
                        source,
                    });
                }
                Ok(Ok(position)) => position,
            };

            if left.is_zero() {
                info!(%mover, %position, "Move arrived after the budget ran out");
                engine.declare_timeout(mover);
                break;
            }

            let mv = Move::new(mover, position).with_thinking_time(elapsed);
            match engine.try_play(mv) {
                Ok(()) => {
                    rejections = 0;
                    self.events.emit(ArenaEvent::MoveApplied {
                        match_index,
                        mv,
                        board: engine.board().clone(),
                        who_is_next: engine.who_is_next(),
                        remaining: Some(clock.remaining()),
                    });
                }
                Err(rejection) => {
                    rejections += 1;
                    debug!(%mover, %rejection, rejections, "Move rejected");
                    if rejections >= self.settings.max_consecutive_rejections {
                        warn!(%mover, rejections, "Participant stalled");
                        return Err(TournamentError::Stalled {
                            name: self.name_of(mover).to_string(),
                            match_index,
                            rejections,
                        });
                    }
                }
            }
        }

        let outcome = engine.check_outcome();
        self.score.record(outcome);
        let remaining = clock.remaining();
        info!(%outcome, moves = engine.history().len(), "Match finished");
        self.events.emit(ArenaEvent::MatchEnded {
            match_index,
            board: engine.board().clone(),
            outcome,
            remaining: Some(remaining),
            score: self.score,
        });

        Ok(MatchStats::new(
            match_index,
            starter,
            outcome,
            engine.history().len(),
            remaining.red,
            remaining.blue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_split_rounds_up_for_red() {
        let starters: Vec<Player> = (0..5).map(|i| Tournament::starter_for(i, 5)).collect();
        assert_eq!(
            starters,
            vec![Player::Red, Player::Red, Player::Red, Player::Blue, Player::Blue]
        );
        assert_eq!(Tournament::starter_for(0, 1), Player::Red);
    }

    #[test]
    fn test_zero_matches_is_invalid() {
        let settings = TournamentSettings::new(0, Duration::from_secs(1));
        assert!(matches!(
            settings.validate(),
            Err(TournamentError::InvalidSettings { .. })
        ));
    }
}
