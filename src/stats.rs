//! Match records and tournament aggregates.

use derive_getters::Getters;
use derive_new::new;
use gomoku_rules::{Player, WinResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running tally of finished matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Score {
    /// Matches won by red, on the board or on time.
    red_wins: usize,
    /// Matches won by blue, on the board or on time.
    blue_wins: usize,
    /// Matches ending on a full board.
    ties: usize,
}

impl Score {
    /// Counts one finished match. Ongoing outcomes are ignored.
    pub fn record(&mut self, outcome: WinResult) {
        match (outcome.winner(), outcome) {
            (Some(Player::Red), _) => self.red_wins += 1,
            (Some(Player::Blue), _) => self.blue_wins += 1,
            (None, WinResult::Tie) => self.ties += 1,
            (None, _) => {}
        }
    }

    /// Wins of `player`.
    pub fn wins(&self, player: Player) -> usize {
        match player {
            Player::Red => self.red_wins,
            Player::Blue => self.blue_wins,
        }
    }

    /// Matches counted so far.
    pub fn total(&self) -> usize {
        self.red_wins + self.blue_wins + self.ties
    }
}

/// Record of one finished tournament match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct MatchStats {
    /// Zero-based match number.
    index: usize,
    /// Participant that moved first.
    starter: Player,
    /// Terminal outcome.
    outcome: WinResult,
    /// Stones placed.
    moves: usize,
    /// Red's budget left at the end.
    red_time_left: Duration,
    /// Blue's budget left at the end.
    blue_time_left: Duration,
}

/// Per-participant tournament totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ParticipantTotals {
    /// Display name.
    name: String,
    /// Matches this participant started.
    started: usize,
    /// Matches won, timeouts included.
    wins: usize,
    /// Wins because the opponent ran out of time.
    timeout_wins: usize,
}

/// Aggregate of a completed tournament.
///
/// For every participant `timeout_wins <= wins`, and
/// `red.wins + blue.wins + ties == matches`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TournamentSummary {
    /// Matches played.
    matches: usize,
    /// Ties.
    ties: usize,
    /// Totals of the red participant.
    red: ParticipantTotals,
    /// Totals of the blue participant.
    blue: ParticipantTotals,
}

impl TournamentSummary {
    /// Aggregates finished match records.
    pub fn from_matches(red_name: &str, blue_name: &str, matches: &[MatchStats]) -> Self {
        let mut red = ParticipantTotals {
            name: red_name.to_string(),
            ..Default::default()
        };
        let mut blue = ParticipantTotals {
            name: blue_name.to_string(),
            ..Default::default()
        };
        let mut ties = 0;

        for stats in matches {
            match stats.starter {
                Player::Red => red.started += 1,
                Player::Blue => blue.started += 1,
            }

            let totals = match stats.outcome.winner() {
                Some(Player::Red) => &mut red,
                Some(Player::Blue) => &mut blue,
                None => {
                    ties += 1;
                    continue;
                }
            };
            totals.wins += 1;
            if stats.outcome.is_timeout() {
                totals.timeout_wins += 1;
            }
        }

        Self {
            matches: matches.len(),
            ties,
            red,
            blue,
        }
    }

    /// Totals of `player`.
    pub fn of(&self, player: Player) -> &ParticipantTotals {
        match player {
            Player::Red => &self.red,
            Player::Blue => &self.blue,
        }
    }
}

impl std::fmt::Display for TournamentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tournament: {} matches, {} ties", self.matches, self.ties)?;
        for (color, totals) in [("Red", &self.red), ("Blue", &self.blue)] {
            writeln!(
                f,
                "  {:<4} {:<16} wins {:>3} (on time {:>3}), started {:>3}",
                color, totals.name, totals.wins, totals.timeout_wins, totals.started
            )?;
        }
        Ok(())
    }
}
