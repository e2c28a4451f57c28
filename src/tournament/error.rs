//! Tournament error types.

use crate::participants::ParticipantError;
use derive_more::{Display, Error};

/// A tournament that could not run to completion.
#[derive(Debug, Clone, Display, Error)]
pub enum TournamentError {
    /// A participant gave up.
    #[display("Participant {} failed in match {}: {}", name, match_index, source)]
    Participant {
        /// Failing participant.
        name: String,
        /// Match in progress.
        match_index: usize,
        /// What went wrong.
        source: ParticipantError,
    },

    /// A participant kept proposing illegal moves.
    #[display(
        "Participant {} had {} moves rejected in a row in match {}",
        name,
        rejections,
        match_index
    )]
    Stalled {
        /// Stalling participant.
        name: String,
        /// Match in progress.
        match_index: usize,
        /// Consecutive rejections.
        rejections: usize,
    },

    /// Settings that cannot describe a tournament.
    #[display("Invalid tournament settings: {}", reason)]
    InvalidSettings {
        /// What is wrong.
        reason: String,
    },
}
