//! First-class invariants for five-in-a-row.
//!
//! Invariants are logical properties that must hold throughout a match.
//! The engine checks them in debug builds after every accepted move, and
//! they are testable on their own.

mod alternating_turn;
mod history_consistent;
mod replay_matches_board;

pub use alternating_turn::AlternatingTurnInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use replay_matches_board::ReplayMatchesBoardInvariant;

use crate::GameEngine;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for triples of invariants, which is what the engine checks.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Every invariant the engine maintains.
pub type EngineInvariants = (
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
    ReplayMatchesBoardInvariant,
);

/// Checks all engine invariants.
pub fn check_engine(engine: &GameEngine) -> Result<(), Vec<InvariantViolation>> {
    <EngineInvariants as InvariantSet<GameEngine>>::check_all(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    struct Holds;
    struct Fails;

    impl Invariant<GameEngine> for Holds {
        fn holds(_: &GameEngine) -> bool {
            true
        }

        fn description() -> &'static str {
            "always holds"
        }
    }

    impl Invariant<GameEngine> for Fails {
        fn holds(_: &GameEngine) -> bool {
            false
        }

        fn description() -> &'static str {
            "never holds"
        }
    }

    #[test]
    fn test_engine_invariants_hold_through_a_match() {
        let mut engine = GameEngine::with_seed(19);
        engine.reset(Some(Player::Red));
        assert_eq!(check_engine(&engine), Ok(()));
        while let Some(player) = engine.who_is_next() {
            let Some(pos) = engine.suggest_random_step() else {
                break;
            };
            assert!(engine.apply_move(pos, player));
            assert_eq!(check_engine(&engine), Ok(()));
        }
    }

    #[test]
    fn test_every_violation_is_collected() {
        let engine = GameEngine::with_seed(2);
        let violations = <(Fails, Holds, Fails) as InvariantSet<GameEngine>>::check_all(&engine)
            .unwrap_err();
        assert_eq!(
            violations,
            vec![
                InvariantViolation::new("never holds"),
                InvariantViolation::new("never holds"),
            ]
        );
    }
}
