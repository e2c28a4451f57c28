//! Alternating turn invariant: players alternate starting with the starter.

use super::Invariant;
use crate::GameEngine;

/// Invariant: players alternate turns.
///
/// The first move belongs to the starting player, no player moves twice in
/// a row, and while the match is live the next player is the one who did
/// not make the last move.
pub struct AlternatingTurnInvariant;

impl Invariant<GameEngine> for AlternatingTurnInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let history = engine.history();

        if let Some(first) = history.first()
            && first.player() != engine.starting_player()
        {
            return false;
        }

        if history
            .windows(2)
            .any(|pair| pair[0].player() == pair[1].player())
        {
            return false;
        }

        if engine.is_terminal() {
            return engine.who_is_next().is_none();
        }

        let expected_next = match history.last() {
            Some(last) => last.player().opponent(),
            None => engine.starting_player(),
        };

        engine.who_is_next() == Some(expected_next)
    }

    fn description() -> &'static str {
        "Players alternate turns starting with the starting player"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Position};

    #[test]
    fn test_fresh_engine_holds() {
        let mut engine = GameEngine::with_seed(1);
        engine.reset(Some(Player::Blue));
        assert!(AlternatingTurnInvariant::holds(&engine));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let mut engine = GameEngine::with_seed(1);
        engine.reset(Some(Player::Red));
        for (i, player) in [Player::Red, Player::Blue, Player::Red].into_iter().enumerate() {
            assert!(engine.apply_move(Position::new(0, i).unwrap(), player));
            assert!(AlternatingTurnInvariant::holds(&engine));
        }
        assert_eq!(engine.who_is_next(), Some(Player::Blue));
    }

    #[test]
    fn test_timeout_clears_next_player() {
        let mut engine = GameEngine::with_seed(1);
        engine.reset(Some(Player::Red));
        assert!(engine.declare_timeout(Player::Red));
        assert!(AlternatingTurnInvariant::holds(&engine));
    }
}
