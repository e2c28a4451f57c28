//! Replay invariant: the board is exactly the replay of the history.

use super::Invariant;
use crate::{Board, GameEngine};

/// Invariant: replaying the history onto an empty board reproduces the board.
pub struct ReplayMatchesBoardInvariant;

impl Invariant<GameEngine> for ReplayMatchesBoardInvariant {
    fn holds(engine: &GameEngine) -> bool {
        Board::from_history(engine.history()) == *engine.board()
    }

    fn description() -> &'static str {
        "Replaying history reproduces the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    #[test]
    fn test_random_game_holds() {
        let mut engine = GameEngine::with_seed(11);
        engine.reset(Some(Player::Blue));
        while let Some(pos) = engine.suggest_random_step() {
            let Some(player) = engine.who_is_next() else {
                break;
            };
            assert!(engine.apply_move(pos, player));
            assert!(ReplayMatchesBoardInvariant::holds(&engine));
        }
    }
}
