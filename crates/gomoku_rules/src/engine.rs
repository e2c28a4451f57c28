//! Authoritative match state for one five-in-a-row game.
//!
//! The engine is mutated only through move validation
//! ([`GameEngine::try_play`] and its wrappers), the timeout signal and
//! [`GameEngine::reset`]. Once an outcome is terminal every further move is
//! rejected.

use super::action::{Move, MoveRejection};
use super::invariants;
use super::position::Position;
use super::rules::{self, WinResult};
use super::types::{Board, Cell, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

/// Five-in-a-row game engine.
///
/// Owns the board, move history and turn state for a single match. The
/// random source is explicit so that starting players and suggested moves
/// are reproducible under a fixed seed.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    history: Vec<Move>,
    starting_player: Player,
    who_is_next: Option<Player>,
    outcome: WinResult,
    rng: StdRng,
}

impl GameEngine {
    /// Creates an engine seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates an engine with a deterministic random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates an engine drawing from `rng`; the starting player is random.
    #[instrument(skip(rng))]
    pub fn from_rng(mut rng: StdRng) -> Self {
        let starting_player = random_player(&mut rng);
        debug!(%starting_player, "Creating game engine");
        Self {
            board: Board::new(),
            history: Vec::new(),
            starting_player,
            who_is_next: Some(starting_player),
            outcome: WinResult::Ongoing,
            rng,
        }
    }

    /// Rebuilds an engine by replaying `moves` through full validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`MoveRejection`] met; an illegal history cannot
    /// be replayed.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn replay(starting_player: Player, moves: &[Move]) -> Result<Self, MoveRejection> {
        let mut engine = Self::new();
        engine.reset(Some(starting_player));
        for mv in moves {
            engine.try_play(*mv)?;
        }
        Ok(engine)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the accepted moves in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Player who made (or will make) the first move of this match.
    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    /// Player to move, or `None` once the match is over.
    pub fn who_is_next(&self) -> Option<Player> {
        self.who_is_next
    }

    /// Current outcome. `Ongoing` while the match is live.
    pub fn check_outcome(&self) -> WinResult {
        self.outcome
    }

    /// True once a win, tie or timeout has been recorded.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Applies a move if it is legal.
    ///
    /// Returns `false` (leaving the state untouched) when the cell is
    /// occupied, it is not `player`'s turn, or the match is over. Rejection
    /// is an expected outcome, not a fault.
    pub fn apply_move(&mut self, position: Position, player: Player) -> bool {
        self.try_apply_move(position, player).is_ok()
    }

    /// Like [`GameEngine::apply_move`] but names the rejection cause.
    pub fn try_apply_move(
        &mut self,
        position: Position,
        player: Player,
    ) -> Result<(), MoveRejection> {
        self.try_play(Move::new(player, position))
    }

    /// Validates raw coordinates and participant id before applying.
    ///
    /// This is the entry point for untrusted input: out-of-range
    /// coordinates and ids other than 1 or 2 are rejections.
    pub fn try_apply_raw(
        &mut self,
        row: i64,
        col: i64,
        player_id: i64,
    ) -> Result<(), MoveRejection> {
        let player =
            Player::from_id(player_id).ok_or(MoveRejection::InvalidParticipant(player_id))?;
        let position =
            Position::from_signed(row, col).ok_or(MoveRejection::OutOfBounds { row, col })?;
        self.try_apply_move(position, player)
    }

    /// Validates and applies a move, keeping any thinking time it carries.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn try_play(&mut self, mv: Move) -> Result<(), MoveRejection> {
        if self.is_terminal() {
            return Err(MoveRejection::MatchOver);
        }

        if self.who_is_next != Some(mv.player()) {
            return Err(MoveRejection::WrongTurn(mv.player()));
        }

        if !self.board.is_empty(mv.position()) {
            return Err(MoveRejection::CellOccupied(mv.position()));
        }

        self.board.set(mv.position(), Cell::Occupied(mv.player()));
        self.history.push(mv);
        self.who_is_next = Some(mv.player().opponent());

        self.update_outcome(mv);

        debug_assert!(
            invariants::check_engine(self).is_ok(),
            "engine invariants violated: {:?}",
            invariants::check_engine(self)
        );

        Ok(())
    }

    /// Ends the match because `loser` exhausted its thinking budget.
    ///
    /// Returns `false` if the match was already terminal. Timeout pre-empts
    /// whatever lines are forming on the board.
    #[instrument(skip(self))]
    pub fn declare_timeout(&mut self, loser: Player) -> bool {
        if self.is_terminal() {
            warn!(%loser, "Timeout signalled on a finished match");
            return false;
        }

        self.outcome = WinResult::TimeoutWin {
            winner: loser.opponent(),
        };
        self.who_is_next = None;
        info!(%loser, outcome = %self.outcome, "Match ended on time");
        true
    }

    /// Uniformly random empty cell, or `None` when the board is full.
    pub fn suggest_random_step(&mut self) -> Option<Position> {
        random_empty_cell(&self.board, &mut self.rng)
    }

    /// Starts a fresh match; the starter is random when not given.
    #[instrument(skip(self))]
    pub fn reset(&mut self, starting_player: Option<Player>) {
        let starting_player = starting_player.unwrap_or_else(|| random_player(&mut self.rng));
        self.board = Board::new();
        self.history.clear();
        self.starting_player = starting_player;
        self.who_is_next = Some(starting_player);
        self.outcome = WinResult::Ongoing;
        debug!(%starting_player, "Engine reset");
    }

    /// Incremental outcome check after `last` was placed.
    fn update_outcome(&mut self, last: Move) {
        if let Some((direction, anchor)) = rules::line_through(&self.board, last.position()) {
            self.outcome = WinResult::Win {
                player: last.player(),
                anchor,
                direction,
            };
        } else if rules::is_full(&self.board) {
            self.outcome = WinResult::Tie;
        }

        if self.outcome.is_terminal() {
            self.who_is_next = None;
            info!(outcome = %self.outcome, moves = self.history.len(), "Match finished");
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniformly random empty cell of `board`.
pub fn random_empty_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    let empty: Vec<Position> = board.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.random_range(0..empty.len())])
}

fn random_player<R: Rng + ?Sized>(rng: &mut R) -> Player {
    if rng.random_bool(0.5) {
        Player::Red
    } else {
        Player::Blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(r: usize, c: usize) -> Position {
        Position::new(r, c).unwrap()
    }

    fn red_first() -> GameEngine {
        let mut engine = GameEngine::with_seed(42);
        engine.reset(Some(Player::Red));
        engine
    }

    #[test]
    fn test_rejection_causes_are_distinct() {
        let mut engine = red_first();
        assert_eq!(
            engine.try_apply_move(pos(0, 0), Player::Blue),
            Err(MoveRejection::WrongTurn(Player::Blue))
        );
        engine.try_apply_move(pos(0, 0), Player::Red).unwrap();
        assert_eq!(
            engine.try_apply_move(pos(0, 0), Player::Blue),
            Err(MoveRejection::CellOccupied(pos(0, 0)))
        );
        assert_eq!(
            engine.try_apply_raw(0, 1, 3),
            Err(MoveRejection::InvalidParticipant(3))
        );
        assert_eq!(
            engine.try_apply_raw(15, 1, 2),
            Err(MoveRejection::OutOfBounds { row: 15, col: 1 })
        );
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_win_makes_engine_terminal() {
        let mut engine = red_first();
        for col in 0..4 {
            assert!(engine.apply_move(pos(7, col), Player::Red));
            assert!(engine.apply_move(pos(0, col), Player::Blue));
        }
        assert!(engine.apply_move(pos(7, 4), Player::Red));

        assert_eq!(
            engine.check_outcome(),
            WinResult::Win {
                player: Player::Red,
                anchor: pos(7, 0),
                direction: rules::Direction::Row,
            }
        );
        assert_eq!(engine.who_is_next(), None);
        assert_eq!(
            engine.try_apply_move(pos(1, 1), Player::Blue),
            Err(MoveRejection::MatchOver)
        );
    }

    #[test]
    fn test_timeout_is_terminal_and_one_shot() {
        let mut engine = red_first();
        assert!(engine.apply_move(pos(3, 3), Player::Red));
        assert!(engine.declare_timeout(Player::Blue));
        assert_eq!(
            engine.check_outcome(),
            WinResult::TimeoutWin { winner: Player::Red }
        );
        assert!(!engine.declare_timeout(Player::Red));
        assert!(!engine.apply_move(pos(4, 4), Player::Blue));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = red_first();
        assert!(engine.apply_move(pos(3, 3), Player::Red));
        engine.declare_timeout(Player::Blue);
        engine.reset(Some(Player::Blue));
        assert!(engine.history().is_empty());
        assert_eq!(engine.board().occupied_count(), 0);
        assert_eq!(engine.who_is_next(), Some(Player::Blue));
        assert_eq!(engine.check_outcome(), WinResult::Ongoing);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(99);
        let mut b = GameEngine::with_seed(99);
        assert_eq!(a.starting_player(), b.starting_player());
        assert_eq!(a.suggest_random_step(), b.suggest_random_step());
    }

    #[test]
    fn test_thinking_time_is_recorded() {
        let mut engine = red_first();
        let mv = Move::new(Player::Red, pos(2, 2))
            .with_thinking_time(std::time::Duration::from_millis(30));
        engine.try_play(mv).unwrap();
        assert_eq!(
            engine.history()[0].thinking_time(),
            Some(std::time::Duration::from_millis(30))
        );
    }

    #[test]
    fn test_replay_rejects_illegal_history() {
        let moves = [Move::new(Player::Red, pos(1, 1)), Move::new(Player::Red, pos(1, 2))];
        assert_eq!(
            GameEngine::replay(Player::Red, &moves).err(),
            Some(MoveRejection::WrongTurn(Player::Red))
        );
    }
}
