//! Services the dispatcher can route to.

use std::sync::Arc;

use tictac_game::{Scoreboard, SharedGame};
use tictac_protocol::{GameCall, RemoteError, WireValue};

/// Confirmation returned by `resetGame`.
pub const RESET_MESSAGE: &str = "Game reset successfully.";

/// Something a [`Dispatcher`](crate::Dispatcher) can hold.
///
/// Only one kind exists today (the game), but the dispatcher never assumes
/// that: it asks each service for a capability and reports
/// `UnknownMethod` when the capability is missing.
pub trait Service: Send + Sync + 'static {
    /// Short description for diagnostics, e.g. `"GameService"`.
    fn describe(&self) -> String;

    /// The game capability, if this service has one.
    fn as_game(&self) -> Option<&GameService> {
        None
    }
}

/// The tic-tac-toe service: one shared game plus the scoreboard its rounds
/// are counted on.
#[derive(Debug)]
pub struct GameService {
    game: SharedGame,
    scoreboard: Arc<Scoreboard>,
}

impl GameService {
    pub fn new(scoreboard: Arc<Scoreboard>) -> Self {
        Self {
            game: SharedGame::new(),
            scoreboard,
        }
    }

    /// Runs one validated call against the game.
    ///
    /// Rule violations come back as `Err(RemoteError)` with the matching
    /// kind; nothing here panics on caller input.
    pub fn execute(&self, call: GameCall) -> Result<WireValue, RemoteError> {
        match call {
            GameCall::MakeMove { player, position } => {
                let outcome = self.game.make_move(player, position)?;
                self.scoreboard.record(outcome);
                Ok(WireValue::Str(outcome.to_string()))
            }
            GameCall::GetBoard => {
                Ok(WireValue::Chars(self.game.board().to_chars().to_vec()))
            }
            GameCall::GetStatus => {
                Ok(WireValue::Str(self.game.status().to_string()))
            }
            GameCall::GetCurrentPlayer => {
                Ok(WireValue::Char(self.game.current_player().as_char()))
            }
            GameCall::ResetGame => {
                self.game.reset();
                Ok(WireValue::Str(RESET_MESSAGE.to_string()))
            }
        }
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new(Arc::new(Scoreboard::new()))
    }
}

impl Service for GameService {
    fn describe(&self) -> String {
        "GameService".to_string()
    }

    fn as_game(&self) -> Option<&GameService> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_game::Player;
    use tictac_protocol::ErrorKind;

    fn mv(player: Player, position: i32) -> GameCall {
        GameCall::MakeMove { player, position }
    }

    #[test]
    fn test_make_move_returns_outcome_text() {
        let service = GameService::default();
        let value = service.execute(mv(Player::X, 0)).unwrap();
        assert_eq!(value, WireValue::from("Move accepted. Next player: O"));
    }

    #[test]
    fn test_rule_violation_is_an_error_value() {
        let service = GameService::default();
        let err = service.execute(mv(Player::O, 0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongTurn);
        assert_eq!(err.message, "Not your turn! Current player: X");
    }

    #[test]
    fn test_reads_return_wire_shapes() {
        let service = GameService::default();
        service.execute(mv(Player::X, 4)).unwrap();

        assert_eq!(
            service.execute(GameCall::GetBoard).unwrap(),
            WireValue::Chars("----X----".chars().collect())
        );
        assert_eq!(
            service.execute(GameCall::GetStatus).unwrap(),
            WireValue::from("IN_PROGRESS")
        );
        assert_eq!(
            service.execute(GameCall::GetCurrentPlayer).unwrap(),
            WireValue::Char('O')
        );
    }

    #[test]
    fn test_finished_rounds_are_recorded() {
        let scoreboard = Arc::new(Scoreboard::new());
        let service = GameService::new(Arc::clone(&scoreboard));
        for (player, pos) in [
            (Player::X, 0),
            (Player::O, 3),
            (Player::X, 1),
            (Player::O, 4),
            (Player::X, 2),
        ] {
            service.execute(mv(player, pos)).unwrap();
        }
        assert_eq!(scoreboard.snapshot().x_wins, 1);

        // A reset starts a new round without touching the tally.
        assert_eq!(
            service.execute(GameCall::ResetGame).unwrap(),
            WireValue::from(RESET_MESSAGE)
        );
        assert_eq!(scoreboard.snapshot().rounds(), 1);
        assert_eq!(
            service.execute(GameCall::GetStatus).unwrap(),
            WireValue::from("IN_PROGRESS")
        );
    }
}
