//! A [`GameState`] that many threads can drive at once.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Board, GameState, MoveError, MoveOutcome, Player, Status};

/// Mutex-guarded game state.
///
/// Every operation takes the one lock for its whole duration, so callers
/// observe a total order of moves, reads and resets. The lock is never held
/// across an `.await`; all operations are synchronous and short.
///
/// A poisoned lock is recovered rather than propagated: `GameState` only
/// writes after every check has passed, so it is consistent even if a
/// holder panicked.
#[derive(Debug, Default)]
pub struct SharedGame {
    state: Mutex<GameState>,
}

impl SharedGame {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`GameState::make_move`].
    pub fn make_move(
        &self,
        player: Player,
        position: i32,
    ) -> Result<MoveOutcome, MoveError> {
        self.lock().make_move(player, position)
    }

    /// Copy-on-read board snapshot.
    pub fn board(&self) -> Board {
        self.lock().board()
    }

    pub fn status(&self) -> Status {
        self.lock().status()
    }

    pub fn current_player(&self) -> Player {
        self.lock().current_player()
    }

    pub fn winner(&self) -> Option<Player> {
        self.lock().winner()
    }

    /// A consistent copy of the whole state, taken under one lock.
    pub fn snapshot(&self) -> GameState {
        self.lock().clone()
    }

    pub fn reset(&self) {
        self.lock().reset();
        tracing::info!("game reset");
    }
}
