//! Win/draw tallies across rounds.
//!
//! The scoreboard is explicit state owned by whoever hosts the game. It is
//! shared by reference with the code that finishes rounds; there is no
//! process-wide counter.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{MoveOutcome, Player};

/// A copy of the tallies at one point in time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct Tally {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Tally {
    /// Number of finished rounds.
    pub fn rounds(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Thread-safe round counter.
#[derive(Debug, Default)]
pub struct Scoreboard {
    tally: Mutex<Tally>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `outcome` if it ended a round. Returns `true` if it did.
    pub fn record(&self, outcome: MoveOutcome) -> bool {
        let mut tally =
            self.tally.lock().unwrap_or_else(PoisonError::into_inner);
        match outcome {
            MoveOutcome::Won(Player::X) => tally.x_wins += 1,
            MoveOutcome::Won(Player::O) => tally.o_wins += 1,
            MoveOutcome::Draw => tally.draws += 1,
            MoveOutcome::Continue { .. } => return false,
        }
        tracing::debug!(rounds = tally.rounds(), "round recorded");
        true
    }

    pub fn snapshot(&self) -> Tally {
        *self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
