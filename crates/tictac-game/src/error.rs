//! Error types for the game layer.

use crate::{Player, Status};

/// A move that the rules reject.
///
/// These are expected, user-facing outcomes: a player clicking an occupied
/// cell is not a bug. The messages match what remote clients display, so
/// keep them stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The round already ended in a win or a draw.
    #[error("Game is already over. Status: {0}")]
    GameOver(Status),

    /// The move came from the player who is not on turn.
    #[error("Not your turn! Current player: {current}")]
    WrongTurn { current: Player },

    /// The position is outside `0..=8`.
    #[error("Invalid position! Must be between 0 and 8.")]
    OutOfRange(i32),

    /// Someone already played in this cell.
    #[error("Position already occupied! Choose another.")]
    CellOccupied(usize),
}
