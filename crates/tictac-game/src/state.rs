//! The game model and its transition function.
//!
//! [`GameState`] is plain data with no locking. It is the single place the
//! rules live; [`SharedGame`](crate::SharedGame) wraps it for concurrent use.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Board, Cell, MoveError, Player, CELL_COUNT};

/// Where a round stands.
///
/// Invariant: `InProgress` iff no winning line exists and at least one cell
/// is still empty.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum Status {
    #[default]
    InProgress,
    Won(Player),
    Draw,
}

impl Status {
    /// Returns `true` once the round has a winner or is drawn.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Won(player) => write!(f, "Player {player} wins!"),
            Self::Draw => write!(f, "Draw!"),
        }
    }
}

/// The result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The round goes on and `next` is on turn.
    Continue { next: Player },
    /// The mover completed a line.
    Won(Player),
    /// The mover filled the last cell without completing a line.
    Draw,
}

impl MoveOutcome {
    /// The status the game is in after this outcome.
    pub fn status(self) -> Status {
        match self {
            Self::Continue { .. } => Status::InProgress,
            Self::Won(player) => Status::Won(player),
            Self::Draw => Status::Draw,
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue { next } => {
                write!(f, "Move accepted. Next player: {next}")
            }
            Self::Won(_) | Self::Draw => write!(f, "{}", self.status()),
        }
    }
}

/// A tic-tac-toe round: board, whose turn it is, and the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    status: Status,
}

impl GameState {
    /// A fresh round: empty board, X on turn, in progress.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: Status::InProgress,
        }
    }

    /// Plays `player` at `position`.
    ///
    /// Checks run in a fixed order and the first failure wins: game over,
    /// wrong turn, out of range, occupied. A rejected move leaves the state
    /// untouched. After a write the win check runs before the draw check, so
    /// a move that fills the board and completes a line is a win.
    pub fn make_move(
        &mut self,
        player: Player,
        position: i32,
    ) -> Result<MoveOutcome, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver(self.status));
        }

        if player != self.current_player {
            return Err(MoveError::WrongTurn {
                current: self.current_player,
            });
        }

        let index = usize::try_from(position)
            .ok()
            .filter(|&i| i < CELL_COUNT)
            .ok_or(MoveError::OutOfRange(position))?;

        if !self.board.cells()[index].is_empty() {
            return Err(MoveError::CellOccupied(index));
        }

        self.board.set(index, Cell::Taken(player));
        tracing::debug!(%player, position = index, "move applied");

        let outcome = if self.board.has_line(player) {
            MoveOutcome::Won(player)
        } else if self.board.is_full() {
            MoveOutcome::Draw
        } else {
            self.current_player = player.opponent();
            MoveOutcome::Continue {
                next: self.current_player,
            }
        };

        self.status = outcome.status();
        if self.status.is_terminal() {
            tracing::info!(status = %self.status, "round finished");
        }
        Ok(outcome)
    }

    /// A copy of the board.
    pub fn board(&self) -> Board {
        self.board
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// The winner, if the round ended in a win.
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            Status::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
