//! Tic-tac-toe game state for tictac.
//!
//! This crate is the thing the RMI layer fronts. It knows nothing about
//! sockets, frames or services:
//!
//! - [`GameState`]: the rules (board, turn, status) and the move
//!   transition.
//! - [`SharedGame`]: a `GameState` behind one mutex, safe to call from any
//!   number of connection handlers.
//! - [`Scoreboard`]: win/draw tallies across rounds.

mod board;
mod error;
mod scoreboard;
mod shared;
mod state;

pub use board::{Board, Cell, Player, CELL_COUNT, LINES};
pub use error::MoveError;
pub use scoreboard::{Scoreboard, Tally};
pub use shared::SharedGame;
pub use state::{GameState, MoveOutcome, Status};
