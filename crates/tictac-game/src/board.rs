//! Board primitives: players, cells, and the 3x3 grid.
//!
//! The board is a flat array of 9 cells in row-major order:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! Every type here renders to the single characters remote callers see on
//! the wire: `'X'`, `'O'`, and `'-'` for an empty cell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// The eight winning lines: 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One of the two players. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// The character used on the wire and in status messages.
    pub fn as_char(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }

    /// Parses `'X'` or `'O'`. Anything else is `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Self::X),
            'O' => Some(Self::O),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// The content of a single board cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    /// Character rendering: `'-'`, `'X'` or `'O'`.
    pub fn as_char(self) -> char {
        match self {
            Self::Empty => '-',
            Self::Taken(player) => player.as_char(),
        }
    }

    /// Returns `true` if nobody has played here yet.
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        Self::Taken(player)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A snapshot of the 9 board cells.
///
/// `Board` is `Copy`: handing one out never exposes the live game state,
/// so a caller holding a snapshot cannot observe later moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// An all-empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Returns the cell at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Returns all cells in index order.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Renders the board as the 9-character array used on the wire.
    pub fn to_chars(&self) -> [char; CELL_COUNT] {
        self.cells.map(Cell::as_char)
    }

    /// Returns `true` if every cell is taken.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns `true` if `player` owns all three cells of any line.
    pub fn has_line(&self, player: Player) -> bool {
        let mark = Cell::Taken(player);
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == mark))
    }

    /// Indices of the empty cells, in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the 9 cells in index order, e.g. `"XXX-OO---"`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.as_char())?;
        }
        Ok(())
    }
}
