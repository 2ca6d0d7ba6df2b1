//! Minesweeper game engine: board generation, reveal cascades, flag
//! bookkeeping, and the win/loss state machine. No I/O and no clock live
//! here; frontends own those.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

/// Caller-supplied game parameters. Values are never clamped; anything
/// unplayable is rejected by [`BoardConfig::validate`] before a board is
/// allocated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub const fn easy() -> Self {
        Self::new(10, 10, 10)
    }

    pub const fn medium() -> Self {
        Self::new(16, 16, 40)
    }

    pub const fn hard() -> Self {
        Self::new(30, 16, 99)
    }

    /// Rejects empty boards and mine counts with no safe cell left over.
    pub const fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 || self.mines >= self.total_cells() {
            Err(GameError::InvalidConfiguration)
        } else {
            Ok(())
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    /// Cells that must be explored to win.
    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub(crate) fn dim(&self) -> (usize, usize) {
        (usize::from(self.rows), usize::from(self.columns))
    }
}
