use serde::{Deserialize, Serialize};

/// Player-visible status of a cell. Exactly one of the three holds at any
/// point in a cell's life.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Explored,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// Smallest unit of game state. Mine presence and the adjacent-mine count
/// are fixed when the board is generated; the flag and explored markers
/// change during play and are mutually exclusive.
///
/// Cells are owned by the board grid and only the board mutates them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    flagged: bool,
    explored: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn has_mine(self) -> bool {
        self.mine
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_explored(self) -> bool {
        self.explored
    }

    /// Number of mines among the up-to-8 surrounding cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(self) -> CellState {
        if self.explored {
            CellState::Explored
        } else if self.flagged {
            CellState::Flagged
        } else {
            CellState::Hidden
        }
    }

    pub(crate) fn place_mine(&mut self) {
        self.mine = true;
    }

    pub(crate) fn increment_adjacent(&mut self) {
        self.adjacent_mines += 1;
    }

    /// Callers must not explore a flagged cell.
    pub(crate) fn set_explored(&mut self) {
        debug_assert!(!self.flagged, "explored and flagged are mutually exclusive");
        self.explored = true;
    }

    /// Callers must not flag an explored cell.
    pub(crate) fn toggle_flag(&mut self) {
        debug_assert!(!self.explored, "explored and flagged are mutually exclusive");
        self.flagged = !self.flagged;
    }
}
