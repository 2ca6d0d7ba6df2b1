use crate::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Won and Lost are absorbing; every command on a finished board is a no-op.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Outcome of a reveal command.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed | HitMine | Won => true,
        }
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlagOutcome {
    NoChange,
    Placed,
    Removed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// The game board: owns the cell grid and all mutable game state, and is the
/// only component that walks cell neighborhoods.
///
/// A board that exists is always internally consistent. The constructors
/// validate the configuration before allocating, adjacency counts exactly
/// reflect the mine layout, and the flagged/explored tallies track the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    grid: Array2<Cell>,
    flagged_count: CellCount,
    explored_count: CellCount,
    state: GameState,
}

impl Board {
    /// Builds a fresh board for `config` with mines taken from `placer`.
    pub fn new(config: BoardConfig, placer: impl MinePlacer) -> Result<Self> {
        config.validate()?;
        let mask = placer.place_mines(config);

        // double check what the placer did
        let placed = mask.iter().filter(|&&mine| mine).count() as CellCount;
        if placed != config.mines {
            log::warn!(
                "mine placer set {} cells, requested {}",
                placed,
                config.mines
            );
        }
        let config = BoardConfig {
            mines: placed,
            ..config
        };

        Ok(Self::assemble(config, &mask))
    }

    /// Builds a board with uniform random placement derived from `seed`.
    pub fn from_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomMinePlacer::new(seed))
    }

    /// Builds a board with mines at exactly the given coordinates. Duplicates
    /// collapse to one mine; out-of-range coordinates are rejected.
    pub fn with_mines(rows: Coord, columns: Coord, mines: &[Coord2]) -> Result<Self> {
        BoardConfig::new(rows, columns, 0).validate()?;

        let mut mask: Array2<bool> = Array2::default((rows.into(), columns.into()));
        for &coords in mines {
            if coords.0 >= rows || coords.1 >= columns {
                return Err(GameError::OutOfBounds);
            }
            mask[coords.grid_index()] = true;
        }

        let placed = mask.iter().filter(|&&mine| mine).count() as CellCount;
        let config = BoardConfig::new(rows, columns, placed);
        config.validate()?;
        Ok(Self::assemble(config, &mask))
    }

    fn assemble(config: BoardConfig, mask: &Array2<bool>) -> Self {
        let mut grid: Array2<Cell> = Array2::default(config.dim());
        let bounds = (config.rows, config.columns);

        for row in 0..config.rows {
            for col in 0..config.columns {
                if mask[(row, col).grid_index()] {
                    grid[(row, col).grid_index()].place_mine();
                    for pos in neighbors((row, col), bounds) {
                        grid[pos.grid_index()].increment_adjacent();
                    }
                }
            }
        }

        Self {
            config,
            grid,
            flagged_count: 0,
            explored_count: 0,
            state: GameState::default(),
        }
    }

    /// Replaces the board wholesale with a freshly generated game. On a
    /// configuration error the current board is left untouched.
    pub fn new_game(&mut self, config: BoardConfig, placer: impl MinePlacer) -> Result<()> {
        *self = Self::new(config, placer)?;
        Ok(())
    }

    /// Reveals a cell.
    ///
    /// Flagged cells, already-explored cells, and finished games are silent
    /// no-ops. Revealing a mine loses the game on the spot and reveals
    /// nothing else. Revealing a cell with no adjacent mines cascades
    /// through the whole zero region and its numbered rim. Revealing the
    /// last safe cell wins.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() || !self.cell(coords).state().is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        self.explore_cell(coords);

        if self.cell(coords).has_mine() {
            self.state = GameState::Lost;
            log::debug!("mine hit at {:?}", coords);
            return Ok(RevealOutcome::HitMine);
        }

        if self.cell(coords).adjacent_mines() == 0 {
            self.cascade_from(coords);
        }

        Ok(if self.explored_count == self.config.safe_cells() {
            self.finish_won();
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Toggles the flag marker on a hidden cell.
    ///
    /// Explored cells and finished games are silent no-ops, and placing is
    /// capped at the mine count; removal is always allowed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() || self.cell(coords).is_explored() {
            return Ok(FlagOutcome::NoChange);
        }

        Ok(if self.cell(coords).is_flagged() {
            self.grid[coords.grid_index()].toggle_flag();
            self.flagged_count -= 1;
            FlagOutcome::Removed
        } else if self.flagged_count < self.config.mines {
            self.grid[coords.grid_index()].toggle_flag();
            self.flagged_count += 1;
            FlagOutcome::Placed
        } else {
            FlagOutcome::NoChange
        })
    }

    pub const fn rows(&self) -> Coord {
        self.config.rows
    }

    pub const fn columns(&self) -> Coord {
        self.config.columns
    }

    pub const fn config(&self) -> BoardConfig {
        self.config
    }

    pub const fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub const fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub const fn explored_count(&self) -> CellCount {
        self.explored_count
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    pub const fn has_won(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    pub const fn has_lost(&self) -> bool {
        matches!(self.state, GameState::Lost)
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(self.validate_coords(coords)?).has_mine())
    }

    pub fn is_flagged(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(self.validate_coords(coords)?).is_flagged())
    }

    pub fn is_explored(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(self.validate_coords(coords)?).is_explored())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<u8> {
        Ok(self.cell(self.validate_coords(coords)?).adjacent_mines())
    }

    pub fn cell_state(&self, coords: Coord2) -> Result<CellState> {
        Ok(self.cell(self.validate_coords(coords)?).state())
    }

    /// Display text for one cell: `"F"` for a flag, `"X"` for an explored
    /// mine, the adjacency digit for an explored safe cell, a blank for
    /// anything still hidden.
    pub fn cell_text(&self, coords: Coord2) -> Result<&'static str> {
        Ok(text_for(self.cell(self.validate_coords(coords)?)))
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.config.rows && coords.1 < self.config.columns {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    fn cell(&self, coords: Coord2) -> Cell {
        self.grid[coords.grid_index()]
    }

    fn explore_cell(&mut self, coords: Coord2) {
        self.grid[coords.grid_index()].set_explored();
        self.explored_count += 1;
    }

    /// Flood fill of the zero region around `start` plus its numbered rim.
    ///
    /// The explored marker doubles as the visited marker, so every cell is
    /// processed at most once and the walk is bounded by the board size.
    /// Flagged cells are never entered. The cascade cannot reach a mine: it
    /// only expands from zero-adjacency cells, and a zero-adjacency cell has
    /// no mined neighbor.
    fn cascade_from(&mut self, start: Coord2) {
        let bounds = (self.config.rows, self.config.columns);
        let mut to_visit: VecDeque<Coord2> = neighbors(start, bounds).collect();

        while let Some(coords) = to_visit.pop_front() {
            if !self.cell(coords).state().is_hidden() {
                continue;
            }

            self.explore_cell(coords);
            log::trace!(
                "cascade explored {:?} with {} adjacent",
                coords,
                self.cell(coords).adjacent_mines()
            );

            if self.cell(coords).adjacent_mines() == 0 {
                to_visit.extend(
                    neighbors(coords, bounds).filter(|&pos| self.cell(pos).state().is_hidden()),
                );
            }
        }
    }

    /// Ends the game as won and flags whatever mines the player had not
    /// flagged yet, so explored plus flagged cells cover the whole board.
    fn finish_won(&mut self) {
        self.state = GameState::Won;
        for cell in self.grid.iter_mut() {
            if cell.has_mine() && !cell.is_flagged() {
                cell.toggle_flag();
                self.flagged_count += 1;
            }
        }
        log::debug!(
            "game won with {} explored and {} flagged",
            self.explored_count,
            self.flagged_count
        );
    }
}

const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];

fn text_for(cell: Cell) -> &'static str {
    match cell.state() {
        CellState::Flagged => "F",
        CellState::Explored if cell.has_mine() => "X",
        CellState::Explored => DIGITS[usize::from(cell.adjacent_mines())],
        CellState::Hidden => " ",
    }
}

impl fmt::Display for Board {
    /// Renders the player view, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.config.rows {
            for col in 0..self.config.columns {
                f.write_str(text_for(self.cell((row, col))))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: Coord, columns: Coord, mines: &[Coord2]) -> Board {
        Board::with_mines(rows, columns, mines).unwrap()
    }

    #[test]
    fn adjacency_counts_match_the_layout() {
        for seed in [0, 7, 99] {
            let board = Board::from_seed(BoardConfig::easy(), seed).unwrap();

            let mut mines: CellCount = 0;
            for row in 0..board.rows() {
                for col in 0..board.columns() {
                    if board.is_mine((row, col)).unwrap() {
                        mines += 1;
                    }
                    let expected = neighbors((row, col), (board.rows(), board.columns()))
                        .filter(|&pos| board.is_mine(pos).unwrap())
                        .count();
                    assert_eq!(
                        usize::from(board.adjacent_mine_count((row, col)).unwrap()),
                        expected,
                        "cell ({row}, {col}) with seed {seed}"
                    );
                }
            }
            assert_eq!(mines, board.mine_count());
        }
    }

    #[test]
    fn seeded_boards_are_reproducible() {
        let first = Board::from_seed(BoardConfig::easy(), 11).unwrap();
        let second = Board::from_seed(BoardConfig::easy(), 11).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn generation_rejects_invalid_configurations() {
        assert_eq!(
            Board::from_seed(BoardConfig::new(10, 10, 100), 1),
            Err(GameError::InvalidConfiguration)
        );
        assert_eq!(
            Board::from_seed(BoardConfig::new(0, 10, 5), 1),
            Err(GameError::InvalidConfiguration)
        );
    }

    #[test]
    fn fixed_layouts_are_validated() {
        assert_eq!(
            Board::with_mines(2, 2, &[(0, 5)]),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            Board::with_mines(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
            Err(GameError::InvalidConfiguration)
        );
        assert_eq!(
            Board::with_mines(0, 3, &[]),
            Err(GameError::InvalidConfiguration)
        );
    }

    #[test]
    fn duplicate_mine_coordinates_collapse() {
        let board = board(2, 2, &[(0, 0), (0, 0)]);

        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn revealing_a_safe_cell_marks_it_explored() {
        let mut board = board(2, 2, &[(0, 0)]);

        let outcome = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(board.is_explored((1, 1)).unwrap());
        assert_eq!(board.explored_count(), 1);
        assert_eq!(board.state(), GameState::InProgress);
    }

    #[test]
    fn revealing_a_mine_loses_and_reveals_nothing_else() {
        let mut board = board(1, 2, &[(0, 0)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(board.has_lost());
        assert!(board.is_explored((0, 0)).unwrap());
        assert!(!board.is_explored((0, 1)).unwrap());
        assert_eq!(board.explored_count(), 1);
    }

    #[test]
    fn revealing_the_last_safe_cell_wins() {
        let mut board = board(1, 2, &[(0, 0)]);

        let outcome = board.reveal((0, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(board.has_won());
        assert_eq!(board.explored_count(), 1);
    }

    #[test]
    fn winning_flags_the_remaining_mines() {
        let mut board = board(2, 2, &[(0, 0)]);

        assert_eq!(board.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Won);

        assert!(board.is_flagged((0, 0)).unwrap());
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(
            board.explored_count() + board.flagged_count(),
            board.total_cells()
        );
    }

    #[test]
    fn cascade_opens_the_zero_region_and_its_rim() {
        // column 2 fully mined splits the board into two regions
        let mut board = board(5, 5, &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(board.explored_count(), 10);
        for row in 0..5 {
            for col in 0..5 {
                let expected = col <= 1;
                assert_eq!(
                    board.is_explored((row, col)).unwrap(),
                    expected,
                    "cell ({row}, {col})"
                );
            }
        }
        assert_eq!(board.state(), GameState::InProgress);
    }

    #[test]
    fn cascade_skips_flagged_cells() {
        // flagging (2, 0) cuts the only zero corridor down the left edge
        let mut board = board(5, 5, &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);
        board.toggle_flag((2, 0)).unwrap();

        board.reveal((0, 0)).unwrap();

        assert!(board.is_flagged((2, 0)).unwrap());
        assert!(!board.is_explored((2, 0)).unwrap());
        assert!(!board.is_explored((3, 0)).unwrap());
        assert!(!board.is_explored((4, 0)).unwrap());
        assert_eq!(board.explored_count(), 5);
    }

    #[test]
    fn cascade_win_leaves_only_mines_unexplored() {
        let mut board = board(3, 3, &[(2, 2)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.explored_count(), 8);
        assert!(!board.is_explored((2, 2)).unwrap());
        assert!(board.is_flagged((2, 2)).unwrap());
    }

    #[test]
    fn zero_mine_board_wins_on_the_first_reveal() {
        let mut board = board(2, 2, &[]);

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.explored_count(), 4);
    }

    #[test]
    fn flagged_cells_do_not_reveal() {
        let mut board = board(2, 2, &[(0, 0)]);
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert!(!board.has_lost());
        assert_eq!(board.explored_count(), 0);
        assert_eq!(board.cell_state((0, 0)).unwrap(), CellState::Flagged);
    }

    #[test]
    fn explored_cells_cannot_be_flagged_or_re_revealed() {
        let mut board = board(2, 2, &[(0, 0)]);

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.explored_count(), 1);
    }

    #[test]
    fn flag_placement_is_capped_at_the_mine_count() {
        let mut board = board(1, 3, &[(0, 0)]);

        assert_eq!(board.toggle_flag((0, 1)).unwrap(), FlagOutcome::Placed);
        assert_eq!(board.toggle_flag((0, 2)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(board.flagged_count(), 1);

        assert_eq!(board.toggle_flag((0, 1)).unwrap(), FlagOutcome::Removed);
        assert_eq!(board.toggle_flag((0, 2)).unwrap(), FlagOutcome::Placed);
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn finished_games_ignore_further_commands() {
        let mut board = board(1, 3, &[(0, 0), (0, 2)]);

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert!(!board.is_explored((0, 2)).unwrap());

        assert_eq!(board.reveal((0, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(board.explored_count(), 1);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn bounds_are_checked_before_the_finished_game_shortcut() {
        let mut board = board(1, 2, &[(0, 0)]);
        board.reveal((0, 0)).unwrap();

        assert_eq!(board.reveal((9, 9)), Err(GameError::OutOfBounds));
        assert_eq!(board.toggle_flag((9, 9)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn out_of_bounds_is_an_error_never_a_clamp() {
        let mut board = board(2, 2, &[(0, 0)]);

        assert_eq!(board.reveal((2, 0)), Err(GameError::OutOfBounds));
        assert_eq!(board.toggle_flag((0, 2)), Err(GameError::OutOfBounds));
        assert_eq!(board.is_mine((255, 255)), Err(GameError::OutOfBounds));
        assert_eq!(board.explored_count(), 0);
    }

    #[test]
    fn new_game_replaces_the_board() {
        let mut board = board(1, 2, &[(0, 0)]);
        board.reveal((0, 0)).unwrap();
        assert!(board.has_lost());

        let err = board.new_game(BoardConfig::new(0, 0, 0), RandomMinePlacer::new(3));
        assert_eq!(err, Err(GameError::InvalidConfiguration));
        assert!(board.has_lost());

        board
            .new_game(BoardConfig::easy(), RandomMinePlacer::new(3))
            .unwrap();

        assert_eq!(board.state(), GameState::InProgress);
        assert_eq!(board.explored_count(), 0);
        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.mine_count(), 10);
        assert_eq!(board.rows(), 10);
    }

    #[test]
    fn cell_text_covers_every_face() {
        let mut board = board(1, 2, &[(0, 0)]);
        assert_eq!(board.cell_text((0, 0)).unwrap(), " ");

        board.toggle_flag((0, 0)).unwrap();
        assert_eq!(board.cell_text((0, 0)).unwrap(), "F");
        board.toggle_flag((0, 0)).unwrap();

        board.reveal((0, 1)).unwrap();
        assert_eq!(board.cell_text((0, 1)).unwrap(), "1");
        // the win flagged the mine back
        assert_eq!(board.cell_text((0, 0)).unwrap(), "F");
    }

    #[test]
    fn zero_adjacency_shows_the_zero_digit() {
        let mut board = board(1, 1, &[]);

        board.reveal((0, 0)).unwrap();

        assert_eq!(board.cell_text((0, 0)).unwrap(), "0");
    }

    #[test]
    fn exploded_mine_shows_as_x() {
        let mut board = board(1, 2, &[(0, 0)]);

        board.reveal((0, 0)).unwrap();

        assert_eq!(board.cell_text((0, 0)).unwrap(), "X");
        assert_eq!(board.cell_text((0, 1)).unwrap(), " ");
    }

    #[test]
    fn display_renders_one_line_per_row() {
        let mut board = board(2, 2, &[(0, 0)]);
        board.toggle_flag((0, 0)).unwrap();
        board.reveal((1, 1)).unwrap();

        assert_eq!(board.to_string(), "F \n 1\n");
    }
}
