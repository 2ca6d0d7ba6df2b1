use crate::*;
use ndarray::Array2;

/// Source of mine positions for a fresh board.
pub trait MinePlacer {
    /// Produces the mine mask for `config`: exactly `config.mines` cells set,
    /// all in bounds. Callers validate the configuration first.
    fn place_mines(self, config: BoardConfig) -> Array2<bool>;
}

/// Uniform placement without replacement, driven by an explicit seed so the
/// same seed always yields the same layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place_mines(self, config: BoardConfig) -> Array2<bool> {
        use rand::prelude::*;

        let mut mask: Array2<bool> = Array2::default(config.dim());
        let columns = usize::from(config.columns);

        // partial shuffle, no rejection loop even on nearly full boards
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let picks = rand::seq::index::sample(
            &mut rng,
            usize::from(config.total_cells()),
            usize::from(config.mines),
        );
        for pick in picks {
            let coords = ((pick / columns) as Coord, (pick % columns) as Coord);
            mask[coords.grid_index()] = true;
        }

        log::debug!(
            "placed {} mines on {}x{} (seed {})",
            config.mines,
            config.rows,
            config.columns,
            self.seed
        );
        mask
    }
}
