/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

pub trait GridIndex {
    type Output;
    fn grid_index(self) -> Self::Output;
}

impl GridIndex for Coord2 {
    type Output = [usize; 2];

    fn grid_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Iterates over the up-to-8 in-bounds neighbors of `coords`.
///
/// `bounds` is the exclusive `(rows, columns)` limit. Diagonals count as
/// neighbors, nothing wraps, and `coords` itself is never yielded.
pub fn neighbors(coords: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (row, col) = (i32::from(coords.0), i32::from(coords.1));
    let (rows, cols) = (i32::from(bounds.0), i32::from(bounds.1));

    (-1..=1)
        .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(move |(dr, dc)| {
            let (nr, nc) = (row + dr, col + dc);
            (nr >= 0 && nr < rows && nc >= 0 && nc < cols)
                .then_some((nr as Coord, nc as Coord))
        })
}
