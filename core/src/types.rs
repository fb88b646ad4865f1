use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis used for grid rows, columns, and positions.
pub type Coord = u8;

/// Count type used for path labels and total-cell counts.
pub type Label = u16;

/// Milliseconds, used for both timestamps and durations.
pub type Millis = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

pub const fn mult(a: Coord, b: Coord) -> Label {
    let a = a as Label;
    let b = b as Label;
    a.saturating_mul(b)
}

/// Grid position, `row` grows downwards and `col` to the right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Whether `other` shares an edge with this cell.
    pub const fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) as u16 + self.col.abs_diff(other.col) as u16 == 1
    }

    pub fn chebyshev_distance(self, other: Cell) -> Coord {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl ToNdIndex for Cell {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.col.into()]
    }
}

/// A move intent, only the four cardinal directions exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Base order the generator shuffles from.
    pub const ALL: [Direction; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

    /// `(row, col)` unit offset.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Fixed rectangular grid with 4-directional adjacency.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    pub rows: Coord,
    pub cols: Coord,
}

impl GridTopology {
    pub const fn new_unchecked(rows: Coord, cols: Coord) -> Self {
        Self { rows, cols }
    }

    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidTopology);
        }
        Ok(Self::new_unchecked(rows, cols))
    }

    /// Grows a degenerate grid until it holds at least two cells.
    pub const fn playable(self) -> Self {
        let rows = if self.rows == 0 { 1 } else { self.rows };
        let cols = match (rows, self.cols) {
            (1, 0 | 1) => 2,
            (_, 0) => 1,
            (_, cols) => cols,
        };
        Self::new_unchecked(rows, cols)
    }

    pub const fn total_cells(&self) -> Label {
        mult(self.rows, self.cols)
    }

    pub const fn dim(&self) -> [usize; 2] {
        [self.rows as usize, self.cols as usize]
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// The neighbor of `cell` in `direction`, `None` when it falls off the grid.
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        apply_delta(cell, direction.delta(), *self)
    }

    /// Cells within Chebyshev distance `radius` of `center`, the center included.
    pub fn neighborhood(&self, center: Cell, radius: Coord) -> NeighborhoodIter {
        NeighborhoodIter::new(center, radius, *self)
    }
}

/// Applies `delta` to `cell`, returning a value only when it remains in bounds.
fn apply_delta(cell: Cell, delta: (isize, isize), bounds: GridTopology) -> Option<Cell> {
    let (dr, dc) = delta;

    let row = cell.row.checked_add_signed(dr.try_into().ok()?)?;
    if row >= bounds.rows {
        return None;
    }

    let col = cell.col.checked_add_signed(dc.try_into().ok()?)?;
    if col >= bounds.cols {
        return None;
    }

    Some(Cell::new(row, col))
}

#[derive(Debug)]
pub struct NeighborhoodIter {
    center: Cell,
    bounds: GridTopology,
    radius: isize,
    index: usize,
}

impl NeighborhoodIter {
    fn new(center: Cell, radius: Coord, bounds: GridTopology) -> Self {
        Self {
            center,
            bounds,
            radius: radius.into(),
            index: 0,
        }
    }

    fn side(&self) -> usize {
        (2 * self.radius + 1) as usize
    }
}

impl Iterator for NeighborhoodIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        let side = self.side();
        loop {
            if self.index >= side * side {
                return None;
            }

            let dr = (self.index / side) as isize - self.radius;
            let dc = (self.index % side) as isize - self.radius;
            self.index += 1;

            let next_item = apply_delta(self.center, (dr, dc), self.bounds);
            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
