//! Grid coordinates and device extents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer coordinate in the switch-block grid.
///
/// `x` grows left to right, `y` grows bottom to top.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Coord {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The inclusive extent `[0, nx] × [0, ny]` of the switch-block grid.
///
/// A fabric of `nx × ny` logic tiles has `(nx + 1) × (ny + 1)` switch blocks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct GridRange {
    /// Largest valid `x`.
    pub nx: usize,
    /// Largest valid `y`.
    pub ny: usize,
}

impl GridRange {
    /// Creates the range for an `nx × ny` fabric.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// Returns whether `coord` lies inside the range.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x <= self.nx && coord.y <= self.ny
    }

    /// Number of columns, `nx + 1`.
    pub fn width(&self) -> usize {
        self.nx + 1
    }

    /// Number of rows, `ny + 1`.
    pub fn height(&self) -> usize {
        self.ny + 1
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Always `false`: a range has at least the origin.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat index of `coord` in scan order (column by column).
    pub fn index_of(&self, coord: Coord) -> usize {
        coord.x * self.height() + coord.y
    }

    /// Iterates every coordinate in raster scan order: `x` outer, `y` inner.
    pub fn scan(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..=self.nx).flat_map(move |x| (0..=self.ny).map(move |y| Coord::new(x, y)))
    }

    /// Returns whether `coord` is one of the four corners.
    pub fn is_corner(&self, coord: Coord) -> bool {
        (coord.x == 0 || coord.x == self.nx) && (coord.y == 0 || coord.y == self.ny)
    }
}
