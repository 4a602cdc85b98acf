//! Logical grid coordinates.

use serde::{Deserialize, Serialize};

/// Integer `(row, col)` address of a grid vertex.
///
/// `row` advances along world X, `col` along world Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Index along X.
    pub row: usize,
    /// Index along Z.
    pub col: usize,
}

impl GridCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Integer midpoint of two coordinates (rounds toward `self` on odd spans).
    pub const fn midpoint(self, other: GridCoord) -> GridCoord {
        GridCoord {
            row: (self.row + other.row) / 2,
            col: (self.col + other.col) / 2,
        }
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
