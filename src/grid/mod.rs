//! Heightfield grid storage.
//!
//! Provides the flat, row-major vertex arena that every generation pass reads
//! from and writes to, addressed by integer `(row, col)` coordinates.

mod coord;
mod heightfield;
mod vertex;

pub use coord::GridCoord;
pub use heightfield::{Grid, GridError};
pub use vertex::Vertex;
