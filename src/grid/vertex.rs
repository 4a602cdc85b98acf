//! Per-cell vertex data.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single grid vertex.
///
/// Once `finalized` is set, `position` must not change for the rest of
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// World-space position. Only `y` changes during displacement.
    pub position: Vec3,
    /// Unit surface normal (zero until normals are estimated).
    pub normal: Vec3,
    /// Whether the height of this vertex has been committed.
    pub finalized: bool,
}

impl Vertex {
    /// Creates an undisplaced vertex at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
            finalized: false,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
