//! Renderable mesh packaging.
//!
//! A [`Mesh`] is the frozen output of generation: interleaved position/normal
//! vertices plus a triangle-list index buffer, ready to hand to a
//! [`RenderBackend`].

mod backend;
mod buffer;

pub use backend::RenderBackend;
pub use buffer::{Mesh, MeshError, MeshVertex};
