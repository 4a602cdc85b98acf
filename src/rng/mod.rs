//! Seeded random sources for terrain synthesis.
//!
//! All randomness flows through an explicit [`GaussianSource`] owned by the
//! terrain being generated, so identical seeds reproduce identical terrain.

mod gaussian;

pub use gaussian::GaussianSource;
