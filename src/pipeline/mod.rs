//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for generation stages that can be
//! composed and run in dependency order over a [`Terrain`](crate::Terrain).

mod stage;

pub use stage::{
    DisplacementStage, GenerationStage, NormalStage, Pipeline, PipelineError, StageId,
};
