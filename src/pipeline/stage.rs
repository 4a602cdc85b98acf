//! Generation stage trait and pipeline orchestration.

use thiserror::Error;
use tracing::debug;

use crate::terrain::Terrain;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Diamond-square height displacement.
    Displacement,
    /// Per-vertex normal estimation.
    Normals,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Displacement => "displacement",
            StageId::Normals => "normals",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the terrain grid in place, building upon previous
/// stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the terrain in place.
    fn execute(&self, terrain: &mut Terrain) -> Result<(), PipelineError>;
}

/// Orchestrates generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Displacement followed by normal estimation.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(DisplacementStage).add_stage(NormalStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given terrain.
    pub fn run(&self, terrain: &mut Terrain) -> Result<(), PipelineError> {
        self.run_with_callbacks(terrain, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        terrain: &mut Terrain,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(terrain)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Diamond-square displacement of every grid vertex.
pub struct DisplacementStage;

impl GenerationStage for DisplacementStage {
    fn id(&self) -> StageId {
        StageId::Displacement
    }

    fn name(&self) -> &str {
        "Diamond-Square Displacement"
    }

    fn execute(&self, terrain: &mut Terrain) -> Result<(), PipelineError> {
        let stats = terrain.displace();
        if !terrain.is_displaced() {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "grid has vertices without a committed height".to_string(),
            ));
        }
        debug!(samples = stats.samples_drawn, "displacement stage done");
        Ok(())
    }
}

/// Normal estimation over the displaced grid.
pub struct NormalStage;

impl GenerationStage for NormalStage {
    fn id(&self) -> StageId {
        StageId::Normals
    }

    fn name(&self) -> &str {
        "Normal Estimation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Displacement]
    }

    fn execute(&self, terrain: &mut Terrain) -> Result<(), PipelineError> {
        terrain.compute_normals();
        Ok(())
    }
}
