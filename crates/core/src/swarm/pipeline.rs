//! # Pipeline Stages
//!
//! Defines the stages of a run and the legal moves between them.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Ready for a run
    #[default]
    Idle,
    /// Generating the project concept
    DiscoveringConcept,
    /// CEO turning the concept into a vision and KPIs
    DecidingStrategy,
    /// Taskmaster expanding the decision into a plan
    Planning,
    /// Workers running tasks one at a time
    Executing,
    /// Complete
    Finished,
    /// Aborted by a fatal phase error or cancellation
    Failed,
}

/// The pipeline state machine
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Current stage
    pub stage: PipelineStage,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// A new run may only start when nothing is in flight
    pub fn accepts_new_run(&self) -> bool {
        matches!(
            self.stage,
            PipelineStage::Idle | PipelineStage::Finished | PipelineStage::Failed
        )
    }

    /// Enter the first phase of a new run
    pub fn begin(&mut self) -> Result<(), PipelineError> {
        if !self.accepts_new_run() {
            return Err(PipelineError::RunInProgress(self.stage));
        }
        self.stage = PipelineStage::DiscoveringConcept;
        Ok(())
    }

    /// Advance to the next stage
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            PipelineStage::Idle => PipelineStage::DiscoveringConcept,
            PipelineStage::DiscoveringConcept => PipelineStage::DecidingStrategy,
            PipelineStage::DecidingStrategy => PipelineStage::Planning,
            PipelineStage::Planning => PipelineStage::Executing,
            PipelineStage::Executing => PipelineStage::Finished,
            PipelineStage::Finished => PipelineStage::Finished,
            PipelineStage::Failed => PipelineStage::Failed,
        };
    }

    /// Fail the pipeline
    pub fn fail(&mut self) {
        self.stage = PipelineStage::Failed;
    }

    /// Check if pipeline is complete
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, PipelineStage::Finished | PipelineStage::Failed)
    }

    /// Check if pipeline succeeded
    pub fn is_success(&self) -> bool {
        self.stage == PipelineStage::Finished
    }
}
