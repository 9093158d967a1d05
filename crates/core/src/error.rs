//! # Pipeline Errors
//!
//! Typed failures for each layer of the pipeline. Concept failures are
//! recovered with a fallback, task failures are recovered per task, and
//! everything in [`PipelineError`] ends the run.

use thiserror::Error;

use crate::state::TaskStatus;
use crate::swarm::PipelineStage;

/// The concept generation call failed; the coordinator substitutes a fallback.
#[derive(Debug, Error)]
#[error("concept generation failed: {0:#}")]
pub struct ConceptGenerationError(#[source] pub anyhow::Error);

/// Every attempt of a task execution failed.
#[derive(Debug, Error)]
#[error("Execution failed after {attempts} attempts: {source:#}")]
pub struct ExecutionError {
    /// Number of generation calls that were actually made
    pub attempts: u32,
    /// The last underlying cause
    #[source]
    pub source: anyhow::Error,
}

/// Illegal task status change (status only moves forward).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("task '{task_id}' cannot move from {from:?} to {to:?}")]
pub struct TaskTransitionError {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Fatal run failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `start_run` called while a run is mid-flight
    #[error("a run is already in progress (stage: {0:?})")]
    RunInProgress(PipelineStage),

    #[error("strategic decision failed: {0:#}")]
    Decision(#[source] anyhow::Error),

    #[error("task planning failed: {0:#}")]
    Plan(#[source] anyhow::Error),

    /// The plan references an agent that is not on the roster
    #[error("task '{task_title}' is assigned to unknown agent '{agent_id}'")]
    UnknownAgent { task_title: String, agent_id: String },

    #[error(transparent)]
    Transition(#[from] TaskTransitionError),

    #[error("run cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message_states_attempts() {
        let err = ExecutionError {
            attempts: 3,
            source: anyhow::anyhow!("quota exceeded"),
        };
        assert_eq!(
            err.to_string(),
            "Execution failed after 3 attempts: quota exceeded"
        );
    }

    #[test]
    fn test_unknown_agent_message() {
        let err = PipelineError::UnknownAgent {
            task_title: "Write docs".to_string(),
            agent_id: "ghost".to_string(),
        };
        assert!(err.to_string().contains("ghost"));
        assert!(err.to_string().contains("Write docs"));
    }
}
