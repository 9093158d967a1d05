//! # Task State
//!
//! A planned unit of work and its one-directional status lifecycle:
//! `pending → in_progress → {completed | failed}`.

use serde::{Deserialize, Serialize};

use crate::error::TaskTransitionError;

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A scheduled task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique task identifier
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Roster id of the agent doing the work
    pub assigned_agent_id: String,
    /// Current lifecycle status
    pub status: TaskStatus,
    /// Deliverable (or error message), set on a terminal transition
    #[serde(default)]
    pub output: Option<String>,
    /// Simulated effort units (>= 1)
    pub duration: u32,
    /// Simulated start time, fixed once scheduled
    pub start_offset: u32,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        assigned_agent_id: impl Into<String>,
        duration: u32,
        start_offset: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            assigned_agent_id: assigned_agent_id.into(),
            status: TaskStatus::Pending,
            output: None,
            duration: duration.max(1),
            start_offset,
        }
    }

    /// End of this task's slot in the schedule
    pub fn end_offset(&self) -> u32 {
        self.start_offset + self.duration
    }

    /// `pending → in_progress`
    pub fn start(&mut self) -> Result<(), TaskTransitionError> {
        self.transition(TaskStatus::Pending, TaskStatus::InProgress)
    }

    /// `in_progress → completed`
    pub fn complete(&mut self, output: String) -> Result<(), TaskTransitionError> {
        self.transition(TaskStatus::InProgress, TaskStatus::Completed)?;
        self.output = Some(output);
        Ok(())
    }

    /// `in_progress → failed`
    pub fn fail(&mut self, message: String) -> Result<(), TaskTransitionError> {
        self.transition(TaskStatus::InProgress, TaskStatus::Failed)?;
        self.output = Some(message);
        Ok(())
    }

    fn transition(&mut self, from: TaskStatus, to: TaskStatus) -> Result<(), TaskTransitionError> {
        if self.status != from {
            return Err(TaskTransitionError {
                task_id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
