//! # Run Events
//!
//! The log entries a run appends and the events it streams to observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pipeline::PipelineStage;
use super::usage::UsageStats;
use crate::roster::{AgentProfile, AgentRole};
use crate::skills::{Concept, Decision};
use crate::state::{ConceptSource, Task};

/// Severity/category of a log entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Success,
    Error,
    Thinking,
}

/// An append-only record in the run log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// Unique entry ID
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Display name of the emitting agent ("SYSTEM" for the pipeline itself)
    pub agent_name: String,
    pub role: AgentRole,
    pub message: String,
    pub kind: LogKind,
    /// Long-form detail (previews, error causes, artifact purpose)
    #[serde(default)]
    pub details: Option<String>,
}

impl LogEntry {
    pub fn new(agent_name: &str, role: AgentRole, message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            agent_name: agent_name.to_string(),
            role,
            message: message.into(),
            kind,
            details: None,
        }
    }

    /// Entry emitted by the pipeline rather than an agent
    pub fn system(message: impl Into<String>, kind: LogKind) -> Self {
        Self::new("SYSTEM", AgentRole::Worker, message, kind)
    }

    /// Entry emitted on behalf of a roster agent
    pub fn agent(agent: &AgentProfile, message: impl Into<String>, kind: LogKind) -> Self {
        Self::new(agent.name, agent.role, message, kind)
    }

    /// Add details to the entry
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Event streamed after each phase and each task transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    StageChanged { run_id: String, stage: PipelineStage },
    ConceptReady { concept: Concept, source: ConceptSource },
    DecisionReady { decision: Decision },
    Log { entry: LogEntry },
    PlanReady { tasks: Vec<Task> },
    TaskUpdated { task: Task },
    UsageUpdated { usage: UsageStats },
    /// Fatal error, sent just before the `failed` stage change
    RunFailed { failure: String },
}
