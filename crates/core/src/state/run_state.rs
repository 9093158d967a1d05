//! # Run State
//!
//! Everything a single run owns: concept, decision, tasks, log, usage.
//! The coordinator holds the only `RunContext`; observers get a cloned
//! [`RunSnapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskStatus};
use crate::error::TaskTransitionError;
use crate::skills::{Concept, Decision};
use crate::swarm::events::LogEntry;
use crate::swarm::pipeline::PipelineStage;
use crate::swarm::usage::UsageStats;

/// Where the run's concept came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConceptSource {
    Generated,
    Fallback,
}

/// Mutable per-run state
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub concept: Option<Concept>,
    pub concept_source: Option<ConceptSource>,
    pub decision: Option<Decision>,
    pub tasks: Vec<Task>,
    pub usage: UsageStats,
    pub failure: Option<String>,
    log: Vec<LogEntry>,
    /// Indices into `tasks`, in the order they completed
    completion_order: Vec<usize>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            concept: None,
            concept_source: None,
            decision: None,
            tasks: Vec::new(),
            usage: UsageStats::default(),
            failure: None,
            log: Vec::new(),
            completion_order: Vec::new(),
        }
    }

    /// Append to the run log
    pub fn append(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn complete_task(&mut self, index: usize, output: String) -> Result<(), TaskTransitionError> {
        self.tasks[index].complete(output)?;
        self.completion_order.push(index);
        Ok(())
    }

    pub fn fail_task(&mut self, index: usize, message: String) -> Result<(), TaskTransitionError> {
        self.tasks[index].fail(message)
    }

    /// Completed tasks in completion order (not schedule order)
    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.completion_order
            .iter()
            .map(|&i| &self.tasks[i])
            .collect()
    }

    pub fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn snapshot(&self, stage: PipelineStage) -> RunSnapshot {
        RunSnapshot {
            run_id: self.run_id.clone(),
            started_at: self.started_at,
            stage,
            concept: self.concept.clone(),
            concept_source: self.concept_source,
            decision: self.decision.clone(),
            tasks: self.tasks.clone(),
            log: self.log.clone(),
            usage: self.usage,
            failure: self.failure.clone(),
        }
    }
}

/// Read-only view of a run for external observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub stage: PipelineStage,
    pub concept: Option<Concept>,
    pub concept_source: Option<ConceptSource>,
    pub decision: Option<Decision>,
    pub tasks: Vec<Task>,
    pub log: Vec<LogEntry>,
    pub usage: UsageStats,
    pub failure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_tasks() -> RunContext {
        let mut ctx = RunContext::new();
        ctx.tasks = vec![
            Task::new("a", "First", "arch-01", 2, 0),
            Task::new("b", "Second", "builder-be", 3, 2),
            Task::new("c", "Third", "doc-01", 2, 5),
        ];
        ctx
    }

    #[test]
    fn test_completed_tasks_follow_completion_order() {
        let mut ctx = context_with_tasks();
        ctx.tasks[2].start().unwrap();
        ctx.complete_task(2, "docs".to_string()).unwrap();
        ctx.tasks[0].start().unwrap();
        ctx.complete_task(0, "arch".to_string()).unwrap();

        let ids: Vec<_> = ctx.completed_tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_failed_tasks_are_not_completed() {
        let mut ctx = context_with_tasks();
        ctx.tasks[1].start().unwrap();
        ctx.fail_task(1, "Error: nope".to_string()).unwrap();

        assert!(ctx.completed_tasks().is_empty());
        assert_eq!(ctx.count_status(TaskStatus::Failed), 1);
        assert_eq!(ctx.count_status(TaskStatus::Pending), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ctx = context_with_tasks();
        let snap = ctx.snapshot(PipelineStage::Executing);
        ctx.tasks[0].start().unwrap();

        assert_eq!(snap.tasks[0].status, TaskStatus::Pending);
        assert_eq!(snap.stage, PipelineStage::Executing);
        assert_eq!(snap.run_id, ctx.run_id);
    }
}
