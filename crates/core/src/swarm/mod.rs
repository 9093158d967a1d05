//! # Swarm Orchestration
//!
//! Coordinates the agent pipeline for Legion.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Concept Scout → CEO Decision → Taskmaster Plan → Workers (sequential) → Finished
//! ```

pub mod context_window;
pub mod coordinator;
pub mod events;
pub mod executor;
pub mod pipeline;
pub mod scheduler;
pub mod usage;

pub use coordinator::{Coordinator, PipelineConfig, RunReport, UnknownAgentPolicy};
pub use events::{LogEntry, LogKind, RunEvent};
pub use executor::{AgentTaskExecutor, RetryPolicy};
pub use pipeline::{Pipeline, PipelineStage};
pub use scheduler::TaskScheduler;
pub use usage::{UsageMeter, UsageStats};
