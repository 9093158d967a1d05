//! # Legion Core
//!
//! The "Brain" of the Legion system - the orchestration and execution
//! pipeline that turns a generated concept into a strategy, a waterfall
//! plan, and a sequence of agent deliverables.
//!
//! ## Architecture
//!
//! - `roster` - Static agent profiles (C-suite + worker army)
//! - `models` - Centralized LLM provider configuration
//! - `skills` - Generation skills (concept, strategy, taskmaster, builder) and prompts
//! - `state` - Task records and the per-run context
//! - `swarm` - Pipeline state machine, scheduler, executor, usage meter
//! - `tools` - Pure helpers over task output (artifact extraction, reports)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use legion_core::skills::LlmGenerationService;
//! use legion_core::swarm::{Coordinator, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let generator = Arc::new(LlmGenerationService::new(&config));
//! let mut coordinator = Coordinator::new(config, generator);
//! let report = coordinator.start_run().await?;
//! ```

pub mod error;
pub mod models;
pub mod roster;
pub mod skills;
pub mod state;
pub mod swarm;
pub mod tools;

pub use error::{ConceptGenerationError, ExecutionError, PipelineError, TaskTransitionError};
