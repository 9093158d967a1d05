//! # Legion Skills
//!
//! Generation skills for each phase of a run, plus the
//! [`GenerationService`] seam the pipeline talks to.
//!
//! ## Skills
//!
//! - `ConceptSkill` - Propose a product concept
//! - `StrategySkill` - CEO vision and KPIs
//! - `TaskmasterSkill` - Waterfall plan of agent assignments
//! - `BuilderSkill` - Execute one task request

pub mod llm_helpers;
pub mod prompts;

pub mod builder_skill;
pub mod concept_skill;
pub mod generation;
pub mod strategy_skill;
pub mod taskmaster_skill;

pub use builder_skill::{BuilderSkill, TaskDeliverable};
pub use concept_skill::{Concept, ConceptSkill};
pub use generation::{GenerationService, LlmGenerationService};
pub use strategy_skill::{Decision, StrategySkill};
pub use taskmaster_skill::{PlanOutput, RawTask, TaskmasterSkill};
