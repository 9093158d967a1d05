//! # Builder Skill
//!
//! Runs one composed task request and returns the agent's Markdown
//! deliverable. Retries live in `swarm::executor`, not here.

use crate::models::ModelConfig;
use crate::run_llm_function;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::prompts::BUILDER;

/// The deliverable of a single task
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct TaskDeliverable {
    /// Markdown body, files as `### name` + fenced block
    pub content: String,
}

pub struct BuilderSkill;

impl BuilderSkill {
    pub async fn run(request: &str, config: &ModelConfig) -> anyhow::Result<String> {
        let deliverable = run_llm_function!("Builder", config, TaskDeliverable, BUILDER, request)?;
        Ok(deliverable.content)
    }
}
