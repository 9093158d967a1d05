//! # Concept Skill
//!
//! First phase of a run: proposes the product concept the studio will
//! build. Failures are recovered by the coordinator with
//! [`Concept::fallback`].

use crate::models::ModelConfig;
use crate::run_llm_function;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::prompts::CONCEPT;

/// A generated project idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct Concept {
    /// The core concept
    pub trend: String,
    /// Specific niche
    pub sector: String,
    /// Why this makes money now
    pub opportunity: String,
    /// Kebab-case repository name
    pub project_name: String,
}

impl Concept {
    /// Substituted when concept generation fails
    pub fn fallback() -> Self {
        Self {
            trend: "Music visualizer generator built with p5.js".to_string(),
            sector: "Creative Tools".to_string(),
            opportunity: "Helps artists ship YouTube/TikTok content faster".to_string(),
            project_name: "audio-viz-generator".to_string(),
        }
    }
}

pub struct ConceptSkill;

impl ConceptSkill {
    /// SDK-style call for direct Coordinator integration.
    pub async fn run(config: &ModelConfig) -> anyhow::Result<Concept> {
        run_llm_function!(
            "Concept scout",
            config,
            Concept,
            CONCEPT,
            "Propose today's most promising product concept."
        )
    }
}
