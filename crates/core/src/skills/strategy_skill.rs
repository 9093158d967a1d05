//! # Strategy Skill
//!
//! The CEO turns a concept into a vision and an ordered set of KPIs.

use crate::models::ModelConfig;
use crate::run_llm_function;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::concept_skill::Concept;
use super::prompts::STRATEGY;

/// Strategic output of the CEO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct Decision {
    pub vision: String,
    /// Ordered KPI statements
    #[serde(default)]
    pub kpis: Vec<String>,
}

pub struct StrategySkill;

impl StrategySkill {
    pub async fn run(concept: &Concept, config: &ModelConfig) -> anyhow::Result<Decision> {
        run_llm_function!("CEO decision", config, Decision, STRATEGY, Self::request(concept))
    }

    fn request(concept: &Concept) -> String {
        format!(
            "We are building a Micro-SaaS: \"{}\".\nSector: {}\nOpportunity: {}\nProject: {}",
            concept.trend, concept.sector, concept.opportunity, concept.project_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_concept() {
        let request = StrategySkill::request(&Concept::fallback());
        assert!(request.contains("audio-viz-generator"));
        assert!(request.contains("Creative Tools"));
    }

    #[test]
    fn test_decision_tolerates_missing_kpis() {
        let decision: Decision = serde_json::from_str(r#"{"vision":"Own the niche"}"#).unwrap();
        assert!(decision.kpis.is_empty());
    }
}
