//! # Taskmaster Skill
//!
//! Expands the CEO's decision into an ordered plan of raw tasks, each
//! assigned to a roster agent. Scheduling happens afterwards in
//! `swarm::scheduler`.

use crate::models::ModelConfig;
use crate::run_llm_function;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::prompts::TASKMASTER;
use super::strategy_skill::Decision;

/// A planned task before scheduling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct RawTask {
    pub title: String,
    /// Roster id of the agent that should do the work
    pub assigned_agent_id: String,
}

/// The plan output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct PlanOutput {
    pub tasks: Vec<RawTask>,
}

pub struct TaskmasterSkill;

impl TaskmasterSkill {
    pub async fn run(
        decision: &Decision,
        roster: &str,
        config: &ModelConfig,
    ) -> anyhow::Result<Vec<RawTask>> {
        let output = run_llm_function!(
            "Taskmaster",
            config,
            PlanOutput,
            TASKMASTER,
            Self::request(decision, roster)
        )?;
        Ok(output.tasks)
    }

    fn request(decision: &Decision, roster: &str) -> String {
        let kpis = decision
            .kpis
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{}. {}", i + 1, k))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Goal: Build \"{}\"\n\nKPIs:\n{}\n\nAgents: {}",
            decision.vision, kpis, roster
        )
    }
}
