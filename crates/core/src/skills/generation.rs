//! # Generation Service
//!
//! The pipeline's only contract with the text-generation backend. The
//! coordinator and executor see an opaque, fallible async interface;
//! [`LlmGenerationService`] backs it with the radkit skills.

use async_trait::async_trait;

use super::builder_skill::BuilderSkill;
use super::concept_skill::{Concept, ConceptSkill};
use super::strategy_skill::{Decision, StrategySkill};
use super::taskmaster_skill::{RawTask, TaskmasterSkill};
use crate::models::ModelConfig;
use crate::swarm::PipelineConfig;

/// Model slot keys accepted in `PipelineConfig::per_agent_models`
pub const SLOT_CONCEPT: &str = "concept";
pub const SLOT_STRATEGY: &str = "ceo-01";
pub const SLOT_TASKMASTER: &str = "pm-01";
pub const SLOT_BUILDER: &str = "builder";

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_concept(&self) -> anyhow::Result<Concept>;

    async fn generate_decision(&self, concept: &Concept) -> anyhow::Result<Decision>;

    /// `roster` is the `id (specialty)` listing of assignable agents
    async fn generate_plan(&self, decision: &Decision, roster: &str) -> anyhow::Result<Vec<RawTask>>;

    async fn generate_task_output(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Generation backed by LLM providers, one model per phase
#[derive(Debug, Clone)]
pub struct LlmGenerationService {
    concept: ModelConfig,
    strategy: ModelConfig,
    taskmaster: ModelConfig,
    builder: ModelConfig,
}

impl LlmGenerationService {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            concept: config.model_for(SLOT_CONCEPT),
            strategy: config.model_for(SLOT_STRATEGY),
            taskmaster: config.model_for(SLOT_TASKMASTER),
            builder: config.model_for(SLOT_BUILDER),
        }
    }
}

#[async_trait]
impl GenerationService for LlmGenerationService {
    async fn generate_concept(&self) -> anyhow::Result<Concept> {
        ConceptSkill::run(&self.concept).await
    }

    async fn generate_decision(&self, concept: &Concept) -> anyhow::Result<Decision> {
        StrategySkill::run(concept, &self.strategy).await
    }

    async fn generate_plan(&self, decision: &Decision, roster: &str) -> anyhow::Result<Vec<RawTask>> {
        TaskmasterSkill::run(decision, roster, &self.taskmaster).await
    }

    async fn generate_task_output(&self, prompt: &str) -> anyhow::Result<String> {
        BuilderSkill::run(prompt, &self.builder).await
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted generation double for pipeline tests.

    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    pub struct ScriptedGeneration {
        pub concept_fails: bool,
        pub decision_fails: bool,
        pub plan_fails: bool,
        pub plan: Vec<RawTask>,
        /// Task titles whose every attempt fails
        pub failing_titles: HashSet<String>,
        /// Task titles that fail this many times before succeeding
        pub flaky_titles: HashMap<String, usize>,
        /// Task titles that answer with an empty string
        pub empty_titles: HashSet<String>,
        /// Fire `cancel` while producing this task's output
        pub cancel_during: Option<String>,
        pub cancel: CancellationToken,
        pub concept_calls: AtomicUsize,
        pub decision_calls: AtomicUsize,
        pub plan_calls: AtomicUsize,
        pub task_calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGeneration {
        pub fn with_plan(pairs: &[(&str, &str)]) -> Self {
            Self {
                plan: pairs
                    .iter()
                    .map(|(title, agent)| RawTask {
                        title: title.to_string(),
                        assigned_agent_id: agent.to_string(),
                    })
                    .collect(),
                ..Self::default()
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        fn title_in(prompt: &str) -> String {
            prompt
                .lines()
                .find_map(|l| l.strip_prefix("Current Task: "))
                .unwrap_or_default()
                .to_string()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedGeneration {
        async fn generate_concept(&self) -> anyhow::Result<Concept> {
            self.concept_calls.fetch_add(1, Ordering::SeqCst);
            if self.concept_fails {
                anyhow::bail!("trend service unavailable");
            }
            Ok(Concept {
                trend: "AI clip cutter for TikTok".to_string(),
                sector: "Creator Tools".to_string(),
                opportunity: "Short-form video is booming".to_string(),
                project_name: "clip-cutter".to_string(),
            })
        }

        async fn generate_decision(&self, concept: &Concept) -> anyhow::Result<Decision> {
            self.decision_calls.fetch_add(1, Ordering::SeqCst);
            if self.decision_fails {
                anyhow::bail!("strategy model overloaded");
            }
            Ok(Decision {
                vision: format!("Dominate {}", concept.sector),
                kpis: vec!["MVP in 2 weeks".to_string(), "1k users".to_string()],
            })
        }

        async fn generate_plan(&self, _decision: &Decision, _roster: &str) -> anyhow::Result<Vec<RawTask>> {
            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            if self.plan_fails {
                anyhow::bail!("plan was not valid JSON");
            }
            Ok(self.plan.clone())
        }

        async fn generate_task_output(&self, prompt: &str) -> anyhow::Result<String> {
            let call = self.task_calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            let title = Self::title_in(prompt);

            if self.cancel_during.as_deref() == Some(title.as_str()) {
                self.cancel.cancel();
            }
            if self.failing_titles.contains(&title) {
                anyhow::bail!("generation failed for '{}'", title);
            }
            if self.empty_titles.contains(&title) {
                return Ok("   ".to_string());
            }
            if let Some(failures) = self.flaky_titles.get(&title) {
                let seen = self
                    .prompts
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|p| Self::title_in(p) == title)
                    .count();
                if seen <= *failures {
                    anyhow::bail!("transient failure #{} for '{}'", seen, title);
                }
            }
            Ok(format!(
                "### {}.md\n```markdown\ndeliverable {} for {}\n```",
                title.replace(' ', "_"),
                call,
                title
            ))
        }
    }
}
