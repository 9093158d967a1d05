//! # Swarm Coordinator
//!
//! Drives a run end to end: concept → decision → plan → sequential
//! execution → finished. Owns the [`RunContext`] exclusively and streams
//! [`RunEvent`]s to observers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::context_window::{truncate_chars, DEFAULT_EXCERPT_CHARS};
use super::events::{LogEntry, LogKind, RunEvent};
use super::executor::{AgentTaskExecutor, RetryPolicy};
use super::pipeline::{Pipeline, PipelineStage};
use super::scheduler::{self, TaskScheduler, DEFAULT_MAX_DURATION, DEFAULT_MIN_DURATION};
use super::usage::{UsageMeter, DEFAULT_UNIT_PRICE_PER_MILLION};
use crate::error::{ConceptGenerationError, PipelineError};
use crate::models::{LlmProvider, ModelConfig};
use crate::roster::{self, artifact_purpose, find_agent, roster_listing};
use crate::skills::{Concept, Decision, GenerationService};
use crate::state::{ConceptSource, RunContext, RunSnapshot, TaskStatus};

/// What to do with a planned task whose agent is not on the roster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAgentPolicy {
    /// Fail the run at planning, before anything executes
    #[default]
    Reject,
    /// Leave the task pending, with no log entry
    Skip,
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Global LLM provider (default: Gemini)
    pub global_provider: LlmProvider,
    /// Global model to use for all phases
    pub global_model: Option<String>,
    /// Base URL override for LLM API (for OpenAI-compatible endpoints)
    pub base_url: Option<String>,
    /// Per-slot model overrides (slot -> model name)
    pub per_agent_models: HashMap<String, String>,
    /// Generation calls per task, including the first
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Pause after each task; 0 disables it
    pub task_pacing_ms: u64,
    pub context_excerpt_chars: usize,
    pub unit_price_per_million: f64,
    pub min_duration: u32,
    pub max_duration: u32,
    pub unknown_agent_policy: UnknownAgentPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            global_provider: LlmProvider::Gemini,
            global_model: None,
            base_url: None,
            per_agent_models: HashMap::new(),
            max_attempts: 3,
            retry_delay_ms: 2000,
            task_pacing_ms: 800,
            context_excerpt_chars: DEFAULT_EXCERPT_CHARS,
            unit_price_per_million: DEFAULT_UNIT_PRICE_PER_MILLION,
            min_duration: DEFAULT_MIN_DURATION,
            max_duration: DEFAULT_MAX_DURATION,
            unknown_agent_policy: UnknownAgentPolicy::Reject,
        }
    }
}

impl PipelineConfig {
    /// No pacing between tasks
    pub fn headless(mut self) -> Self {
        self.task_pacing_ms = 0;
        self
    }

    /// Model config for a slot: per-slot override -> global -> provider default
    pub fn model_for(&self, slot: &str) -> ModelConfig {
        let provider = self.global_provider.clone();
        let model = self
            .per_agent_models
            .get(slot)
            .or(self.global_model.as_ref())
            .cloned()
            .unwrap_or_else(|| provider.default_model().to_string());
        let base_url = if provider.supports_base_url() {
            self.base_url.clone()
        } else {
            None
        };

        ModelConfig {
            provider,
            model,
            base_url,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub snapshot: RunSnapshot,
    pub completed: usize,
    pub failed: usize,
    /// Tasks left pending (unknown agent under `Skip`)
    pub skipped: usize,
}

/// The run coordinator
pub struct Coordinator {
    config: PipelineConfig,
    generator: Arc<dyn GenerationService>,
    pipeline: Pipeline,
    run: RunContext,
    meter: UsageMeter,
    scheduler: TaskScheduler,
    event_tx: Option<mpsc::Sender<RunEvent>>,
    cancel: CancellationToken,
}

impl Coordinator {
    pub fn new(config: PipelineConfig, generator: Arc<dyn GenerationService>) -> Self {
        let meter = UsageMeter::new(config.unit_price_per_million);
        let scheduler = TaskScheduler::new(config.min_duration, config.max_duration);
        Self {
            config,
            generator,
            pipeline: Pipeline::new(),
            run: RunContext::new(),
            meter,
            scheduler,
            event_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stage(&self) -> PipelineStage {
        self.pipeline.stage
    }

    /// Read-only copy of the current run
    pub fn snapshot(&self) -> RunSnapshot {
        self.run.snapshot(self.pipeline.stage)
    }

    /// Run the pipeline to completion.
    ///
    /// Task failures are recorded and the run continues; concept failures
    /// fall back to a default concept. Decision, planning, unknown-agent
    /// (under `Reject`) and cancellation failures end the run in `Failed`.
    #[tracing::instrument(skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn start_run(&mut self) -> Result<RunReport, PipelineError> {
        self.pipeline.begin()?;
        self.run = RunContext::new();
        tracing::Span::current().record("run_id", self.run.run_id.as_str());
        tracing::info!("Run started");
        self.emit_stage().await;

        match self.drive().await {
            Ok(()) => {
                self.set_stage_next().await;
                self.append(LogEntry::system(
                    "Mission complete. Awaiting next command.",
                    LogKind::Success,
                ))
                .await;
                Ok(self.report())
            }
            Err(e) => {
                tracing::warn!("Run aborted: {}", e);
                self.run.failure = Some(e.to_string());
                self.emit(RunEvent::RunFailed {
                    failure: e.to_string(),
                })
                .await;
                self.append(
                    LogEntry::system("Run aborted", LogKind::Error).with_details(e.to_string()),
                )
                .await;
                self.pipeline.fail();
                self.emit_stage().await;
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<(), PipelineError> {
        self.append(LogEntry::system(
            "Booting the AI software army protocol...",
            LogKind::Info,
        ))
        .await;

        let concept = self.discover_concept().await;
        self.check_cancelled()?;

        self.set_stage_next().await;
        let decision = self.decide_strategy(&concept).await?;
        self.check_cancelled()?;

        self.set_stage_next().await;
        self.plan(&decision).await?;
        self.check_cancelled()?;

        self.set_stage_next().await;
        self.execute_tasks(&decision.vision).await
    }

    async fn discover_concept(&mut self) -> Concept {
        self.append(LogEntry::system(
            "Scanning trends for an opportunity...",
            LogKind::Thinking,
        ))
        .await;

        let (concept, source) = match self.generator.generate_concept().await {
            Ok(concept) => (concept, ConceptSource::Generated),
            Err(e) => {
                let err = ConceptGenerationError(e);
                tracing::warn!("{}, using fallback concept", err);
                self.append(
                    LogEntry::system("Using fallback concept", LogKind::Info)
                        .with_details(err.to_string()),
                )
                .await;
                (Concept::fallback(), ConceptSource::Fallback)
            }
        };

        self.meter(&serde_json::to_string(&concept).unwrap_or_default())
            .await;

        let kind = match source {
            ConceptSource::Generated => LogKind::Success,
            ConceptSource::Fallback => LogKind::Info,
        };
        self.append(
            LogEntry::system(format!("Opportunity detected: {}", concept.trend), kind)
                .with_details(concept.opportunity.clone()),
        )
        .await;

        self.run.concept = Some(concept.clone());
        self.run.concept_source = Some(source);
        self.emit(RunEvent::ConceptReady {
            concept: concept.clone(),
            source,
        })
        .await;
        concept
    }

    async fn decide_strategy(&mut self, concept: &Concept) -> Result<Decision, PipelineError> {
        let ceo = roster::ceo();
        self.append(LogEntry::agent(
            ceo,
            "Analysing strategic value...",
            LogKind::Thinking,
        ))
        .await;

        let decision = match self.generator.generate_decision(concept).await {
            Ok(decision) => decision,
            Err(e) => {
                self.append(
                    LogEntry::agent(ceo, "Strategic decision failed", LogKind::Error)
                        .with_details(format!("{:#}", e)),
                )
                .await;
                return Err(PipelineError::Decision(e));
            }
        };

        self.meter(&serde_json::to_string(&decision).unwrap_or_default())
            .await;
        self.append(
            LogEntry::agent(ceo, "Strategic directive issued", LogKind::Success)
                .with_details(decision.vision.clone()),
        )
        .await;

        self.run.decision = Some(decision.clone());
        self.emit(RunEvent::DecisionReady {
            decision: decision.clone(),
        })
        .await;
        Ok(decision)
    }

    async fn plan(&mut self, decision: &Decision) -> Result<(), PipelineError> {
        let pm = roster::taskmaster();
        self.append(LogEntry::agent(
            pm,
            "Breaking strategy into operational units...",
            LogKind::Thinking,
        ))
        .await;

        let raw = match self
            .generator
            .generate_plan(decision, &roster_listing())
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                self.append(
                    LogEntry::agent(pm, "Planning failed", LogKind::Error)
                        .with_details(format!("{:#}", e)),
                )
                .await;
                return Err(PipelineError::Plan(e));
            }
        };

        self.meter(&serde_json::to_string(&raw).unwrap_or_default())
            .await;

        if self.config.unknown_agent_policy == UnknownAgentPolicy::Reject {
            if let Some(orphan) = raw.iter().find(|t| find_agent(&t.assigned_agent_id).is_none()) {
                let err = PipelineError::UnknownAgent {
                    task_title: orphan.title.clone(),
                    agent_id: orphan.assigned_agent_id.clone(),
                };
                self.append(
                    LogEntry::agent(pm, "Plan references an unknown agent", LogKind::Error)
                        .with_details(err.to_string()),
                )
                .await;
                return Err(err);
            }
        }

        let tasks = self.scheduler.schedule(&raw);
        tracing::debug!(
            tasks = tasks.len(),
            total_duration = scheduler::total_duration(&tasks),
            "Plan scheduled"
        );
        self.run.tasks = tasks;
        self.emit(RunEvent::PlanReady {
            tasks: self.run.tasks.clone(),
        })
        .await;
        self.append(LogEntry::agent(
            pm,
            format!("Created {} operational tasks", self.run.tasks.len()),
            LogKind::Success,
        ))
        .await;
        Ok(())
    }

    async fn execute_tasks(&mut self, vision: &str) -> Result<(), PipelineError> {
        let executor = AgentTaskExecutor::new(self.generator.clone(), self.config.retry_policy())
            .with_excerpt_chars(self.config.context_excerpt_chars)
            .with_cancellation(self.cancel.clone());

        self.append(LogEntry::system(
            format!(
                "Dispatching {} tasks to the worker army...",
                self.run.tasks.len()
            ),
            LogKind::Thinking,
        ))
        .await;

        for index in scheduler::execution_order(&self.run.tasks) {
            self.check_cancelled()?;

            let Some(agent) = find_agent(&self.run.tasks[index].assigned_agent_id) else {
                continue;
            };

            self.run.tasks[index].start()?;
            self.emit_task(index).await;
            let title = self.run.tasks[index].title.clone();
            self.append(LogEntry::agent(
                agent,
                format!("Starting task: {}", title),
                LogKind::Info,
            ))
            .await;

            let result = {
                let completed = self.run.completed_tasks();
                executor
                    .execute(agent, &self.run.tasks[index], vision, &completed)
                    .await
            };

            match result {
                Ok(output) => {
                    self.meter(&output).await;
                    let (preview, _) = truncate_chars(&output, 100);
                    let preview = format!("{}...", preview);
                    self.run.complete_task(index, output)?;
                    self.append(
                        LogEntry::agent(agent, "Task complete", LogKind::Success)
                            .with_details(preview),
                    )
                    .await;
                    if let Some(purpose) = artifact_purpose(agent.category()) {
                        self.append(
                            LogEntry::system("Checking artifact purpose...", LogKind::Info)
                                .with_details(purpose),
                        )
                        .await;
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    self.run.fail_task(index, format!("Error: {}", message))?;
                    self.append(
                        LogEntry::agent(agent, format!("Task failed: {}", title), LogKind::Error)
                            .with_details(message),
                    )
                    .await;
                }
            }
            self.emit_task(index).await;
            self.pace().await;
        }
        Ok(())
    }

    fn report(&self) -> RunReport {
        RunReport {
            snapshot: self.snapshot(),
            completed: self.run.count_status(TaskStatus::Completed),
            failed: self.run.count_status(TaskStatus::Failed),
            skipped: self.run.count_status(TaskStatus::Pending),
        }
    }

    fn check_cancelled(&self) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    async fn pace(&self) {
        if self.config.task_pacing_ms == 0 {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(self.config.task_pacing_ms)) => {}
            _ = self.cancel.cancelled() => {}
        }
    }

    async fn meter(&mut self, text: &str) {
        let (units, cost) = self.meter.record(text);
        self.run.usage = self.run.usage.accumulate(units, cost);
        self.emit(RunEvent::UsageUpdated {
            usage: self.run.usage,
        })
        .await;
    }

    async fn set_stage_next(&mut self) {
        self.pipeline.advance();
        self.emit_stage().await;
    }

    async fn emit_stage(&mut self) {
        tracing::info!(stage = ?self.pipeline.stage, "Stage changed");
        self.emit(RunEvent::StageChanged {
            run_id: self.run.run_id.clone(),
            stage: self.pipeline.stage,
        })
        .await;
    }

    async fn emit_task(&mut self, index: usize) {
        self.emit(RunEvent::TaskUpdated {
            task: self.run.tasks[index].clone(),
        })
        .await;
    }

    async fn append(&mut self, entry: LogEntry) {
        self.run.append(entry.clone());
        self.emit(RunEvent::Log { entry }).await;
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::generation::testing::ScriptedGeneration;
    use std::sync::atomic::Ordering;

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            retry_delay_ms: 0,
            ..PipelineConfig::default().headless()
        }
    }

    fn three_task_generator() -> ScriptedGeneration {
        ScriptedGeneration::with_plan(&[
            ("System architecture", "arch-01"),
            ("Backend API", "builder-be"),
            ("Frontend UI", "builder-fe"),
        ])
    }

    fn coordinator(generator: Arc<ScriptedGeneration>) -> Coordinator {
        Coordinator::new(fast_config(), generator)
    }

    #[tokio::test]
    async fn test_full_run_reaches_finished() {
        let generator = Arc::new(three_task_generator());
        let mut coord = coordinator(generator.clone());

        let report = coord.start_run().await.unwrap();

        assert_eq!(coord.stage(), PipelineStage::Finished);
        assert_eq!(report.completed, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.snapshot.concept_source, Some(ConceptSource::Generated));
        assert!(report.snapshot.decision.is_some());
        assert!(report.snapshot.usage.units > 0);

        let tasks = &report.snapshot.tasks;
        assert_eq!(tasks[0].start_offset, 0);
        for i in 1..tasks.len() {
            assert_eq!(
                tasks[i].start_offset,
                tasks[i - 1].start_offset + tasks[i - 1].duration
            );
        }
        assert!(tasks
            .iter()
            .all(|t| t.status == TaskStatus::Completed && t.output.is_some()));
    }

    #[tokio::test]
    async fn test_context_accumulates_in_completion_order() {
        let generator = Arc::new(three_task_generator());
        let mut coord = coordinator(generator.clone());
        coord.start_run().await.unwrap();

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("No previous work"));
        assert!(prompts[1].contains("--- OUTPUT FROM arch-01 (System architecture) ---"));
        let third = &prompts[2];
        let arch = third.find("OUTPUT FROM arch-01").unwrap();
        let be = third.find("OUTPUT FROM builder-be").unwrap();
        assert!(arch < be);
    }

    #[tokio::test]
    async fn test_task_failure_is_not_fatal() {
        let mut scripted = three_task_generator();
        scripted.failing_titles.insert("Backend API".to_string());
        let generator = Arc::new(scripted);
        let mut coord = coordinator(generator.clone());

        let report = coord.start_run().await.unwrap();
        let tasks = &report.snapshot.tasks;

        assert_eq!(coord.stage(), PipelineStage::Finished);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[1].status, TaskStatus::Failed);
        assert!(tasks[1]
            .output
            .as_deref()
            .unwrap()
            .starts_with("Error: Execution failed after 3 attempts"));
        assert_eq!(tasks[2].status, TaskStatus::Completed);
        // 1 + 3 + 1 generation calls
        assert_eq!(generator.task_calls.load(Ordering::SeqCst), 5);
        // the failed task contributes nothing to later context
        assert!(!generator.prompts()[4].contains("OUTPUT FROM builder-be"));

        let errors: Vec<_> = report
            .snapshot
            .log
            .iter()
            .filter(|e| e.kind == LogKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Backend API"));
    }

    #[tokio::test]
    async fn test_concept_failure_falls_back_and_continues() {
        let mut scripted = three_task_generator();
        scripted.concept_fails = true;
        let generator = Arc::new(scripted);
        let mut coord = coordinator(generator.clone());

        let report = coord.start_run().await.unwrap();

        assert_eq!(report.snapshot.concept, Some(Concept::fallback()));
        assert_eq!(report.snapshot.concept_source, Some(ConceptSource::Fallback));
        assert_eq!(generator.decision_calls.load(Ordering::SeqCst), 1);
        assert!(report
            .snapshot
            .log
            .iter()
            .any(|e| e.message.contains("fallback concept")));
    }

    #[tokio::test]
    async fn test_fallback_concept_is_still_metered() {
        let mut scripted = ScriptedGeneration::with_plan(&[]);
        scripted.concept_fails = true;
        scripted.decision_fails = true;
        let mut coord = coordinator(Arc::new(scripted));

        coord.start_run().await.unwrap_err();

        let fallback_json = serde_json::to_string(&Concept::fallback()).unwrap();
        let (units, _) = UsageMeter::default().record(&fallback_json);
        assert_eq!(coord.snapshot().usage.units, units);
    }

    #[tokio::test]
    async fn test_decision_failure_aborts_before_planning() {
        let mut scripted = three_task_generator();
        scripted.decision_fails = true;
        let generator = Arc::new(scripted);
        let mut coord = coordinator(generator.clone());

        let err = coord.start_run().await.unwrap_err();

        assert!(matches!(err, PipelineError::Decision(_)));
        assert_eq!(coord.stage(), PipelineStage::Failed);
        assert_eq!(generator.plan_calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.task_calls.load(Ordering::SeqCst), 0);
        let snap = coord.snapshot();
        assert!(snap.decision.is_none());
        assert!(snap.tasks.is_empty());
        assert!(snap.failure.unwrap().contains("strategic decision failed"));
    }

    #[tokio::test]
    async fn test_plan_failure_is_fatal() {
        let mut scripted = three_task_generator();
        scripted.plan_fails = true;
        let generator = Arc::new(scripted);
        let mut coord = coordinator(generator.clone());

        let err = coord.start_run().await.unwrap_err();

        assert!(matches!(err, PipelineError::Plan(_)));
        assert_eq!(coord.stage(), PipelineStage::Failed);
        assert_eq!(generator.task_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_agent_rejected_by_default() {
        let generator = Arc::new(ScriptedGeneration::with_plan(&[
            ("Architecture", "arch-01"),
            ("Mystery work", "ghost-99"),
        ]));
        let mut coord = coordinator(generator.clone());

        let err = coord.start_run().await.unwrap_err();

        match err {
            PipelineError::UnknownAgent { agent_id, .. } => assert_eq!(agent_id, "ghost-99"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(generator.task_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_agent_skipped_under_skip_policy() {
        let generator = Arc::new(ScriptedGeneration::with_plan(&[
            ("Architecture", "arch-01"),
            ("Mystery work", "ghost-99"),
            ("Docs", "doc-01"),
        ]));
        let config = PipelineConfig {
            unknown_agent_policy: UnknownAgentPolicy::Skip,
            ..fast_config()
        };
        let mut coord = Coordinator::new(config, generator.clone());

        let report = coord.start_run().await.unwrap();

        assert_eq!(report.completed, 2);
        assert_eq!(report.skipped, 1);
        let ghost = &report.snapshot.tasks[1];
        assert_eq!(ghost.status, TaskStatus::Pending);
        assert!(ghost.output.is_none());
        assert!(!report
            .snapshot
            .log
            .iter()
            .any(|e| e.message.contains("Mystery work")));
    }

    #[tokio::test]
    async fn test_new_run_resets_state() {
        let mut scripted = three_task_generator();
        scripted.decision_fails = true;
        let mut coord = coordinator(Arc::new(scripted));
        coord.start_run().await.unwrap_err();
        let first_run = coord.snapshot().run_id;

        let fresh: Arc<dyn GenerationService> = Arc::new(three_task_generator());
        coord.generator = fresh;
        let report = coord.start_run().await.unwrap();

        assert_ne!(report.snapshot.run_id, first_run);
        assert!(report.snapshot.failure.is_none());
        assert_eq!(report.completed, 3);
        assert!(!report
            .snapshot
            .log
            .iter()
            .any(|e| e.message == "Run aborted"));
    }

    #[tokio::test]
    async fn test_cancelled_run_fails() {
        let generator = Arc::new(three_task_generator());
        let mut coord = coordinator(generator.clone());
        coord.cancellation_token().cancel();

        let err = coord.start_run().await.unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(coord.stage(), PipelineStage::Failed);
        assert_eq!(generator.decision_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_events_stream_phases_and_tasks() {
        let generator = Arc::new(three_task_generator());
        let (tx, mut rx) = mpsc::channel(256);
        let mut coord = coordinator(generator).with_event_channel(tx);

        coord.start_run().await.unwrap();
        drop(coord);

        let mut stages = Vec::new();
        let mut in_progress_seen = 0;
        let mut logs = 0;
        let mut active: Option<String> = None;
        let mut concept_ready = false;
        let mut decision_ready = false;
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::StageChanged { stage, .. } => stages.push(stage),
                RunEvent::TaskUpdated { task } if task.status == TaskStatus::InProgress => {
                    assert!(active.is_none(), "two tasks in progress at once");
                    active = Some(task.id);
                    in_progress_seen += 1
                }
                RunEvent::TaskUpdated { task } => {
                    assert!(task.status.is_terminal());
                    assert_eq!(active.take().as_deref(), Some(task.id.as_str()));
                }
                RunEvent::ConceptReady { source, .. } => {
                    assert_eq!(source, ConceptSource::Generated);
                    concept_ready = true
                }
                RunEvent::DecisionReady { .. } => decision_ready = true,
                RunEvent::Log { .. } => logs += 1,
                _ => {}
            }
        }
        assert!(active.is_none());
        assert!(concept_ready && decision_ready);

        assert_eq!(
            stages,
            vec![
                PipelineStage::DiscoveringConcept,
                PipelineStage::DecidingStrategy,
                PipelineStage::Planning,
                PipelineStage::Executing,
                PipelineStage::Finished,
            ]
        );
        assert_eq!(in_progress_seen, 3);
        assert!(logs >= 10);
    }

    #[tokio::test]
    async fn test_failure_is_streamed() {
        let mut scripted = three_task_generator();
        scripted.plan_fails = true;
        let (tx, mut rx) = mpsc::channel(256);
        let mut coord = coordinator(Arc::new(scripted)).with_event_channel(tx);

        coord.start_run().await.unwrap_err();
        drop(coord);

        let mut failure = None;
        let mut last_stage = None;
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::RunFailed { failure: f } => failure = Some(f),
                RunEvent::StageChanged { stage, .. } => last_stage = Some(stage),
                _ => {}
            }
        }
        assert!(failure.unwrap().starts_with("task planning failed"));
        assert_eq!(last_stage, Some(PipelineStage::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_pacing_after_each_task() {
        let generator = Arc::new(three_task_generator());
        let config = PipelineConfig {
            retry_delay_ms: 0,
            ..PipelineConfig::default()
        };
        let mut coord = Coordinator::new(config, generator);

        let started = tokio::time::Instant::now();
        coord.start_run().await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(3 * 800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_tasks_skips_the_rest() {
        let mut scripted = three_task_generator();
        scripted.cancel_during = Some("System architecture".to_string());
        let cancel = scripted.cancel.clone();
        let generator = Arc::new(scripted);
        let config = PipelineConfig {
            task_pacing_ms: 60_000,
            ..fast_config()
        };
        let mut coord = Coordinator::new(config, generator.clone()).with_cancellation(cancel);

        let started = tokio::time::Instant::now();
        let err = coord.start_run().await.unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled));
        // the pause after task 1 ends as soon as the token fires
        assert!(started.elapsed() < Duration::from_millis(60_000));
        let snap = coord.snapshot();
        assert_eq!(snap.stage, PipelineStage::Failed);
        assert_eq!(snap.tasks[0].status, TaskStatus::Completed);
        assert_eq!(snap.tasks[1].status, TaskStatus::Pending);
        assert_eq!(snap.tasks[2].status, TaskStatus::Pending);
        assert_eq!(generator.task_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_executing_phase_logs_dispatch() {
        let mut coord = coordinator(Arc::new(three_task_generator()));
        let report = coord.start_run().await.unwrap();

        let dispatch = report
            .snapshot
            .log
            .iter()
            .find(|e| e.message.starts_with("Dispatching"))
            .unwrap();
        assert_eq!(dispatch.message, "Dispatching 3 tasks to the worker army...");
        assert_eq!(dispatch.kind, LogKind::Thinking);
    }

    #[tokio::test]
    async fn test_artifact_purpose_logged_for_known_roles() {
        let generator = Arc::new(ScriptedGeneration::with_plan(&[
            ("Docs", "doc-01"),
            ("Growth plan", "mkt-growth"),
        ]));
        let mut coord = coordinator(generator);

        let report = coord.start_run().await.unwrap();

        let purposes: Vec<_> = report
            .snapshot
            .log
            .iter()
            .filter(|e| e.message == "Checking artifact purpose...")
            .collect();
        assert_eq!(purposes.len(), 1);
        assert!(purposes[0].details.as_deref().unwrap().contains("README.md"));
    }

    #[test]
    fn test_model_for_prefers_slot_override() {
        let mut config = PipelineConfig {
            global_model: Some("gemini-1.5-pro".to_string()),
            ..PipelineConfig::default()
        };
        config
            .per_agent_models
            .insert("builder".to_string(), "gemini-2.0-flash".to_string());

        assert_eq!(config.model_for("builder").model, "gemini-2.0-flash");
        assert_eq!(config.model_for("ceo-01").model, "gemini-1.5-pro");
        assert!(config.model_for("ceo-01").base_url.is_none());
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"task_pacing_ms": 0, "unknown_agent_policy": "skip"}"#)
                .unwrap();
        assert_eq!(config.task_pacing_ms, 0);
        assert_eq!(config.unknown_agent_policy, UnknownAgentPolicy::Skip);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_policy().delay, Duration::from_secs(2));
    }
}
