//! # Agent Task Executor
//!
//! Runs one task on an agent's behalf: builds the role instruction,
//! composes the request with vision and prior context, and calls the
//! generation service with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::context_window;
use crate::error::ExecutionError;
use crate::roster::AgentProfile;
use crate::skills::{prompts, GenerationService};
use crate::state::Task;

/// Attempts and spacing for task generation calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

pub struct AgentTaskExecutor {
    generator: Arc<dyn GenerationService>,
    retry: RetryPolicy,
    excerpt_chars: usize,
    cancel: CancellationToken,
}

impl AgentTaskExecutor {
    pub fn new(generator: Arc<dyn GenerationService>, retry: RetryPolicy) -> Self {
        Self {
            generator,
            retry,
            excerpt_chars: context_window::DEFAULT_EXCERPT_CHARS,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Stop waiting between retries once this token fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Produce the task's deliverable. Returns the first non-empty output;
    /// fails after `max_attempts` calls with the last cause.
    #[tracing::instrument(skip(self, agent, task, vision, completed), fields(agent = agent.id, task = %task.title))]
    pub async fn execute(
        &self,
        agent: &AgentProfile,
        task: &Task,
        vision: &str,
        completed: &[&Task],
    ) -> Result<String, ExecutionError> {
        let request = compose_request(
            &prompts::instruction_for(agent, &task.title),
            vision,
            &task.title,
            &context_window::build(completed, self.excerpt_chars),
        );

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let cause = match self.generator.generate_task_output(&request).await {
                Ok(output) if !output.trim().is_empty() => return Ok(output),
                Ok(_) => anyhow::anyhow!("Empty response from AI"),
                Err(e) => e,
            };

            tracing::warn!(
                "Attempt {}/{} failed for {}: {:#}",
                attempt,
                max_attempts,
                agent.id,
                cause
            );

            if attempt >= max_attempts {
                return Err(ExecutionError {
                    attempts: attempt,
                    source: cause,
                });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.retry.delay) => {}
                _ = self.cancel.cancelled() => {
                    return Err(ExecutionError {
                        attempts: attempt,
                        source: cause.context("run cancelled while waiting to retry"),
                    });
                }
            }
        }
    }
}

/// Single request combining role instruction, vision, task and prior work
pub fn compose_request(instruction: &str, vision: &str, task_title: &str, context: &str) -> String {
    format!(
        "{}\n\nProject Vision: {}\nCurrent Task: {}\n\nCONTEXT (PREVIOUS WORK):\n{}\n\n**EXECUTE NOW. RETURN OUTPUT IN MARKDOWN.**",
        instruction.trim_end(),
        vision,
        task_title,
        context
    )
}
