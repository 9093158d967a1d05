//! # LLM Helpers
//!
//! Turns a [`ModelConfig`](crate::models::ModelConfig) into a radkit
//! `LlmFunction` call. Every phase goes through [`run_llm_function!`], so
//! provider selection and error labelling live here and nowhere else.

use crate::models::ModelConfig;

/// Error context attached to every failed phase call, e.g.
/// `Taskmaster failed (provider: Gemini, model: gemini-2.0-flash)`.
pub fn phase_context(phase: &str, config: &ModelConfig) -> String {
    format!(
        "{} failed (provider: {}, model: {})",
        phase,
        config.provider.display_name(),
        config.model
    )
}

/// Run one structured `LlmFunction` for a pipeline phase.
///
/// `$phase` labels the error: client construction and generation failures
/// both come back wrapped in [`phase_context`].
#[macro_export]
macro_rules! run_llm_function {
    ($phase:expr, $config:expr, $output_type:ty, $system_prompt:expr, $input:expr) => {{
        use anyhow::Context as _;
        use radkit::agent::LlmFunction;
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config: &$crate::models::ModelConfig = $config;
        let result: anyhow::Result<$output_type> = match config.provider {
            LlmProvider::Anthropic => match AnthropicLlm::from_env(&config.model) {
                Ok(llm) => LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                    .run($input)
                    .await
                    .map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            LlmProvider::OpenAI => match OpenAILlm::from_env(&config.model) {
                Ok(llm) => {
                    let llm = match &config.base_url {
                        Some(base_url) => llm.with_base_url(base_url),
                        None => llm,
                    };
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                        .run($input)
                        .await
                        .map_err(Into::into)
                }
                Err(e) => Err(e.into()),
            },
            LlmProvider::Gemini => match GeminiLlm::from_env(&config.model) {
                Ok(llm) => LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                    .run($input)
                    .await
                    .map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            LlmProvider::OpenRouter => match OpenRouterLlm::from_env(&config.model) {
                Ok(llm) => LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                    .run($input)
                    .await
                    .map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            LlmProvider::Grok => match GrokLlm::from_env(&config.model) {
                Ok(llm) => LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                    .run($input)
                    .await
                    .map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            LlmProvider::DeepSeek => match DeepSeekLlm::from_env(&config.model) {
                Ok(llm) => LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt)
                    .run($input)
                    .await
                    .map_err(Into::into),
                Err(e) => Err(e.into()),
            },
        };
        result.with_context(|| $crate::skills::llm_helpers::phase_context($phase, config))
    }};
}

pub use run_llm_function;
