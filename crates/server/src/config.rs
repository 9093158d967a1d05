//! Persisted configuration
//!
//! Overrides saved in `.legion/config.json`, applied over
//! [`PipelineConfig::default`] at the start of every run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use legion_core::models::LlmProvider;
use legion_core::swarm::{PipelineConfig, UnknownAgentPolicy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CONFIG_DIR: &str = ".legion";

pub fn config_path() -> PathBuf {
    Path::new(CONFIG_DIR).join("config.json")
}

pub fn env_path() -> PathBuf {
    Path::new(CONFIG_DIR).join(".env")
}

/// Persisted configuration (subset of PipelineConfig exposed to clients)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, ToSchema)]
pub struct PersistedConfig {
    /// Provider slug: anthropic, openai, gemini, openrouter, grok, deepseek
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_pacing_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_excerpt_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_per_million: Option<f64>,
    /// `reject` or `skip`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_agent_policy: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub per_agent_models: HashMap<String, String>,
}

impl PersistedConfig {
    pub async fn load() -> Self {
        Self::load_from(&config_path()).await
    }

    pub async fn load_from(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_path()).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(path, content).await
    }

    pub fn merge(&mut self, other: PersistedConfig) {
        if other.global_provider.is_some() {
            self.global_provider = other.global_provider;
        }
        if other.global_model.is_some() {
            self.global_model = other.global_model;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.max_attempts.is_some() {
            self.max_attempts = other.max_attempts;
        }
        if other.retry_delay_ms.is_some() {
            self.retry_delay_ms = other.retry_delay_ms;
        }
        if other.task_pacing_ms.is_some() {
            self.task_pacing_ms = other.task_pacing_ms;
        }
        if other.context_excerpt_chars.is_some() {
            self.context_excerpt_chars = other.context_excerpt_chars;
        }
        if other.unit_price_per_million.is_some() {
            self.unit_price_per_million = other.unit_price_per_million;
        }
        if other.unknown_agent_policy.is_some() {
            self.unknown_agent_policy = other.unknown_agent_policy;
        }
        for (k, v) in other.per_agent_models {
            self.per_agent_models.insert(k, v);
        }
    }

    /// Apply the overrides on top of the pipeline defaults. Unrecognised
    /// provider or policy values keep the default.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();

        if let Some(ref slug) = self.global_provider {
            match LlmProvider::from_slug(slug) {
                Some(provider) => config.global_provider = provider,
                None => tracing::warn!("Unknown provider '{}', keeping default", slug),
            }
        }
        if let Some(ref m) = self.global_model {
            config.global_model = Some(m.clone());
        }
        if let Some(ref url) = self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.retry_delay_ms = ms;
        }
        if let Some(ms) = self.task_pacing_ms {
            config.task_pacing_ms = ms;
        }
        if let Some(chars) = self.context_excerpt_chars {
            config.context_excerpt_chars = chars;
        }
        if let Some(price) = self.unit_price_per_million {
            config.unit_price_per_million = price;
        }
        if let Some(ref policy) = self.unknown_agent_policy {
            match policy.as_str() {
                "reject" => config.unknown_agent_policy = UnknownAgentPolicy::Reject,
                "skip" => config.unknown_agent_policy = UnknownAgentPolicy::Skip,
                other => tracing::warn!("Unknown agent policy '{}', keeping default", other),
            }
        }
        config.per_agent_models = self.per_agent_models.clone();
        config
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub config: PersistedConfig,
    pub defaults: ConfigDefaults,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigDefaults {
    pub global_provider: &'static str,
    pub global_model: &'static str,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub task_pacing_ms: u64,
    pub context_excerpt_chars: usize,
    pub unit_price_per_million: f64,
    pub unknown_agent_policy: &'static str,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        let config = PipelineConfig::default();
        Self {
            global_provider: "gemini",
            global_model: config.global_provider.default_model(),
            max_attempts: config.max_attempts,
            retry_delay_ms: config.retry_delay_ms,
            task_pacing_ms: config.task_pacing_ms,
            context_excerpt_chars: config.context_excerpt_chars,
            unit_price_per_million: config.unit_price_per_million,
            unknown_agent_policy: "reject",
        }
    }
}
