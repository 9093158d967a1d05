//! # Settings API
//!
//! Persisted configuration, provider discovery and the agent roster.

use axum::response::Json;
use legion_core::models::LlmProvider;
use legion_core::roster::{all_agents, AgentProfile};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{ConfigDefaults, ConfigResponse, PersistedConfig};

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentResponse {
    pub id: String,
    pub name: String,
    /// CEO, CTO, PM or WORKER
    pub role: String,
    pub specialty: String,
    pub description: String,
    pub icon: String,
}

impl From<&AgentProfile> for AgentResponse {
    fn from(agent: &AgentProfile) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name.to_string(),
            role: format!("{:?}", agent.role).to_uppercase(),
            specialty: agent.specialty.to_string(),
            description: agent.description.to_string(),
            icon: agent.icon.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub default_model: String,
    pub supports_base_url: bool,
    pub env_var: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

fn env_var(provider: &LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        LlmProvider::OpenAI => "OPENAI_API_KEY",
        LlmProvider::Gemini => "GEMINI_API_KEY",
        LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
        LlmProvider::Grok => "XAI_API_KEY",
        LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
    }
}

pub fn provider_info() -> Vec<ProviderInfo> {
    LlmProvider::all()
        .into_iter()
        .map(|provider| ProviderInfo {
            id: serde_json::to_value(&provider)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            name: provider.display_name().to_string(),
            default_model: provider.default_model().to_string(),
            supports_base_url: provider.supports_base_url(),
            env_var: env_var(&provider).to_string(),
        })
        .collect()
}

/// List the agent roster
#[utoipa::path(
    get,
    path = "/api/v1/agents",
    tag = "agents",
    responses(
        (status = 200, description = "C-suite and worker agents", body = Vec<AgentResponse>)
    )
)]
pub async fn list_agents() -> Json<Vec<AgentResponse>> {
    Json(all_agents().map(AgentResponse::from).collect())
}

/// Get current configuration
#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "config",
    responses(
        (status = 200, description = "Current configuration and defaults", body = ConfigResponse)
    )
)]
pub async fn get_config() -> Json<ConfigResponse> {
    let config = PersistedConfig::load().await;
    Json(ConfigResponse {
        config,
        defaults: ConfigDefaults::default(),
    })
}

/// Update configuration (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/config",
    tag = "config",
    request_body = PersistedConfig,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigResponse)
    )
)]
pub async fn update_config(Json(updates): Json<PersistedConfig>) -> Json<ConfigResponse> {
    let mut config = PersistedConfig::load().await;
    config.merge(updates);

    if let Err(e) = config.save().await {
        tracing::error!("Failed to save config: {}", e);
    }

    Json(ConfigResponse {
        config,
        defaults: ConfigDefaults::default(),
    })
}

/// Get available LLM providers
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "providers",
    responses(
        (status = 200, description = "List of supported LLM providers", body = ProvidersResponse)
    )
)]
pub async fn get_providers() -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: provider_info(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_core::roster::find_agent;

    #[test]
    fn test_provider_slugs_roundtrip() {
        for info in provider_info() {
            assert!(LlmProvider::from_slug(&info.id).is_some(), "bad slug {}", info.id);
        }
    }

    #[test]
    fn test_agent_response_role() {
        let ceo = AgentResponse::from(find_agent("ceo-01").unwrap());
        assert_eq!(ceo.role, "CEO");
        let worker = AgentResponse::from(find_agent("doc-01").unwrap());
        assert_eq!(worker.role, "WORKER");
    }
}
