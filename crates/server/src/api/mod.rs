//! # HTTP API
//!
//! Versioned routes under `/api/v1`, plus the OpenAPI document.

pub mod run;
pub mod settings;

use axum::{
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::config::{ConfigDefaults, ConfigResponse, PersistedConfig};
use crate::state::SharedState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Legion API",
        version = "1.0.0",
        description = "API for the Legion autonomous build pipeline"
    ),
    paths(
        run::get_status,
        run::get_snapshot,
        run::start_run,
        run::stop_run,
        run::list_artifacts,
        run::get_report,
        settings::list_agents,
        settings::get_config,
        settings::update_config,
        settings::get_providers
    ),
    components(
        schemas(
            ApiResponse,
            run::RunStatus,
            run::ArtifactResponse,
            settings::AgentResponse,
            settings::ProviderInfo,
            settings::ProvidersResponse,
            ConfigResponse,
            ConfigDefaults,
            PersistedConfig
        )
    ),
    tags(
        (name = "run", description = "Pipeline run management"),
        (name = "agents", description = "Agent roster"),
        (name = "config", description = "Configuration management"),
        (name = "providers", description = "LLM provider discovery")
    )
)]
pub struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    let spec = ApiDoc::openapi().to_json().unwrap_or_default();
    ([(header::CONTENT_TYPE, "application/json")], spec)
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .nest("/api/v1/run", run::run_routes())
        .route("/api/v1/agents", get(settings::list_agents))
        .route(
            "/api/v1/config",
            get(settings::get_config).patch(settings::update_config),
        )
        .route("/api/v1/providers", get(settings::get_providers))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}
