//! # Run API
//!
//! Start, stop and observe pipeline runs.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::{self, Stream};
use legion_core::skills::LlmGenerationService;
use legion_core::state::{RunSnapshot, TaskStatus};
use legion_core::swarm::{Coordinator, PipelineStage, RunEvent};
use legion_core::tools::{collect_artifacts, render_markdown_report, ArtifactFile};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use super::ApiResponse;
use crate::config::PersistedConfig;
use crate::state::{apply_event, SharedState};

pub fn run_routes() -> Router<SharedState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/snapshot", get(get_snapshot))
        .route("/start", post(start_run))
        .route("/stop", post(stop_run))
        .route("/events", get(events))
        .route("/artifacts", get(list_artifacts))
        .route("/report", get(get_report))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RunStatus {
    pub running: bool,
    /// Snake-case pipeline stage
    pub stage: String,
    pub run_id: Option<String>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub units: u64,
    pub cost: f64,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtifactResponse {
    pub name: String,
    pub language: String,
    pub content: String,
    pub agent: String,
}

impl From<ArtifactFile> for ArtifactResponse {
    fn from(file: ArtifactFile) -> Self {
        Self {
            name: file.name,
            language: file.language,
            content: file.content,
            agent: file.agent,
        }
    }
}

pub fn stage_label(stage: PipelineStage) -> String {
    serde_json::to_value(stage)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", stage))
}

fn summarize(snapshot: Option<&RunSnapshot>, running: bool) -> RunStatus {
    let count = |status: TaskStatus| {
        snapshot.map_or(0, |s| s.tasks.iter().filter(|t| t.status == status).count())
    };
    RunStatus {
        running,
        stage: stage_label(snapshot.map_or(PipelineStage::Idle, |s| s.stage)),
        run_id: snapshot.map(|s| s.run_id.clone()),
        total_tasks: snapshot.map_or(0, |s| s.tasks.len()),
        completed_tasks: count(TaskStatus::Completed),
        failed_tasks: count(TaskStatus::Failed),
        units: snapshot.map_or(0, |s| s.usage.units),
        cost: snapshot.map_or(0.0, |s| s.usage.cost),
        failure: snapshot.and_then(|s| s.failure.clone()),
    }
}

/// Get run status
#[utoipa::path(
    get,
    path = "/api/v1/run/status",
    tag = "run",
    responses(
        (status = 200, description = "Current run status", body = RunStatus)
    )
)]
pub async fn get_status(State(state): State<SharedState>) -> Json<RunStatus> {
    let running = state.running.read().await.is_some();
    let live = state.live.read().await;
    Json(summarize(live.as_ref(), running))
}

/// Get the latest run snapshot
#[utoipa::path(
    get,
    path = "/api/v1/run/snapshot",
    tag = "run",
    responses(
        (status = 200, description = "Latest run snapshot"),
        (status = 404, description = "No run has started yet")
    )
)]
pub async fn get_snapshot(State(state): State<SharedState>) -> Response {
    match state.live.read().await.as_ref() {
        Some(snapshot) => Json(snapshot.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "No run has started yet").into_response(),
    }
}

/// Start a run in the background
#[utoipa::path(
    post,
    path = "/api/v1/run/start",
    tag = "run",
    responses(
        (status = 200, description = "Run started, or refused if one is in flight", body = ApiResponse)
    )
)]
pub async fn start_run(State(state): State<SharedState>) -> Json<ApiResponse> {
    let cancel = CancellationToken::new();
    {
        let mut running = state.running.write().await;
        if running.is_some() {
            return Json(ApiResponse {
                success: false,
                message: "A run is already in progress".to_string(),
            });
        }
        *running = Some(cancel.clone());
    }

    let config = PersistedConfig::load().await.to_pipeline_config();
    let generator = Arc::new(LlmGenerationService::new(&config));
    let (event_mpsc_tx, mut event_mpsc_rx) = mpsc::channel::<RunEvent>(100);

    // Fold events into the live snapshot, then fan out to SSE subscribers
    let bridge_state = state.clone();
    let bridge = tokio::spawn(async move {
        while let Some(event) = event_mpsc_rx.recv().await {
            apply_event(&mut *bridge_state.live.write().await, &event);
            let _ = bridge_state.event_tx.send(event);
        }
    });

    let run_state = state.clone();
    let run = tokio::spawn(async move {
        let mut coordinator = Coordinator::new(config, generator)
            .with_event_channel(event_mpsc_tx)
            .with_cancellation(cancel);

        match coordinator.start_run().await {
            Ok(report) => tracing::info!(
                completed = report.completed,
                failed = report.failed,
                skipped = report.skipped,
                "Run finished"
            ),
            Err(e) => tracing::error!("Run failed: {}", e),
        }

        let snapshot = coordinator.snapshot();
        drop(coordinator);
        let _ = bridge.await;

        *run_state.live.write().await = Some(snapshot);
    });
    tokio::spawn(supervise_run(state, run));

    Json(ApiResponse {
        success: true,
        message: "Run started".to_string(),
    })
}

/// Wait for the run task and release the in-flight slot however it ends.
/// A panicked run is marked failed in the live snapshot.
async fn supervise_run(state: SharedState, run: JoinHandle<()>) {
    if let Err(e) = run.await {
        tracing::error!("Run task aborted: {}", e);
        if let Some(snapshot) = state.live.write().await.as_mut() {
            snapshot.stage = PipelineStage::Failed;
            snapshot.failure = Some(format!("run task aborted: {}", e));
        }
    }
    *state.running.write().await = None;
}

/// Cancel the running pipeline
#[utoipa::path(
    post,
    path = "/api/v1/run/stop",
    tag = "run",
    responses(
        (status = 200, description = "Cancellation requested", body = ApiResponse)
    )
)]
pub async fn stop_run(State(state): State<SharedState>) -> Json<ApiResponse> {
    match state.running.read().await.as_ref() {
        Some(cancel) => {
            cancel.cancel();
            Json(ApiResponse {
                success: true,
                message: "Cancellation requested".to_string(),
            })
        }
        None => Json(ApiResponse {
            success: false,
            message: "No run in progress".to_string(),
        }),
    }
}

/// List files extracted from completed task output
#[utoipa::path(
    get,
    path = "/api/v1/run/artifacts",
    tag = "run",
    responses(
        (status = 200, description = "Extracted files", body = Vec<ArtifactResponse>)
    )
)]
pub async fn list_artifacts(State(state): State<SharedState>) -> Json<Vec<ArtifactResponse>> {
    let live = state.live.read().await;
    let files = live
        .as_ref()
        .map(|s| collect_artifacts(&s.tasks))
        .unwrap_or_default();
    Json(files.into_iter().map(ArtifactResponse::from).collect())
}

/// Markdown report of the latest run
#[utoipa::path(
    get,
    path = "/api/v1/run/report",
    tag = "run",
    responses(
        (status = 200, description = "Markdown report", content_type = "text/markdown"),
        (status = 404, description = "No run has started yet")
    )
)]
pub async fn get_report(State(state): State<SharedState>) -> Response {
    match state.live.read().await.as_ref() {
        Some(snapshot) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            render_markdown_report(snapshot),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "No run has started yet").into_response(),
    }
}

/// SSE endpoint for run events with heartbeat
pub async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            let next = tokio::time::timeout(std::time::Duration::from_secs(15), rx.recv()).await;
            match next {
                Ok(Ok(event)) => {
                    let json = serde_json::to_string(&event).unwrap_or_default();
                    return Some((Ok(Event::default().data(json)), rx));
                }
                // Slow subscriber, skip what it missed
                Ok(Err(tokio::sync::broadcast::error::RecvError::Lagged(n))) => {
                    tracing::warn!("SSE subscriber lagged by {} events", n);
                    continue;
                }
                Ok(Err(_)) => return None,
                Err(_) => return Some((Ok(Event::default().comment("heartbeat")), rx)),
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
