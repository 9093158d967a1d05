//! Shared server state
//!
//! The coordinator owns its run exclusively, so the server keeps a live
//! copy folded from the event stream and swaps in the coordinator's own
//! snapshot once the run returns.

use std::sync::Arc;

use legion_core::state::{RunContext, RunSnapshot};
use legion_core::swarm::RunEvent;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

pub struct AppState {
    /// Latest known view of the current or last run
    pub live: RwLock<Option<RunSnapshot>>,
    /// Set while a run is in flight
    pub running: RwLock<Option<CancellationToken>>,
    pub event_tx: broadcast::Sender<RunEvent>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel::<RunEvent>(256);
        Self {
            live: RwLock::new(None),
            running: RwLock::new(None),
            event_tx,
        }
    }
}

/// Fold one event into the live snapshot. A stage change carrying a new
/// run id starts a fresh snapshot.
pub fn apply_event(live: &mut Option<RunSnapshot>, event: &RunEvent) {
    if let RunEvent::StageChanged { run_id, stage } = event {
        let is_new_run = live.as_ref().map_or(true, |s| &s.run_id != run_id);
        if is_new_run {
            let mut fresh = RunContext::new().snapshot(*stage);
            fresh.run_id = run_id.clone();
            *live = Some(fresh);
        }
    }

    let Some(snapshot) = live.as_mut() else {
        return;
    };

    match event {
        RunEvent::StageChanged { stage, .. } => snapshot.stage = *stage,
        RunEvent::ConceptReady { concept, source } => {
            snapshot.concept = Some(concept.clone());
            snapshot.concept_source = Some(*source);
        }
        RunEvent::DecisionReady { decision } => snapshot.decision = Some(decision.clone()),
        RunEvent::RunFailed { failure } => snapshot.failure = Some(failure.clone()),
        RunEvent::Log { entry } => snapshot.log.push(entry.clone()),
        RunEvent::PlanReady { tasks } => snapshot.tasks = tasks.clone(),
        RunEvent::TaskUpdated { task } => {
            if let Some(slot) = snapshot.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task.clone();
            }
        }
        RunEvent::UsageUpdated { usage } => snapshot.usage = *usage,
    }
}
