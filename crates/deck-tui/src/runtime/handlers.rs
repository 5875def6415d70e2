//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. The runtime
//! spawns them with `spawn_effect` and sends the result to the inbox. They
//! never touch state directly.

use std::sync::Arc;

use deck_core::cluster::{ClusterOutcome, ListingRequest, run_outcome};
use deck_core::commands::LauncherCommands;
use deck_core::wizard::Generation;

use crate::events::UiEvent;

/// Runs the create or import command of a finished wizard session.
pub async fn finish_cluster<B: LauncherCommands>(
    backend: Arc<B>,
    generation: Generation,
    outcome: ClusterOutcome,
) -> UiEvent {
    let result = run_outcome(backend.as_ref(), outcome).await;
    UiEvent::ClusterFinished { generation, result }
}

/// Lists another launcher's instances for the import step.
pub async fn list_candidates<B: LauncherCommands>(
    backend: Arc<B>,
    request: ListingRequest,
) -> UiEvent {
    let result = backend
        .list_import_candidates(request.kind, request.base_path)
        .await;
    UiEvent::CandidatesListed {
        request: request.id,
        result,
    }
}

pub async fn load_clusters<B: LauncherCommands>(backend: Arc<B>) -> UiEvent {
    UiEvent::ClustersLoaded(backend.list_clusters().await)
}
