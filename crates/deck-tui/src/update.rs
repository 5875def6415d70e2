//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use deck_core::cluster::FinishOutput;
use deck_core::commands::CommandError;
use deck_core::overlay::OverlayId;
use deck_core::wizard::{Completion, Generation};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::mutations::StateMutation;
use crate::overlays::{self, ConfirmState, Overlay, OverlayRequest, OverlayTransition};
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let mut effects = match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.tui.terminal_size = (width, height);
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) => handle_key(app, key),
        UiEvent::Terminal(_) => vec![],
        UiEvent::ClusterFinished { generation, result } => {
            handle_cluster_finished(app, generation, result)
        }
        UiEvent::CandidatesListed { request, result } => {
            app.tui.wizard.set_candidates(request, result);
            vec![]
        }
        UiEvent::ClustersLoaded(result) => {
            app.tui.clusters_loading = false;
            match result {
                Ok(clusters) => {
                    app.tui.clusters = clusters;
                    app.tui.cluster_cursor = app
                        .tui
                        .cluster_cursor
                        .min(app.tui.clusters.len().saturating_sub(1));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load clusters");
                    app.tui.status = Some(format!("Failed to load clusters: {err}"));
                }
            }
            vec![]
        }
    };

    // Import step entered or rescanned: run its listing.
    if let Some(request) = app.tui.wizard.take_listing_request() {
        effects.push(UiEffect::ListImportCandidates { request });
    }
    effects
}

fn handle_cluster_finished(
    app: &mut AppState,
    generation: Generation,
    result: Result<FinishOutput, CommandError>,
) -> Vec<UiEffect> {
    app.tui.commands_in_flight = app.tui.commands_in_flight.saturating_sub(1);
    let succeeded = result.is_ok();

    match app.tui.wizard.complete(generation, result, &mut app.overlays) {
        Completion::Done(output) => {
            app.tui.wizard_error = None;
            app.tui.status = Some(match output {
                FinishOutput::Created(id) => format!("Cluster created ({id})"),
                FinishOutput::Imported(count) => format!("Imported {count} instance(s)"),
            });
            vec![UiEffect::RefreshClusters]
        }
        Completion::Failed(err) => {
            tracing::warn!(%generation, error = %err, "cluster command failed");
            app.tui.wizard_error = None;
            vec![]
        }
        // The session is gone, but the command may still have changed the
        // cluster list.
        Completion::Stale if succeeded => vec![UiEffect::RefreshClusters],
        Completion::Stale => vec![],
    }
}

// ============================================================================
// Overlay updates and mutations
// ============================================================================

fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::CancelWizard => {
                app.tui.wizard.cancel(&mut app.overlays);
                app.tui.wizard_error = None;
            }
            StateMutation::WizardBack => {
                app.tui.wizard.previous(&mut app.overlays);
            }
            StateMutation::SetStatus(status) => app.tui.status = Some(status),
        }
    }
}

fn apply_overlay_update(
    app: &mut AppState,
    id: OverlayId,
    update: overlays::OverlayUpdate,
) -> Vec<UiEffect> {
    match update.transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => {
            app.overlays.remove(id);
        }
        OverlayTransition::Open(request) => open_overlay_request(app, request),
    }
    apply_mutations(app, update.mutations);
    update.effects
}

fn open_overlay_request(app: &mut AppState, request: OverlayRequest) {
    match request {
        OverlayRequest::Confirm(state) => {
            app.overlays.push(Overlay::Confirm(state));
        }
    }
}

// ============================================================================
// Key handling
// ============================================================================

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Only the top overlay sees keys.
    if let Some((id, update)) = overlays::handle_overlay_key(app, key) {
        return apply_overlay_update(app, id, update);
    }
    handle_main_key(app, key)
}

fn handle_main_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Char('q') || (ctrl && key.code == KeyCode::Char('c')) {
        return request_quit(app);
    }

    let tui = &mut app.tui;
    match key.code {
        KeyCode::Char('n') => {
            tui.status = None;
            tui.wizard_error = None;
            tui.wizard.start(&mut app.overlays);
            vec![]
        }
        KeyCode::Char('r') => {
            tui.clusters_loading = true;
            vec![UiEffect::RefreshClusters]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            tui.cluster_cursor = tui.cluster_cursor.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = tui.clusters.len().saturating_sub(1);
            tui.cluster_cursor = (tui.cluster_cursor + 1).min(last);
            vec![]
        }
        _ => vec![],
    }
}

/// Quits right away unless create/import commands are still running.
fn request_quit(app: &mut AppState) -> Vec<UiEffect> {
    let in_flight = app.tui.commands_in_flight;
    if in_flight == 0 {
        return vec![UiEffect::Quit];
    }
    app.overlays.push(Overlay::Confirm(ConfirmState::quit(in_flight)));
    vec![]
}
