//! Cluster wizard overlay.
//!
//! The session itself (stages, draft, step state) lives in
//! `TuiState::wizard`; this module maps keys onto it and draws the active
//! stage. Each stage has its own file with a `handle_key` and a `render`.
//!
//! Keys shared by every stage:
//! - `Esc` goes back one stage; on the first stage it discards the session
//! - `Ctrl+C` discards the session from any stage
//!
//! Discarding a session with a non-empty draft asks for confirmation first.

mod game_setup;
mod import;
mod provider;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use deck_core::cluster::ClusterStage;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{InputHint, Popup, render_separator};
use super::{ConfirmState, OverlayRequest, OverlayUpdate};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::state::TuiState;

const BORDER: Color = Color::Cyan;

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return request_discard(tui);
    }
    if key.code == KeyCode::Esc {
        let engine = tui.wizard.engine();
        if engine.stages().len() > 1 && !engine.is_finishing() {
            tui.wizard_error = None;
            return OverlayUpdate::stay().with_mutations(vec![StateMutation::WizardBack]);
        }
        return request_discard(tui);
    }
    if tui.wizard.engine().is_finishing() {
        return OverlayUpdate::stay();
    }

    tui.wizard_error = None;
    match tui.wizard.active_stage() {
        Some(ClusterStage::ProviderSelection) => provider::handle_key(tui, key),
        Some(ClusterStage::GameSetup) => game_setup::handle_key(tui, key),
        Some(ClusterStage::ImportSelection) => import::handle_key(tui, key),
        None => OverlayUpdate::stay(),
    }
}

fn request_discard(tui: &TuiState) -> OverlayUpdate {
    if tui.wizard.draft().is_empty() {
        OverlayUpdate::stay().with_mutations(vec![StateMutation::CancelWizard])
    } else {
        OverlayUpdate::open(OverlayRequest::Confirm(ConfirmState::discard_cluster()))
    }
}

/// Finishes the session, handing the outcome to the runtime.
fn finish(tui: &mut TuiState) -> OverlayUpdate {
    match tui.wizard.finish() {
        Ok(Some(ticket)) => {
            tui.commands_in_flight += 1;
            OverlayUpdate::stay().with_ui_effects(vec![UiEffect::FinishCluster {
                generation: ticket.generation,
                outcome: ticket.outcome,
            }])
        }
        Ok(None) => OverlayUpdate::stay(),
        Err(err) => {
            tui.wizard_error = Some(err);
            OverlayUpdate::stay()
        }
    }
}

// ============================================================================
// Render
// ============================================================================

pub fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(stage) = tui.wizard.active_stage() else {
        return;
    };

    let hints: &[InputHint] = match stage {
        ClusterStage::ProviderSelection => &provider::HINTS,
        ClusterStage::GameSetup => &game_setup::HINTS,
        ClusterStage::ImportSelection => &import::HINTS,
    };
    let step = tui.wizard.engine().stages().len();
    let title = format!("New cluster · {step}. {}", stage.title());
    let body = Popup {
        title: &title,
        accent: BORDER,
        width: 64,
        height: 18,
        hints,
    }
    .render(frame, area);

    // Bottom two body rows: separator and status.
    let content_height = body.height.saturating_sub(2);
    let content = Rect::new(body.x, body.y, body.width, content_height);
    match stage {
        ClusterStage::ProviderSelection => provider::render(frame, content, tui),
        ClusterStage::GameSetup => game_setup::render(frame, content, tui),
        ClusterStage::ImportSelection => import::render(frame, content, tui),
    }

    if body.height < 2 {
        return;
    }
    render_separator(frame, Rect::new(body.x, body.y + content_height, body.width, 1));
    let status_area = Rect::new(body.x, body.y + content_height + 1, body.width, 1);
    frame.render_widget(Paragraph::new(status_line(tui)), status_area);
}

fn status_line(tui: &TuiState) -> Line<'static> {
    let engine = tui.wizard.engine();
    if engine.is_finishing() {
        return Line::from(Span::styled(
            format!("{} Working…", tui.spinner()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(error) = &tui.wizard_error {
        return Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(error) = engine.last_error() {
        return Line::from(Span::styled(
            format!("Failed: {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    if engine.is_ready() {
        Line::from(Span::styled("Ready", Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled(
            "Complete this step to continue",
            Style::default().fg(Color::DarkGray),
        ))
    }
}
