//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard
//! input. They live on an `OverlayStack`; only the top entry is rendered and
//! receives keys.
//!
//! ## Module Structure
//!
//! - `cluster_wizard/`: "New cluster" wizard (state lives in `TuiState::wizard`)
//! - `confirm.rs`: Yes/no confirmation, stacked on top of another overlay
//! - `render_utils.rs`: Shared rendering utilities for overlays

pub mod cluster_wizard;
pub mod confirm;
pub mod render_utils;

pub use confirm::{ConfirmAction, ConfirmState};
use crossterm::event::KeyEvent;
use deck_core::overlay::OverlayId;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::state::{AppState, TuiState};

// ============================================================================
// OverlayRequest / OverlayTransition / OverlayUpdate
// ============================================================================

/// Requests to open a new overlay on top of the current one.
#[derive(Debug)]
pub enum OverlayRequest {
    Confirm(ConfirmState),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    /// Remove the overlay that handled the key.
    Close,
    Open(OverlayRequest),
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

// ============================================================================
// Overlay
// ============================================================================

#[derive(Debug)]
pub enum Overlay {
    /// Presentation of the cluster wizard session.
    ClusterWizard,
    Confirm(ConfirmState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        match self {
            Overlay::ClusterWizard => cluster_wizard::render(frame, area, tui),
            Overlay::Confirm(c) => c.render(frame, area),
        }
    }
}

/// Dispatches a key to the top overlay.
///
/// Returns `None` when no overlay is shown.
pub fn handle_overlay_key(app: &mut AppState, key: KeyEvent) -> Option<(OverlayId, OverlayUpdate)> {
    let (id, is_wizard) = {
        let top = app.overlays.current()?;
        (top.id, matches!(top.render, Overlay::ClusterWizard))
    };

    let update = if is_wizard {
        cluster_wizard::handle_key(&mut app.tui, key)
    } else {
        match app.overlays.get_mut(id) {
            Some(Overlay::Confirm(c)) => c.handle_key(key),
            _ => OverlayUpdate::stay(),
        }
    };
    Some((id, update))
}
