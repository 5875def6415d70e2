//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── clusters          (main view list)
//! │   ├── wizard            (cluster wizard session, steps, draft)
//! │   └── status, counters  (status line, in-flight commands)
//! └── overlays: OverlayStack<Overlay>
//! ```
//!
//! The overlay stack is kept apart from `TuiState` so overlay handlers can
//! get `&mut TuiState` while the reducer holds the stack.

use deck_core::cluster::{ClusterSummary, ClusterWizard};
use deck_core::config::Config;
use deck_core::overlay::{OverlayHandle, OverlayStack};
use deck_core::wizard::ValidationError;

use crate::overlays::Overlay;

pub struct AppState {
    pub tui: TuiState,
    pub overlays: OverlayStack<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlays: OverlayStack::new(),
        }
    }
}

/// Non-overlay UI state.
pub struct TuiState {
    pub should_quit: bool,
    pub config: Config,

    pub clusters: Vec<ClusterSummary>,
    pub cluster_cursor: usize,
    pub clusters_loading: bool,

    pub wizard: ClusterWizard<Overlay>,
    /// Last rejected finish, shown in the wizard overlay.
    pub wizard_error: Option<ValidationError>,

    /// Create/import commands still running, including ones whose wizard
    /// session was cancelled.
    pub commands_in_flight: usize,

    pub status: Option<String>,
    pub spinner_frame: usize,
    pub terminal_size: (u16, u16),
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        let wizard = ClusterWizard::new(
            config.wizard_defaults(),
            OverlayHandle::new(|_| Overlay::ClusterWizard),
        );
        Self {
            should_quit: false,
            config,
            clusters: Vec::new(),
            cluster_cursor: 0,
            clusters_loading: false,
            wizard,
            wizard_error: None,
            commands_in_flight: 0,
            status: None,
            spinner_frame: 0,
            terminal_size: (0, 0),
        }
    }

    pub fn selected_cluster(&self) -> Option<&ClusterSummary> {
        self.clusters.get(self.cluster_cursor)
    }

    pub fn spinner(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[(self.spinner_frame / 4) % FRAMES.len()]
    }
}
