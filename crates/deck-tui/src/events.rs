//! UI event types.
//!
//! All external inputs (terminal, async backend results) are converted to
//! `UiEvent` before being processed by the reducer. Async results arrive
//! through the runtime's inbox.

use crossterm::event::Event as CrosstermEvent;
use deck_core::cluster::{ClusterSummary, FinishOutput, ImportCandidate};
use deck_core::commands::CommandError;
use deck_core::wizard::Generation;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; drives spinner animation and rendering.
    Tick,

    /// Current terminal size, sent before other events each loop.
    Frame { width: u16, height: u16 },

    Terminal(CrosstermEvent),

    /// The create/import command for a wizard session returned.
    ClusterFinished {
        generation: Generation,
        result: Result<FinishOutput, CommandError>,
    },

    /// Import candidates listed for the listing request `request`.
    CandidatesListed {
        request: u64,
        result: Result<Vec<ImportCandidate>, CommandError>,
    },

    ClustersLoaded(Result<Vec<ClusterSummary>, CommandError>),
}
