//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).

use deck_core::cluster::{ClusterOutcome, ListingRequest};
use deck_core::wizard::Generation;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Run the create or import command of a finished wizard session.
    FinishCluster {
        generation: Generation,
        outcome: ClusterOutcome,
    },

    /// List another launcher's instances for the import step.
    ListImportCandidates { request: ListingRequest },

    /// Reload the cluster list for the main view.
    RefreshClusters,
}
