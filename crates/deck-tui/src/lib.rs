//! Full-screen TUI for Deck.

pub mod common;
pub mod effects;
pub mod events;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use deck_core::commands::LauncherCommands;
use deck_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive launcher until the user quits.
///
/// Must be called from within a multi-threaded tokio runtime; backend
/// commands are spawned onto it while the UI loop blocks on terminal input.
pub fn run_launcher<B: LauncherCommands>(config: &Config, backend: B) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The launcher UI requires a terminal.\n\
             Use `deck clusters list` or `deck import scan <launcher>` instead."
        );
    }

    tracing::info!(clusters_dir = %config.clusters_dir().display(), "starting launcher UI");
    let mut runtime = TuiRuntime::new(config.clone(), backend)?;
    runtime.run()?;
    tracing::info!("launcher UI closed");
    Ok(())
}
