//! Interactive launcher command.

use anyhow::{Context, Result};
use deck_core::backend::LocalBackend;
use deck_core::config::Config;

pub fn run(config: &Config) -> Result<()> {
    let backend = LocalBackend::from_config(config);
    deck_tui::run_launcher(config, backend).context("launcher UI failed")
}
