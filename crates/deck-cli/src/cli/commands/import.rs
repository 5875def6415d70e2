//! Import command handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use deck_core::backend::LocalBackend;
use deck_core::cluster::ImportKind;
use deck_core::commands::LauncherCommands;
use deck_core::config::Config;

pub async fn scan(config: &Config, kind: ImportKind, path: Option<PathBuf>) -> Result<()> {
    let backend = LocalBackend::from_config(config);
    let candidates = backend
        .list_import_candidates(kind, path)
        .await
        .with_context(|| format!("scan {} instances", kind.display_name()))?;
    if candidates.is_empty() {
        println!("No {} instances found.", kind.display_name());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Version", "Loader", "Path"]);
    for candidate in &candidates {
        table.add_row(vec![
            candidate.name.clone(),
            candidate.mc_version.clone().unwrap_or_else(|| "?".to_string()),
            candidate
                .mod_loader
                .map_or("?", |loader| loader.display_name())
                .to_string(),
            candidate.path.display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
