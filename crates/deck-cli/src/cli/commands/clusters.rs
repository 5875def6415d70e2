//! Cluster command handlers.

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use deck_core::backend::LocalBackend;
use deck_core::commands::LauncherCommands;
use deck_core::config::Config;

pub async fn list(config: &Config) -> Result<()> {
    let backend = LocalBackend::from_config(config);
    let clusters = backend.list_clusters().await.context("list clusters")?;
    if clusters.is_empty() {
        println!("No clusters found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Version", "Loader", "Source", "Path"]);
    for cluster in &clusters {
        table.add_row(vec![
            cluster.name.clone(),
            cluster.mc_version.clone(),
            cluster.mod_loader.display_name().to_string(),
            cluster
                .imported_from
                .map_or("deck", |kind| kind.display_name())
                .to_string(),
            cluster.path.display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
