//! Tracing setup.
//!
//! The launcher UI owns the terminal, so it logs to a daily rolling file
//! under `$DECK_HOME/logs`. Plain subcommands log to stderr.
//!
//! Filter precedence: `DECK_LOG`, then `log_level` from config.toml.

use std::fs;
use std::io;

use anyhow::{Context, Result};
use deck_core::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_ENV: &str = "DECK_LOG";
const LOG_FILE_PREFIX: &str = "deck.log";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// File logging for the UI. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init_file(default_level: &str) -> Result<WorkerGuard> {
    let log_dir = paths::logs_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(env_filter(default_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    tracing::debug!(dir = %log_dir.display(), "file logging initialized");
    Ok(guard)
}

/// Stderr logging for non-interactive subcommands.
pub fn init_stderr(default_level: &str) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
