//! Asynchronous command surface to the launcher backend.
//!
//! Everything behind this trait (cluster creation, instance import, listing)
//! is opaque to the wizard. The TUI runtime spawns these futures and reports
//! the results back to the reducer.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::cluster::{ClusterId, ClusterSummary, ImportCandidate, ImportKind, NewCluster};

/// Category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorKind {
    Io,
    NotFound,
    AlreadyExists,
    InvalidData,
}

impl std::fmt::Display for CommandErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CommandErrorKind::Io => "I/O error",
            CommandErrorKind::NotFound => "not found",
            CommandErrorKind::AlreadyExists => "already exists",
            CommandErrorKind::InvalidData => "invalid data",
        };
        f.write_str(label)
    }
}

/// A backend command rejected the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::NotFound, message)
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::InvalidData, message)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => CommandErrorKind::NotFound,
            std::io::ErrorKind::AlreadyExists => CommandErrorKind::AlreadyExists,
            _ => CommandErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<walkdir::Error> for CommandError {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => io.into(),
            None => Self::new(CommandErrorKind::Io, "filesystem loop while copying"),
        }
    }
}

/// Backend operations the launcher UI depends on.
pub trait LauncherCommands: Send + Sync + 'static {
    /// Creates a cluster from a validated wizard draft.
    fn create_cluster(
        &self,
        cluster: NewCluster,
    ) -> impl Future<Output = Result<ClusterId, CommandError>> + Send;

    /// Lists instances of another launcher that can be imported.
    ///
    /// `base_path` of `None` means the launcher's usual location.
    fn list_import_candidates(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
    ) -> impl Future<Output = Result<Vec<ImportCandidate>, CommandError>> + Send;

    /// Imports the selected instances as clusters.
    fn import_instances(
        &self,
        kind: ImportKind,
        base_path: Option<PathBuf>,
        selection: Vec<ImportCandidate>,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;

    /// Lists existing clusters for the main view.
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<ClusterSummary>, CommandError>> + Send;
}
