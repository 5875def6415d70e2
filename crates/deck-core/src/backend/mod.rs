//! Launcher backends.
//!
//! `LocalBackend` keeps clusters as directories on the local filesystem and
//! reads other launchers' instance folders for import.

mod local;
mod scan;

pub use local::{ClusterManifest, LocalBackend, slugify};
