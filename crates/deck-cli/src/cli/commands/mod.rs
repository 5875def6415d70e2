//! CLI command handlers.

pub mod clusters;
pub mod config;
pub mod import;
pub mod launcher;
