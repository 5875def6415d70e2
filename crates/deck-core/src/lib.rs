//! Core Deck library (overlay stack, wizard engine, cluster wizard, backend, config).

pub mod backend;
pub mod cluster;
pub mod commands;
pub mod config;
pub mod overlay;
pub mod wizard;
