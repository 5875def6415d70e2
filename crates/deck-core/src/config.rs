//! Configuration management for Deck.
//!
//! Loads configuration from ${DECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cluster::{ImportKind, ModLoader, WizardDefaults};

/// Default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Deck configuration and data directories.
    //!
    //! DECK_HOME resolution order:
    //! 1. DECK_HOME environment variable (if set)
    //! 2. ~/.config/deck (default)
    //! 3. ./.deck when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the Deck home directory.
    pub fn deck_home() -> PathBuf {
        if let Ok(home) = std::env::var("DECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".deck"),
            |h| h.join(".config").join("deck"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        deck_home().join("config.toml")
    }

    /// Returns the directory rolling log files go to.
    pub fn logs_dir() -> PathBuf {
        deck_home().join("logs")
    }
}

/// Per-launcher base-path overrides for import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPaths {
    pub prism: Option<PathBuf>,
    pub multimc: Option<PathBuf>,
    pub curseforge: Option<PathBuf>,
    pub modrinth: Option<PathBuf>,
    pub atlauncher: Option<PathBuf>,
}

impl ImportPaths {
    pub fn get(&self, kind: ImportKind) -> Option<&Path> {
        let path = match kind {
            ImportKind::Prism => &self.prism,
            ImportKind::MultiMc => &self.multimc,
            ImportKind::Curseforge => &self.curseforge,
            ImportKind::Modrinth => &self.modrinth,
            ImportKind::AtLauncher => &self.atlauncher,
        };
        path.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for cluster storage. `None` means `$DECK_HOME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub default_loader: ModLoader,
    pub game_versions: Vec<String>,
    pub import: ImportPaths,
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_GAME_VERSIONS: &[&str] = &[
        "1.21.4", "1.21.1", "1.20.6", "1.20.4", "1.20.1", "1.19.4", "1.18.2", "1.16.5", "1.12.2",
    ];

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            if config.game_versions.iter().all(|v| v.trim().is_empty()) {
                anyhow::bail!(
                    "Invalid config at {}: game_versions must list at least one version",
                    path.display()
                );
            }
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::deck_home)
    }

    pub fn clusters_dir(&self) -> PathBuf {
        self.data_dir().join("clusters")
    }

    /// Starting values for the cluster wizard. Falls back to the built-in
    /// version list when none are configured.
    pub fn wizard_defaults(&self) -> WizardDefaults {
        let mut versions: Vec<String> = self
            .game_versions
            .iter()
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .collect();
        if versions.is_empty() {
            versions = Self::DEFAULT_GAME_VERSIONS
                .iter()
                .map(ToString::to_string)
                .collect();
        }
        WizardDefaults {
            versions,
            default_loader: self.default_loader,
            import_kind: ImportKind::default(),
            import_base_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            default_loader: ModLoader::default(),
            game_versions: Self::DEFAULT_GAME_VERSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            import: ImportPaths::default(),
        }
    }
}
