use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mod loader a cluster runs with. `Vanilla` means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModLoader {
    #[default]
    Vanilla,
    Fabric,
    Forge,
    NeoForge,
    Quilt,
}

impl ModLoader {
    pub fn all() -> &'static [ModLoader] {
        &[
            ModLoader::Vanilla,
            ModLoader::Fabric,
            ModLoader::Forge,
            ModLoader::NeoForge,
            ModLoader::Quilt,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            ModLoader::Vanilla => "vanilla",
            ModLoader::Fabric => "fabric",
            ModLoader::Forge => "forge",
            ModLoader::NeoForge => "neoforge",
            ModLoader::Quilt => "quilt",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModLoader::Vanilla => "Vanilla",
            ModLoader::Fabric => "Fabric",
            ModLoader::Forge => "Forge",
            ModLoader::NeoForge => "NeoForge",
            ModLoader::Quilt => "Quilt",
        }
    }
}

impl std::fmt::Display for ModLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModLoader {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ModLoader::all()
            .iter()
            .copied()
            .find(|loader| loader.id() == needle)
            .ok_or_else(|| format!("unknown mod loader: {s}"))
    }
}

/// Content source picked on the first wizard stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    New,
    Modrinth,
    Curseforge,
    Import,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[
            Provider::New,
            Provider::Modrinth,
            Provider::Curseforge,
            Provider::Import,
        ]
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::New => "New",
            Provider::Modrinth => "Modrinth",
            Provider::Curseforge => "Curseforge",
            Provider::Import => "Import",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Provider::New => "Start from an empty cluster",
            Provider::Modrinth => "Base the cluster on a Modrinth pack",
            Provider::Curseforge => "Base the cluster on a Curseforge pack",
            Provider::Import => "Bring instances over from another launcher",
        }
    }
}

/// Launcher whose instances can be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    #[default]
    Prism,
    MultiMc,
    Curseforge,
    Modrinth,
    AtLauncher,
}

impl ImportKind {
    pub fn all() -> &'static [ImportKind] {
        &[
            ImportKind::Prism,
            ImportKind::MultiMc,
            ImportKind::Curseforge,
            ImportKind::Modrinth,
            ImportKind::AtLauncher,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            ImportKind::Prism => "prism",
            ImportKind::MultiMc => "multimc",
            ImportKind::Curseforge => "curseforge",
            ImportKind::Modrinth => "modrinth",
            ImportKind::AtLauncher => "atlauncher",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ImportKind::Prism => "Prism Launcher",
            ImportKind::MultiMc => "MultiMC",
            ImportKind::Curseforge => "Curseforge App",
            ImportKind::Modrinth => "Modrinth App",
            ImportKind::AtLauncher => "ATLauncher",
        }
    }

    /// The next kind in `all()`, wrapping.
    pub fn cycle(self) -> ImportKind {
        let all = ImportKind::all();
        let index = all.iter().position(|kind| *kind == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ImportKind::all()
            .iter()
            .copied()
            .find(|kind| kind.id() == needle)
            .ok_or_else(|| format!("unknown launcher: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub Uuid);

impl ClusterId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything `create_cluster` receives: the validated draft plus defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCluster {
    pub name: String,
    pub mc_version: String,
    pub mod_loader: ModLoader,
    pub loader_version: String,
    pub provider: Provider,
    pub icon: Option<String>,
}

impl NewCluster {
    pub const LATEST_LOADER: &str = "latest";
}

/// An instance of another launcher found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    pub name: String,
    pub path: PathBuf,
    pub mc_version: Option<String>,
    pub mod_loader: Option<ModLoader>,
}

/// Row of the cluster list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub name: String,
    pub mc_version: String,
    pub mod_loader: ModLoader,
    pub imported_from: Option<ImportKind>,
    pub path: PathBuf,
}
