use std::path::PathBuf;

use super::model::{ImportCandidate, ImportKind, ModLoader, NewCluster, Provider};
use crate::wizard::{TerminalOutcome, Transition, ValidationError, WizardFlow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterStage {
    ProviderSelection,
    GameSetup,
    ImportSelection,
}

impl ClusterStage {
    pub fn title(self) -> &'static str {
        match self {
            ClusterStage::ProviderSelection => "Choose a provider",
            ClusterStage::GameSetup => "Game setup",
            ClusterStage::ImportSelection => "Import instances",
        }
    }
}

/// Partial cluster accumulated across the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterDraft {
    pub name: Option<String>,
    pub mc_version: Option<String>,
    pub mod_loader: Option<ModLoader>,
    pub loader_version: Option<String>,
    pub provider: Option<Provider>,
    pub icon: Option<String>,
}

impl ClusterDraft {
    pub fn is_empty(&self) -> bool {
        *self == ClusterDraft::default()
    }

    /// Name with surrounding whitespace removed, if it has any content.
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One keyed draft update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterField {
    Name(String),
    McVersion(String),
    ModLoader(ModLoader),
    LoaderVersion(String),
    Provider(Provider),
    Icon(String),
}

/// Alternative outcome of the import stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub kind: ImportKind,
    pub base_path: Option<PathBuf>,
    pub selection: Vec<ImportCandidate>,
}

pub type ClusterOutcome = TerminalOutcome<NewCluster, ImportRequest>;

/// Stage graph of the "new cluster" wizard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterFlow;

impl WizardFlow for ClusterFlow {
    type Stage = ClusterStage;
    type Draft = ClusterDraft;
    type Field = ClusterField;
    type Create = NewCluster;
    type Alternative = ImportRequest;

    fn initial_stage(&self) -> ClusterStage {
        ClusterStage::ProviderSelection
    }

    fn transition(&self, stage: ClusterStage, draft: &ClusterDraft) -> Transition<ClusterStage> {
        match stage {
            ClusterStage::ProviderSelection => match draft.provider {
                Some(Provider::Import) => Transition::To(ClusterStage::ImportSelection),
                Some(Provider::New | Provider::Modrinth | Provider::Curseforge) => {
                    Transition::To(ClusterStage::GameSetup)
                }
                None => Transition::Undecided,
            },
            ClusterStage::GameSetup | ClusterStage::ImportSelection => Transition::Terminal,
        }
    }

    fn apply(&self, draft: &mut ClusterDraft, field: ClusterField) {
        match field {
            ClusterField::Name(name) => draft.name = Some(name),
            ClusterField::McVersion(version) => draft.mc_version = Some(version),
            ClusterField::ModLoader(loader) => draft.mod_loader = Some(loader),
            ClusterField::LoaderVersion(version) => draft.loader_version = Some(version),
            ClusterField::Provider(provider) => draft.provider = Some(provider),
            ClusterField::Icon(icon) => draft.icon = Some(icon),
        }
    }

    fn validate(&self, draft: &ClusterDraft) -> Result<NewCluster, ValidationError> {
        let name = draft
            .trimmed_name()
            .ok_or(ValidationError::MissingField("name"))?;
        let mc_version = draft
            .mc_version
            .clone()
            .ok_or(ValidationError::MissingField("mc_version"))?;
        let mod_loader = draft
            .mod_loader
            .ok_or(ValidationError::MissingField("mod_loader"))?;

        Ok(NewCluster {
            name: name.to_string(),
            mc_version,
            mod_loader,
            loader_version: draft
                .loader_version
                .clone()
                .unwrap_or_else(|| NewCluster::LATEST_LOADER.to_string()),
            provider: draft.provider.unwrap_or(Provider::New),
            icon: draft.icon.clone(),
        })
    }

    fn validate_alternative(&self, request: &ImportRequest) -> Result<(), ValidationError> {
        if request.selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        Ok(())
    }
}
