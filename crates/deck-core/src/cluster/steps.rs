//! Step content of the cluster wizard.
//!
//! Each step keeps its own interaction state (cursors, text buffers, loaded
//! candidates) and talks to the engine only through a `StepContext`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::flow::{ClusterDraft, ClusterField, ClusterFlow, ImportRequest};
use super::model::{ImportCandidate, ImportKind, ModLoader, Provider};
use crate::commands::CommandError;
use crate::wizard::{Step, StepContext};

type Ctx<'a> = StepContext<'a, ClusterFlow>;

// ============================================================================
// Provider selection
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProviderSelectionStep {
    pub cursor: usize,
}

impl ProviderSelectionStep {
    pub fn highlighted(&self) -> Provider {
        Provider::all()[self.cursor.min(Provider::all().len() - 1)]
    }

    pub fn move_cursor(&mut self, down: bool) {
        let last = Provider::all().len() - 1;
        self.cursor = if down {
            (self.cursor + 1).min(last)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    /// Records the provider; this is what decides the next stage.
    pub fn choose(&mut self, ctx: &mut Ctx<'_>, provider: Provider) {
        if let Some(index) = Provider::all().iter().position(|p| *p == provider) {
            self.cursor = index;
        }
        ctx.update_draft(ClusterField::Provider(provider));
        ctx.set_ready(true);
    }
}

impl Step<ClusterFlow> for ProviderSelectionStep {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(provider) = ctx.draft().provider
            && let Some(index) = Provider::all().iter().position(|p| *p == provider)
        {
            self.cursor = index;
        }
        let ready = ctx.draft().provider.is_some();
        ctx.set_ready(ready);
    }
}

// ============================================================================
// Game setup
// ============================================================================

/// Which control of the setup step has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupFocus {
    #[default]
    Name,
    Version,
    Loader,
}

impl SetupFocus {
    pub fn next(self) -> SetupFocus {
        match self {
            SetupFocus::Name => SetupFocus::Version,
            SetupFocus::Version => SetupFocus::Loader,
            SetupFocus::Loader => SetupFocus::Name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSetupStep {
    pub name: String,
    pub versions: Vec<String>,
    pub version_cursor: usize,
    pub loader_cursor: usize,
    pub focus: SetupFocus,
    default_loader: ModLoader,
}

impl GameSetupStep {
    pub fn new(versions: Vec<String>, default_loader: ModLoader) -> Self {
        let loader_cursor = ModLoader::all()
            .iter()
            .position(|l| *l == default_loader)
            .unwrap_or(0);
        Self {
            name: String::new(),
            versions,
            version_cursor: 0,
            loader_cursor,
            focus: SetupFocus::Name,
            default_loader,
        }
    }

    pub fn is_complete(draft: &ClusterDraft) -> bool {
        draft.trimmed_name().is_some() && draft.mc_version.is_some() && draft.mod_loader.is_some()
    }

    pub fn set_name(&mut self, ctx: &mut Ctx<'_>, name: String) {
        self.name.clone_from(&name);
        ctx.update_draft(ClusterField::Name(name));
        Self::refresh(ctx);
    }

    pub fn input_char(&mut self, ctx: &mut Ctx<'_>, c: char) {
        let mut name = self.name.clone();
        name.push(c);
        self.set_name(ctx, name);
    }

    pub fn backspace(&mut self, ctx: &mut Ctx<'_>) {
        let mut name = self.name.clone();
        name.pop();
        self.set_name(ctx, name);
    }

    pub fn select_version(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let Some(version) = self.versions.get(index) else {
            return;
        };
        self.version_cursor = index;
        ctx.update_draft(ClusterField::McVersion(version.clone()));
        Self::refresh(ctx);
    }

    /// Sets a version that is not in the preset list.
    pub fn set_version(&mut self, ctx: &mut Ctx<'_>, version: String) {
        if let Some(index) = self.versions.iter().position(|v| *v == version) {
            self.version_cursor = index;
        }
        ctx.update_draft(ClusterField::McVersion(version));
        Self::refresh(ctx);
    }

    pub fn select_loader(&mut self, ctx: &mut Ctx<'_>, loader: ModLoader) {
        if let Some(index) = ModLoader::all().iter().position(|l| *l == loader) {
            self.loader_cursor = index;
        }
        ctx.update_draft(ClusterField::ModLoader(loader));
        Self::refresh(ctx);
    }

    pub fn selected_loader(&self) -> ModLoader {
        ModLoader::all()
            .get(self.loader_cursor)
            .copied()
            .unwrap_or(self.default_loader)
    }

    fn refresh(ctx: &mut Ctx<'_>) {
        let ready = Self::is_complete(ctx.draft());
        ctx.set_ready(ready);
    }
}

impl Step<ClusterFlow> for GameSetupStep {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>) {
        self.name = ctx.draft().name.clone().unwrap_or_default();

        match ctx.draft().mc_version.clone() {
            Some(version) => {
                if let Some(index) = self.versions.iter().position(|v| *v == version) {
                    self.version_cursor = index;
                }
            }
            None => {
                if let Some(version) = self.versions.get(self.version_cursor).cloned() {
                    ctx.update_draft(ClusterField::McVersion(version));
                }
            }
        }

        let loader = ctx.draft().mod_loader;
        match loader {
            Some(loader) => {
                if let Some(index) = ModLoader::all().iter().position(|l| *l == loader) {
                    self.loader_cursor = index;
                }
            }
            None => ctx.update_draft(ClusterField::ModLoader(self.selected_loader())),
        }

        Self::refresh(ctx);
    }
}

// ============================================================================
// Import selection
// ============================================================================

/// Progress of the candidate listing for the import step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Listing {
    #[default]
    Idle,
    Loading(u64),
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ImportSelectionStep {
    pub kind: ImportKind,
    pub base_path: Option<PathBuf>,
    pub candidates: Vec<ImportCandidate>,
    pub selected: BTreeSet<usize>,
    pub cursor: usize,
    pub listing: Listing,
}

impl ImportSelectionStep {
    pub fn new(kind: ImportKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Drops loaded candidates and waits for the listing `request`.
    pub fn begin_listing(&mut self, request: u64) {
        self.candidates.clear();
        self.selected.clear();
        self.cursor = 0;
        self.listing = Listing::Loading(request);
    }

    /// Applies a listing result. Results for other requests are ignored.
    pub fn set_candidates(
        &mut self,
        ctx: &mut Ctx<'_>,
        request: u64,
        result: Result<Vec<ImportCandidate>, CommandError>,
    ) -> bool {
        if self.listing != Listing::Loading(request) {
            tracing::debug!(request, "stale import listing ignored");
            return false;
        }
        match result {
            Ok(candidates) => {
                self.candidates = candidates;
                self.listing = Listing::Loaded;
            }
            Err(err) => {
                self.listing = Listing::Failed(err.to_string());
            }
        }
        self.refresh(ctx);
        true
    }

    pub fn move_cursor(&mut self, down: bool) {
        let last = self.candidates.len().saturating_sub(1);
        self.cursor = if down {
            (self.cursor + 1).min(last)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    pub fn toggle(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        if index >= self.candidates.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.refresh(ctx);
    }

    pub fn selection(&self) -> Vec<ImportCandidate> {
        self.selected
            .iter()
            .filter_map(|index| self.candidates.get(*index).cloned())
            .collect()
    }

    fn refresh(&self, ctx: &mut Ctx<'_>) {
        ctx.set_ready(!self.selected.is_empty());
        ctx.set_alternative(ImportRequest {
            kind: self.kind,
            base_path: self.base_path.clone(),
            selection: self.selection(),
        });
    }
}

impl Step<ClusterFlow> for ImportSelectionStep {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>) {
        self.refresh(ctx);
    }
}
