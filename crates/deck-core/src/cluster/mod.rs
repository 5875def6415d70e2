//! "New cluster" wizard.
//!
//! Stage graph:
//!
//! ```text
//! ProviderSelection ──(New | Modrinth | Curseforge)──▶ GameSetup        (create)
//!                   └─────────(Import)──────────────▶ ImportSelection  (import)
//! ```
//!
//! `ClusterWizard` bundles the engine with the three steps and routes entry
//! signals to them. Step interactions only reach the step that is active.
//!
//! ## Module Structure
//!
//! - `model.rs`: domain values exchanged with the backend
//! - `flow.rs`: stages, draft, transition table, validation
//! - `steps.rs`: step content (`Step` implementations)

mod flow;
mod model;
mod steps;

use std::path::PathBuf;

pub use flow::{
    ClusterDraft, ClusterField, ClusterFlow, ClusterOutcome, ClusterStage, ImportRequest,
};
pub use model::{
    ClusterId, ClusterSummary, ImportCandidate, ImportKind, ModLoader, NewCluster, Provider,
};
pub use steps::{GameSetupStep, ImportSelectionStep, Listing, ProviderSelectionStep, SetupFocus};

use crate::commands::{CommandError, LauncherCommands};
use crate::overlay::{OverlayHandle, OverlayStack};
use crate::wizard::{
    Completion, FinishTicket, Generation, Step, StepContext, TerminalOutcome, ValidationError,
    WizardEngine,
};

/// Starting values for a session's steps.
#[derive(Debug, Clone)]
pub struct WizardDefaults {
    pub versions: Vec<String>,
    pub default_loader: ModLoader,
    pub import_kind: ImportKind,
    pub import_base_path: Option<PathBuf>,
}

/// Candidate listing the import step is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub id: u64,
    pub kind: ImportKind,
    pub base_path: Option<PathBuf>,
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutput {
    Created(ClusterId),
    Imported(usize),
}

pub struct ClusterWizard<R> {
    engine: WizardEngine<ClusterFlow, R>,
    defaults: WizardDefaults,
    pub provider: ProviderSelectionStep,
    pub setup: GameSetupStep,
    pub import: ImportSelectionStep,
    listing_seq: u64,
    listing_request: Option<ListingRequest>,
}

impl<R> ClusterWizard<R> {
    pub fn new(defaults: WizardDefaults, handle: OverlayHandle<R>) -> Self {
        Self {
            engine: WizardEngine::new(ClusterFlow, handle),
            provider: ProviderSelectionStep::default(),
            setup: GameSetupStep::new(defaults.versions.clone(), defaults.default_loader),
            import: Self::fresh_import(&defaults),
            defaults,
            listing_seq: 0,
            listing_request: None,
        }
    }

    fn fresh_import(defaults: &WizardDefaults) -> ImportSelectionStep {
        let mut step = ImportSelectionStep::new(defaults.import_kind);
        step.base_path.clone_from(&defaults.import_base_path);
        step
    }

    pub fn engine(&self) -> &WizardEngine<ClusterFlow, R> {
        &self.engine
    }

    pub fn draft(&self) -> &ClusterDraft {
        self.engine.draft()
    }

    pub fn active_stage(&self) -> Option<ClusterStage> {
        self.engine.active_stage()
    }

    pub fn is_open(&self) -> bool {
        self.engine.is_open()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn start(&mut self, overlays: &mut OverlayStack<R>) {
        self.provider = ProviderSelectionStep::default();
        self.setup = GameSetupStep::new(self.defaults.versions.clone(), self.defaults.default_loader);
        self.import = Self::fresh_import(&self.defaults);
        self.listing_request = None;
        self.engine.start(overlays);
        self.sync();
    }

    pub fn cancel(&mut self, overlays: &mut OverlayStack<R>) -> bool {
        self.listing_request = None;
        self.import.listing = Listing::Idle;
        self.engine.cancel(overlays)
    }

    pub fn previous(&mut self, overlays: &mut OverlayStack<R>) -> bool {
        let moved = self.engine.previous(overlays);
        if !self.engine.is_open() {
            self.listing_request = None;
            self.import.listing = Listing::Idle;
        }
        self.sync();
        moved
    }

    pub fn advance(&mut self, target: ClusterStage) -> bool {
        let moved = self.engine.advance(target);
        self.sync();
        moved
    }

    /// Forward action on a non-terminal stage.
    pub fn advance_next(&mut self) -> bool {
        let moved = self.engine.advance_next();
        self.sync();
        moved
    }

    pub fn update_draft(&mut self, field: ClusterField) -> bool {
        self.engine.update_draft(field)
    }

    pub fn finish(&mut self) -> Result<Option<FinishTicket<ClusterFlow>>, ValidationError> {
        self.engine.finish()
    }

    pub fn complete<T>(
        &mut self,
        generation: Generation,
        result: Result<T, CommandError>,
        overlays: &mut OverlayStack<R>,
    ) -> Completion<T> {
        self.engine.complete(generation, result, overlays)
    }

    // ========================================================================
    // Step interactions
    // ========================================================================

    pub fn choose_provider(&mut self, provider: Provider) -> bool {
        self.on_stage(ClusterStage::ProviderSelection, |wizard, ctx| {
            wizard.provider.choose(ctx, provider);
        })
    }

    pub fn set_name(&mut self, name: String) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.set_name(ctx, name);
        })
    }

    pub fn input_char(&mut self, c: char) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.input_char(ctx, c);
        })
    }

    pub fn backspace(&mut self) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.backspace(ctx);
        })
    }

    pub fn select_version(&mut self, index: usize) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.select_version(ctx, index);
        })
    }

    pub fn set_version(&mut self, version: String) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.set_version(ctx, version);
        })
    }

    pub fn select_loader(&mut self, loader: ModLoader) -> bool {
        self.on_stage(ClusterStage::GameSetup, |wizard, ctx| {
            wizard.setup.select_loader(ctx, loader);
        })
    }

    pub fn toggle_candidate(&mut self, index: usize) -> bool {
        self.on_stage(ClusterStage::ImportSelection, |wizard, ctx| {
            wizard.import.toggle(ctx, index);
        })
    }

    /// Switches the launcher to import from and re-lists its instances.
    pub fn set_import_kind(&mut self, kind: ImportKind) -> bool {
        self.on_stage(ClusterStage::ImportSelection, |wizard, ctx| {
            wizard.import.kind = kind;
            wizard.import.base_path = None;
            wizard.request_listing(ctx);
        })
    }

    pub fn set_import_base_path(&mut self, base_path: Option<PathBuf>) -> bool {
        self.on_stage(ClusterStage::ImportSelection, |wizard, ctx| {
            wizard.import.base_path = base_path;
            wizard.request_listing(ctx);
        })
    }

    /// Applies the result of a candidate listing.
    pub fn set_candidates(
        &mut self,
        request: u64,
        result: Result<Vec<ImportCandidate>, CommandError>,
    ) -> bool {
        let mut applied = false;
        self.on_stage(ClusterStage::ImportSelection, |wizard, ctx| {
            applied = wizard.import.set_candidates(ctx, request, result);
        });
        applied
    }

    /// The listing the import step wants run, reported once.
    pub fn take_listing_request(&mut self) -> Option<ListingRequest> {
        self.listing_request.take()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Runs `f` with the steps and a context if `stage` is active and the
    /// session accepts mutations.
    fn on_stage(
        &mut self,
        stage: ClusterStage,
        f: impl FnOnce(&mut StepsMut<'_>, &mut StepContext<'_, ClusterFlow>),
    ) -> bool {
        if self.engine.active_stage() != Some(stage) {
            tracing::debug!(?stage, active = ?self.engine.active_stage(), "step input for inactive stage");
            return false;
        }
        let Some(mut ctx) = self.engine.step_context() else {
            return false;
        };
        let mut steps = StepsMut {
            provider: &mut self.provider,
            setup: &mut self.setup,
            import: &mut self.import,
            listing_seq: &mut self.listing_seq,
            listing_request: &mut self.listing_request,
        };
        f(&mut steps, &mut ctx);
        true
    }

    /// Delivers pending entry signals to the steps.
    fn sync(&mut self) {
        while let Some(stage) = self.engine.take_entered() {
            let Some(mut ctx) = self.engine.step_context() else {
                break;
            };
            let mut steps = StepsMut {
                provider: &mut self.provider,
                setup: &mut self.setup,
                import: &mut self.import,
                listing_seq: &mut self.listing_seq,
                listing_request: &mut self.listing_request,
            };
            match stage {
                ClusterStage::ProviderSelection => steps.provider.on_enter(&mut ctx),
                ClusterStage::GameSetup => steps.setup.on_enter(&mut ctx),
                ClusterStage::ImportSelection => steps.request_listing(&mut ctx),
            }
        }
    }
}

/// Disjoint mutable borrows of the step state, alongside a `StepContext`.
struct StepsMut<'a> {
    provider: &'a mut ProviderSelectionStep,
    setup: &'a mut GameSetupStep,
    import: &'a mut ImportSelectionStep,
    listing_seq: &'a mut u64,
    listing_request: &'a mut Option<ListingRequest>,
}

impl StepsMut<'_> {
    fn request_listing(&mut self, ctx: &mut StepContext<'_, ClusterFlow>) {
        *self.listing_seq += 1;
        let id = *self.listing_seq;
        self.import.begin_listing(id);
        self.import.on_enter(ctx);
        *self.listing_request = Some(ListingRequest {
            id,
            kind: self.import.kind,
            base_path: self.import.base_path.clone(),
        });
    }
}

/// Runs the external command for a finished session.
pub async fn run_outcome<C: LauncherCommands>(
    commands: &C,
    outcome: ClusterOutcome,
) -> Result<FinishOutput, CommandError> {
    match outcome {
        TerminalOutcome::CreateNew(cluster) => commands
            .create_cluster(cluster)
            .await
            .map(FinishOutput::Created),
        TerminalOutcome::Alternative(request) => {
            let count = request.selection.len();
            commands
                .import_instances(request.kind, request.base_path, request.selection)
                .await?;
            Ok(FinishOutput::Imported(count))
        }
    }
}
