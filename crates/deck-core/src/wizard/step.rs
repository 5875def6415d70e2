use super::WizardFlow;

/// Contract for a stage's interactive content.
///
/// The engine resets readiness and drops any alternative outcome every time
/// a stage becomes active; `on_enter` is where the step puts them back from
/// its own state and the current draft. A step revisited after going back
/// therefore never shows readiness computed for an older draft.
pub trait Step<F: WizardFlow> {
    fn on_enter(&mut self, ctx: &mut StepContext<'_, F>);
}

/// The slice of engine state the active step may touch.
pub struct StepContext<'a, F: WizardFlow> {
    pub(super) flow: &'a F,
    pub(super) stage: F::Stage,
    pub(super) draft: &'a mut F::Draft,
    pub(super) ready: &'a mut bool,
    pub(super) alternative: &'a mut Option<(F::Stage, F::Alternative)>,
}

impl<F: WizardFlow> StepContext<'_, F> {
    pub fn stage(&self) -> F::Stage {
        self.stage
    }

    pub fn draft(&self) -> &F::Draft {
        &*self.draft
    }

    pub fn update_draft(&mut self, field: F::Field) {
        self.flow.apply(self.draft, field);
    }

    pub fn set_ready(&mut self, ready: bool) {
        *self.ready = ready;
    }

    /// Registers an alternative finishing action for the active stage.
    /// Discarded by the engine when the stage is left.
    pub fn set_alternative(&mut self, alternative: F::Alternative) {
        *self.alternative = Some((self.stage, alternative));
    }

    pub fn clear_alternative(&mut self) {
        *self.alternative = None;
    }
}
