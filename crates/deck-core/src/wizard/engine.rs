use super::{
    Completion, FinishTicket, Generation, StepContext, TerminalOutcome, Transition,
    ValidationError, WizardFlow,
};
use crate::commands::CommandError;
use crate::overlay::{OverlayHandle, OverlayId, OverlayStack};

/// Stage-navigation state machine for one wizard.
///
/// Holds the stage stack (last = active, empty = closed), the draft, the
/// active step's readiness and the overlay handle the session is presented
/// through. `R` is the overlay renderer type of the surrounding UI.
///
/// Operations reachable from ordinary double-clicks (`advance`, `previous`,
/// `finish` on a closed session, and so on) are no-ops rather than errors.
pub struct WizardEngine<F: WizardFlow, R> {
    flow: F,
    handle: OverlayHandle<R>,
    stages: Vec<F::Stage>,
    draft: F::Draft,
    ready: bool,
    alternative: Option<(F::Stage, F::Alternative)>,
    entered: Option<F::Stage>,
    generation: Generation,
    in_flight: Option<Generation>,
    last_error: Option<CommandError>,
}

impl<F: WizardFlow, R> WizardEngine<F, R> {
    pub fn new(flow: F, handle: OverlayHandle<R>) -> Self {
        Self {
            flow,
            handle,
            stages: Vec::new(),
            draft: F::Draft::default(),
            ready: false,
            alternative: None,
            entered: None,
            generation: Generation::default(),
            in_flight: None,
            last_error: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn stages(&self) -> &[F::Stage] {
        &self.stages
    }

    pub fn active_stage(&self) -> Option<F::Stage> {
        self.stages.last().copied()
    }

    pub fn is_open(&self) -> bool {
        !self.stages.is_empty()
    }

    pub fn draft(&self) -> &F::Draft {
        &self.draft
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True while a finish command is in flight for this session.
    pub fn is_finishing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn last_error(&self) -> Option<&CommandError> {
        self.last_error.as_ref()
    }

    pub fn alternative(&self) -> Option<&F::Alternative> {
        let stage = self.active_stage()?;
        self.alternative
            .as_ref()
            .filter(|(owner, _)| *owner == stage)
            .map(|(_, alternative)| alternative)
    }

    pub fn overlay_id(&self) -> Option<OverlayId> {
        self.handle.id()
    }

    /// Transition-table lookup for the active stage.
    pub fn next_transition(&self) -> Option<Transition<F::Stage>> {
        let stage = self.active_stage()?;
        Some(self.flow.transition(stage, &self.draft))
    }

    /// The stage that became active most recently, reported once.
    ///
    /// Whoever owns the step content calls the step's `on_enter` for it.
    pub fn take_entered(&mut self) -> Option<F::Stage> {
        self.entered.take()
    }

    /// Mutable view for the active step. `None` when closed or finishing.
    pub fn step_context(&mut self) -> Option<StepContext<'_, F>> {
        if self.in_flight.is_some() {
            return None;
        }
        let stage = self.active_stage()?;
        Some(StepContext {
            flow: &self.flow,
            stage,
            draft: &mut self.draft,
            ready: &mut self.ready,
            alternative: &mut self.alternative,
        })
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Opens a fresh session on the initial stage and shows the overlay.
    pub fn start(&mut self, overlays: &mut OverlayStack<R>) {
        self.reset();
        self.generation.bump();
        let initial = self.flow.initial_stage();
        self.enter(initial);
        self.handle.show(overlays);
        tracing::info!(generation = %self.generation, stage = ?initial, "wizard started");
    }

    /// Closes the session: clears stages and draft, hides the overlay.
    ///
    /// Allowed while a finish is in flight; that command's result will be
    /// ignored when it arrives.
    pub fn cancel(&mut self, overlays: &mut OverlayStack<R>) -> bool {
        if !self.is_open() && self.handle.id().is_none() {
            tracing::debug!("cancel() on a closed wizard");
            return false;
        }
        if self.in_flight.is_some() {
            tracing::info!(generation = %self.generation, "wizard cancelled while finishing");
        }
        self.teardown(overlays);
        true
    }

    /// Pushes `target` if the active step is ready.
    pub fn advance(&mut self, target: F::Stage) -> bool {
        if !self.is_open() {
            tracing::debug!("advance() on a closed wizard");
            return false;
        }
        if self.in_flight.is_some() {
            tracing::debug!("advance() while finishing");
            return false;
        }
        if !self.ready {
            tracing::debug!(stage = ?self.active_stage(), "advance() while step not ready");
            return false;
        }
        self.alternative = None;
        self.enter(target);
        true
    }

    /// Advances to whatever the transition table says follows the active
    /// stage. Terminal and undecided stages do not advance.
    pub fn advance_next(&mut self) -> bool {
        match self.next_transition() {
            Some(Transition::To(target)) => self.advance(target),
            Some(Transition::Terminal | Transition::Undecided) | None => false,
        }
    }

    /// Goes back one stage; on the first stage this is `cancel()`.
    pub fn previous(&mut self, overlays: &mut OverlayStack<R>) -> bool {
        if !self.is_open() {
            tracing::debug!("previous() on a closed wizard");
            return false;
        }
        if self.in_flight.is_some() {
            tracing::debug!("previous() while finishing");
            return false;
        }
        if self.stages.len() <= 1 {
            return self.cancel(overlays);
        }
        self.stages.pop();
        self.alternative = None;
        self.ready = false;
        self.entered = self.active_stage();
        true
    }

    /// Merges one field into the draft.
    pub fn update_draft(&mut self, field: F::Field) -> bool {
        if !self.is_open() || self.in_flight.is_some() {
            tracing::debug!(?field, "update_draft() ignored");
            return false;
        }
        self.flow.apply(&mut self.draft, field);
        true
    }

    /// Validates the session and hands out the outcome to run.
    ///
    /// `Ok(None)` when there is nothing to finish (closed, or a finish is
    /// already in flight). Validation failures leave the session untouched.
    pub fn finish(&mut self) -> Result<Option<FinishTicket<F>>, ValidationError> {
        let Some(stage) = self.active_stage() else {
            tracing::debug!("finish() on a closed wizard");
            return Ok(None);
        };
        if self.in_flight.is_some() {
            tracing::debug!("finish() while already finishing");
            return Ok(None);
        }
        let not_ready = || ValidationError::StepNotReady(format!("{stage:?}"));

        let outcome = match &self.alternative {
            Some((owner, alternative)) if *owner == stage => {
                if !self.ready {
                    return Err(not_ready());
                }
                self.flow.validate_alternative(alternative)?;
                TerminalOutcome::Alternative(alternative.clone())
            }
            _ => {
                // Missing fields are reported by name on terminal stages.
                let terminal = matches!(
                    self.flow.transition(stage, &self.draft),
                    Transition::Terminal
                );
                if !terminal && !self.ready {
                    return Err(not_ready());
                }
                let create = self.flow.validate(&self.draft)?;
                if !self.ready {
                    return Err(not_ready());
                }
                TerminalOutcome::CreateNew(create)
            }
        };

        self.in_flight = Some(self.generation);
        self.last_error = None;
        tracing::info!(generation = %self.generation, ?stage, "wizard finishing");
        Ok(Some(FinishTicket {
            generation: self.generation,
            outcome,
        }))
    }

    /// Applies the result of the command started from a `FinishTicket`.
    pub fn complete<T>(
        &mut self,
        generation: Generation,
        result: Result<T, CommandError>,
        overlays: &mut OverlayStack<R>,
    ) -> Completion<T> {
        if self.in_flight != Some(generation) || self.generation != generation {
            tracing::debug!(%generation, current = %self.generation, "stale wizard completion");
            return Completion::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(value) => {
                tracing::info!(%generation, "wizard finished");
                self.teardown(overlays);
                Completion::Done(value)
            }
            Err(err) => {
                tracing::warn!(%generation, error = %err, "wizard finish failed");
                self.last_error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn enter(&mut self, stage: F::Stage) {
        self.stages.push(stage);
        self.ready = false;
        self.entered = Some(stage);
    }

    fn reset(&mut self) {
        self.stages.clear();
        self.draft = F::Draft::default();
        self.ready = false;
        self.alternative = None;
        self.entered = None;
        self.in_flight = None;
        self.last_error = None;
    }

    fn teardown(&mut self, overlays: &mut OverlayStack<R>) {
        self.reset();
        self.generation.bump();
        self.handle.hide(overlays);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandErrorKind;

    /// Two-stage flow over a string map, enough to exercise the engine.
    #[derive(Debug)]
    struct TestFlow;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        First,
        Second,
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Draft {
        title: Option<String>,
    }

    impl WizardFlow for TestFlow {
        type Stage = Stage;
        type Draft = Draft;
        type Field = String;
        type Create = String;
        type Alternative = u32;

        fn initial_stage(&self) -> Stage {
            Stage::First
        }

        fn transition(&self, stage: Stage, _draft: &Draft) -> Transition<Stage> {
            match stage {
                Stage::First => Transition::To(Stage::Second),
                Stage::Second => Transition::Terminal,
            }
        }

        fn apply(&self, draft: &mut Draft, field: String) {
            draft.title = Some(field);
        }

        fn validate(&self, draft: &Draft) -> Result<String, ValidationError> {
            draft
                .title
                .clone()
                .ok_or(ValidationError::MissingField("title"))
        }

        fn validate_alternative(&self, alternative: &u32) -> Result<(), ValidationError> {
            if *alternative == 0 {
                Err(ValidationError::EmptySelection)
            } else {
                Ok(())
            }
        }
    }

    fn engine() -> (WizardEngine<TestFlow, &'static str>, OverlayStack<&'static str>) {
        (
            WizardEngine::new(TestFlow, OverlayHandle::new(|_| "wizard")),
            OverlayStack::new(),
        )
    }

    fn set_ready(engine: &mut WizardEngine<TestFlow, &'static str>) {
        if let Some(mut ctx) = engine.step_context() {
            ctx.set_ready(true);
        }
    }

    #[test]
    fn test_start_opens_initial_stage_and_shows_overlay() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);

        assert_eq!(engine.stages(), &[Stage::First]);
        assert_eq!(engine.take_entered(), Some(Stage::First));
        assert_eq!(engine.take_entered(), None);
        assert_eq!(overlays.current().map(|e| e.render), Some("wizard"));
        assert!(!engine.is_ready());
    }

    #[test]
    fn test_advance_requires_readiness() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);

        assert!(!engine.advance(Stage::Second));
        assert_eq!(engine.stages(), &[Stage::First]);

        set_ready(&mut engine);
        assert!(engine.advance_next());
        assert_eq!(engine.stages(), &[Stage::First, Stage::Second]);
    }

    #[test]
    fn test_readiness_resets_on_every_entry() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        set_ready(&mut engine);
        engine.advance(Stage::Second);
        assert!(!engine.is_ready());

        set_ready(&mut engine);
        engine.previous(&mut overlays);
        assert!(!engine.is_ready());
        assert_eq!(engine.take_entered(), Some(Stage::First));
    }

    #[test]
    fn test_previous_on_first_stage_equals_cancel() {
        let (mut cancelled, mut cancel_overlays) = engine();
        cancelled.start(&mut cancel_overlays);
        cancelled.update_draft("x".to_string());
        cancelled.cancel(&mut cancel_overlays);

        let (mut popped, mut pop_overlays) = engine();
        popped.start(&mut pop_overlays);
        popped.update_draft("x".to_string());
        assert!(popped.previous(&mut pop_overlays));

        for (engine, overlays) in [(&cancelled, &cancel_overlays), (&popped, &pop_overlays)] {
            assert!(engine.stages().is_empty());
            assert_eq!(engine.draft(), &Draft::default());
            assert!(overlays.is_empty());
            assert!(engine.overlay_id().is_none());
        }
    }

    #[test]
    fn test_closed_wizard_operations_are_noops() {
        let (mut engine, mut overlays) = engine();
        assert!(!engine.advance(Stage::Second));
        assert!(!engine.previous(&mut overlays));
        assert!(!engine.cancel(&mut overlays));
        assert!(!engine.update_draft("x".to_string()));
        assert!(matches!(engine.finish(), Ok(None)));
    }

    #[test]
    fn test_restart_after_cancel_has_empty_draft() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        engine.update_draft("leftover".to_string());
        engine.cancel(&mut overlays);
        engine.start(&mut overlays);
        assert_eq!(engine.draft(), &Draft::default());
        assert_eq!(overlays.len(), 1);
    }

    #[test]
    fn test_finish_validates_before_handing_out_ticket() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);

        assert_eq!(
            engine.finish().unwrap_err(),
            ValidationError::StepNotReady("First".to_string())
        );

        set_ready(&mut engine);
        assert_eq!(
            engine.finish().unwrap_err(),
            ValidationError::MissingField("title")
        );
        assert!(engine.is_open());
        assert!(!engine.is_finishing());

        engine.update_draft("done".to_string());
        let ticket = engine.finish().unwrap().unwrap();
        assert_eq!(ticket.outcome, TerminalOutcome::CreateNew("done".to_string()));
        assert!(engine.is_finishing());
        assert!(matches!(engine.finish(), Ok(None)));
    }

    #[test]
    fn test_finish_names_missing_field_on_terminal_stage() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        set_ready(&mut engine);
        engine.advance(Stage::Second);

        let err = engine.finish().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));
        assert_eq!(err.field(), Some("title"));

        engine.update_draft("done".to_string());
        assert_eq!(
            engine.finish().unwrap_err(),
            ValidationError::StepNotReady("Second".to_string())
        );
        assert!(!engine.is_finishing());
    }

    #[test]
    fn test_alternative_outcome_replaces_default_check() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        {
            let mut ctx = engine.step_context().unwrap();
            ctx.set_ready(true);
            ctx.set_alternative(0);
        }
        assert_eq!(
            engine.finish().unwrap_err(),
            ValidationError::EmptySelection
        );

        engine.step_context().unwrap().set_alternative(7);
        let ticket = engine.finish().unwrap().unwrap();
        assert_eq!(ticket.outcome, TerminalOutcome::Alternative(7));
    }

    #[test]
    fn test_alternative_discarded_when_stage_left() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        {
            let mut ctx = engine.step_context().unwrap();
            ctx.set_ready(true);
            ctx.set_alternative(3);
        }
        engine.advance(Stage::Second);
        assert!(engine.alternative().is_none());
        engine.previous(&mut overlays);
        assert!(engine.alternative().is_none());
    }

    #[test]
    fn test_successful_completion_tears_down() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        engine.update_draft("t".to_string());
        set_ready(&mut engine);
        let ticket = engine.finish().unwrap().unwrap();

        let done = engine.complete(ticket.generation, Ok(42), &mut overlays);
        assert_eq!(done, Completion::Done(42));
        assert!(!engine.is_open());
        assert!(overlays.is_empty());
        assert_eq!(engine.draft(), &Draft::default());
    }

    #[test]
    fn test_failed_completion_keeps_session() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        engine.update_draft("t".to_string());
        set_ready(&mut engine);
        let ticket = engine.finish().unwrap().unwrap();

        let err = CommandError::new(CommandErrorKind::Io, "disk full");
        let result: Result<(), _> = Err(err.clone());
        assert_eq!(
            engine.complete(ticket.generation, result, &mut overlays),
            Completion::Failed(err.clone())
        );
        assert!(engine.is_open());
        assert!(!engine.is_finishing());
        assert_eq!(engine.draft().title.as_deref(), Some("t"));
        assert_eq!(engine.last_error(), Some(&err));
        assert_eq!(overlays.len(), 1);

        // Retry is possible.
        assert!(engine.finish().unwrap().is_some());
    }

    #[test]
    fn test_mutations_rejected_while_finishing_except_cancel() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        engine.update_draft("t".to_string());
        set_ready(&mut engine);
        engine.finish().unwrap();

        assert!(!engine.update_draft("other".to_string()));
        assert!(!engine.advance(Stage::Second));
        assert!(!engine.previous(&mut overlays));
        assert!(engine.step_context().is_none());
        assert!(engine.cancel(&mut overlays));
        assert!(!engine.is_open());
    }

    #[test]
    fn test_completion_after_cancel_is_stale() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        engine.update_draft("t".to_string());
        set_ready(&mut engine);
        let ticket = engine.finish().unwrap().unwrap();

        engine.cancel(&mut overlays);
        assert_eq!(
            engine.complete(ticket.generation, Ok(()), &mut overlays),
            Completion::Stale
        );

        // A new session is not affected by the old ticket either.
        engine.start(&mut overlays);
        assert_eq!(
            engine.complete(ticket.generation, Ok(()), &mut overlays),
            Completion::Stale
        );
        assert!(engine.is_open());
        assert_eq!(overlays.len(), 1);
    }

    #[test]
    fn test_wizard_hide_leaves_nested_overlays() {
        let (mut engine, mut overlays) = engine();
        engine.start(&mut overlays);
        let confirm = overlays.push("confirm");

        engine.cancel(&mut overlays);
        assert_eq!(overlays.current().map(|e| e.id), Some(confirm));
    }
}
