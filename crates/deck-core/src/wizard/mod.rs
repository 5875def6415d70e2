//! Multi-stage wizard engine.
//!
//! A wizard session rides on one [`OverlayHandle`](crate::overlay::OverlayHandle)
//! and walks a stack of stages while accumulating a draft of the entity being
//! built. What the stages are, how they connect and what the finished draft
//! turns into is described by a [`WizardFlow`].
//!
//! ## Module Structure
//!
//! - `mod.rs`: flow description, outcomes, validation errors
//! - `engine.rs`: `WizardEngine` state machine
//! - `step.rs`: step contract (`Step`, `StepContext`)
//!
//! ## Finishing
//!
//! `finish()` never performs I/O. It validates, marks the session as
//! finishing and hands back a [`FinishTicket`]. The caller runs the external
//! command and reports the result through `complete()`. Tickets carry the
//! session [`Generation`]; a result for a session that was cancelled (or
//! restarted) in the meantime is dropped.

mod engine;
mod step;

use std::fmt::Debug;

pub use engine::WizardEngine;
pub use step::{Step, StepContext};
use thiserror::Error;

use crate::commands::CommandError;

/// Describes one concrete wizard: stages, transitions, draft and outcomes.
pub trait WizardFlow {
    type Stage: Copy + Eq + Debug;
    type Draft: Default + Debug;
    /// Single-field draft update.
    type Field: Debug;
    /// Payload of the default outcome, produced from a complete draft.
    type Create: Debug;
    /// Payload of a stage-supplied alternative outcome.
    type Alternative: Clone + Debug;

    fn initial_stage(&self) -> Self::Stage;

    /// Where forward navigation from `stage` goes, given the draft so far.
    fn transition(&self, stage: Self::Stage, draft: &Self::Draft) -> Transition<Self::Stage>;

    fn apply(&self, draft: &mut Self::Draft, field: Self::Field);

    /// Required-field check for the default outcome.
    fn validate(&self, draft: &Self::Draft) -> Result<Self::Create, ValidationError>;

    /// Contract check for an alternative outcome.
    fn validate_alternative(&self, alternative: &Self::Alternative)
    -> Result<(), ValidationError>;
}

/// Result of the transition table for the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    /// Forward action advances to this stage.
    To(S),
    /// Forward action finishes the wizard.
    Terminal,
    /// The step has not made the choice that decides the next stage yet.
    Undecided,
}

/// Exactly one of these exists per completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome<C, A> {
    CreateNew(C),
    Alternative(A),
}

/// Session epoch. Bumped on every start, cancel and teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Handed out by a successful `finish()`: what to run and for which session.
#[derive(Debug)]
pub struct FinishTicket<F: WizardFlow> {
    pub generation: Generation,
    pub outcome: TerminalOutcome<F::Create, F::Alternative>,
}

/// What `complete()` did with a command result.
#[derive(Debug, PartialEq, Eq)]
pub enum Completion<T> {
    /// Command succeeded; the session was torn down.
    Done(T),
    /// Command failed; the session stays open with its draft.
    Failed(CommandError),
    /// The result belongs to a session that no longer exists. Ignored.
    Stale,
}

/// Local, synchronous check failure. Never reaches the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("step {0} is not ready")]
    StepNotReady(String),
    #[error("nothing selected")]
    EmptySelection,
}

impl ValidationError {
    /// The draft field at fault, for highlighting.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField(field) => Some(field),
            _ => None,
        }
    }
}
