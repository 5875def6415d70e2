//! Cross-slice state mutations.
//!
//! Overlays return these mutations to request changes outside their own
//! state. The main reducer applies them in order.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMutation {
    /// Tear down the cluster wizard session and its overlay.
    CancelWizard,
    /// Go back one wizard stage.
    WizardBack,
    SetStatus(String),
}
