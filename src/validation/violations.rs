//! Configuration violations.

use thiserror::Error;

/// A single problem found while validating a state machine configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("State '{state}' is the source of a transition but has no callback")]
    MissingSourceCallback { state: String },

    #[error("State '{state}' is the target of a transition but has no callback")]
    MissingTargetCallback { state: String },

    #[error("Event '{event}' is declared common but also appears in the transition table")]
    CommonEventInTransitions { event: String },

    #[error("{count} common event(s) declared without a common handler")]
    MissingCommonHandler { count: usize },
}
