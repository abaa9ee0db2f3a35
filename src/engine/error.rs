//! Runtime errors reported by the engine.

use crate::engine::executer::ScheduleError;
use thiserror::Error;

/// Outcome of a submitted event, delivered through its completion.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("Unknown transition from state '{state}' with event '{event}'")]
    UnknownTransition { state: String, event: String },

    #[error("Event could not be scheduled: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Event kind '{kind}' is reserved for engine notifications")]
    ReservedKind { kind: String },

    #[error("Event was dropped before its outcome was reported")]
    Abandoned,
}

/// Misuse of the chained-event capability inside a callback.
///
/// These always point at a bug in the callback, not at a runtime condition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NextEventError {
    #[error("Cannot chain an event while exiting state '{state}'")]
    DuringExit { state: String },

    #[error("Cannot chain an event before the transition from '{from}' to '{to}'; chain it on entry instead")]
    BeforeTransition { from: String, to: String },

    #[error("An event has already been chained in this callback")]
    AlreadyChained,

    #[error("Event kind '{kind}' is reserved for engine notifications")]
    ReservedKind { kind: String },
}
