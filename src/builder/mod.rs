//! Builder API for state machine configuration.
//!
//! This module provides the fluent [`FsmBuilder`], the declarative
//! [`TransitionTable`] and macros for declaring states and event kinds with
//! minimal boilerplate.

pub mod error;
pub mod fsm;
pub mod macros;
pub mod transition;

pub use error::ConfigError;
pub use fsm::FsmBuilder;
pub use transition::TransitionTable;
