//! Construction-time validation of state machine configurations.
//!
//! Every rule runs, and stillwater's `Validation` accumulates all of their
//! violations, so a broken configuration is reported in one pass instead of
//! one mistake at a time. A configuration with any violation never produces
//! an [`Fsm`](crate::engine::Fsm).

pub mod context;
pub mod rules;
pub mod violations;

pub use context::ConfigContext;
pub use rules::{validate, RuleResult};
pub use violations::ConfigViolation;
