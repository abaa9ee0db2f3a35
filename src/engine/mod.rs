//! The concurrent dispatch engine.
//!
//! This module is the "shell" around the plain values in [`core`](crate::core):
//! it owns the validated rule table, serializes events per entity, invokes
//! callbacks, and hands asynchronous work to an injected executer.
//!
//! # Key Concepts
//!
//! - **Fsm**: immutable rules plus the dispatch algorithm
//! - **CallbackContext**: per-invocation view with the chained-event capability
//! - **Executer**: the worker pool asynchronous sends run on
//! - **Completion**: one-shot outcome of a submission

mod completion;
mod context;
mod error;
mod executer;
mod fsm;

pub use completion::Completion;
pub use context::{Callback, CallbackContext};
pub use error::{FsmError, NextEventError};
pub use executer::{Executer, Job, ScheduleError, TokioExecuter};
pub use fsm::{Fsm, FsmOptions};
