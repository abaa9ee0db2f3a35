//! Lockstep: a concurrent finite state machine engine
//!
//! Lockstep drives many long-lived entities (protocol sessions, network
//! function contexts, ...) through one shared, immutable transition table.
//! Entities are processed concurrently on an injected worker pool, but each
//! entity sees its own events strictly one at a time.
//!
//! # Core Concepts
//!
//! - **State / EventKind**: caller-defined tokens, see [`state_enum!`] and
//!   [`event_enum!`]
//! - **Entity**: current state and attached info behind per-entity locks
//! - **Fsm**: validated rules, callbacks and the dispatch algorithm
//! - **Executer**: where asynchronous sends run
//! - **Metrics**: submitted, triggered and completed counters per kind
//!
//! # Example
//!
//! ```rust
//! use lockstep::builder::FsmBuilder;
//! use lockstep::core::{Entity, Event, Kind};
//! use lockstep::engine::{Job, ScheduleError};
//! use lockstep::{event_enum, state_enum};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Session { Idle, Active, Closed }
//!     final: [Closed]
//! }
//! event_enum! {
//!     enum Signal { Start, Stop, Ping }
//! }
//!
//! let fsm = FsmBuilder::<Session, Signal>::new()
//!     .transition(Session::Idle, Signal::Start, Session::Active)
//!     .transition(Session::Active, Signal::Stop, Session::Closed)
//!     .callback(Session::Idle, |_ctx| {})
//!     .callback(Session::Active, |ctx| {
//!         if ctx.kind() == &Kind::Entry {
//!             println!("session {} is up", ctx.entity().id());
//!         }
//!     })
//!     .callback(Session::Closed, |_ctx| {})
//!     .common_event(Signal::Ping)
//!     .common_handler(|_ctx| {})
//!     .build(|job: Job| -> Result<(), ScheduleError> {
//!         std::thread::spawn(job);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let session = Arc::new(Entity::new(Session::Idle));
//! fsm.send_event(&session, Event::new(Signal::Start)).wait().unwrap();
//! fsm.send_event(&session, Event::new(Signal::Ping)).wait().unwrap();
//! fsm.sync_send_event(&session, Event::new(Signal::Stop)).unwrap();
//!
//! assert!(session.is_final());
//! assert!(fsm.metrics().completed >= 2);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod metrics;
pub mod validation;

// Re-export commonly used types
pub use crate::builder::{ConfigError, FsmBuilder, TransitionTable};
pub use crate::core::{Entity, Event, EventKind, Kind, State};
pub use crate::engine::{
    CallbackContext, Completion, Executer, Fsm, FsmError, FsmOptions, NextEventError,
    ScheduleError,
};
pub use crate::metrics::MetricsSnapshot;
