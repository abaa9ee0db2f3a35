//! Core value types of the engine.
//!
//! This module contains the data the engine moves around:
//! - State definitions via the `State` trait
//! - Event kinds and immutable events with shared payloads
//! - Entities, holding a current state behind their own locks
//!
//! Nothing here knows about transition tables or executers; that lives in
//! [`engine`](crate::engine).

mod entity;
mod event;
mod state;

pub use entity::Entity;
pub use event::{Event, EventKind, Kind};
pub use state::State;
