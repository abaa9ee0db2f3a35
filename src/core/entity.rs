//! Entities tracked by a state machine.

use super::state::State;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::fmt;
use uuid::Uuid;

/// One independently-evolving object driven by an [`Fsm`](crate::engine::Fsm).
///
/// An entity owns two locks:
///
/// - a read-write lock around the current state, so [`Entity::current_state`]
///   can be called from any thread without waiting for event processing;
/// - an exclusive processing lock, held for the whole dispatch of one event
///   (chained events included), which serializes all events for this entity.
///
/// A state read that races with a transition returns either the old or the
/// new state, never anything else.
///
/// The engine keeps no registry of entities. Callers hold them (usually in an
/// `Arc`) and pass them along with every event.
///
/// # Example
///
/// ```rust
/// use lockstep::core::{Entity, State};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// # enum Link { Down, Up }
/// # impl State for Link {
/// #     fn name(&self) -> &str { match self { Self::Down => "Down", Self::Up => "Up" } }
/// # }
///
/// struct Peer {
///     address: String,
/// }
///
/// let entity = Entity::with_info(Link::Down, Peer { address: "10.0.0.1".into() });
///
/// assert_eq!(entity.current_state(), Link::Down);
/// assert_eq!(entity.info().map(|p| p.address.as_str()), Some("10.0.0.1"));
/// ```
pub struct Entity<S: State, I = ()> {
    id: Uuid,
    created_at: DateTime<Utc>,
    current: RwLock<S>,
    processing: Mutex<()>,
    info: Option<I>,
}

impl<S: State, I> Entity<S, I> {
    /// Create an entity in `initial` with no attached info.
    pub fn new(initial: S) -> Self {
        Self::build(initial, None)
    }

    /// Create an entity in `initial` carrying caller-defined `info`.
    pub fn with_info(initial: S, info: I) -> Self {
        Self::build(initial, Some(info))
    }

    fn build(initial: S, info: Option<I>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            current: RwLock::new(initial),
            processing: Mutex::new(()),
            info,
        }
    }

    /// Identifier used to correlate log records for this entity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> S {
        self.current.read().clone()
    }

    /// Whether the current state is final.
    pub fn is_final(&self) -> bool {
        self.current.read().is_final()
    }

    pub fn info(&self) -> Option<&I> {
        self.info.as_ref()
    }

    pub(crate) fn set_state(&self, next: S) {
        *self.current.write() = next;
    }

    /// Block until no other event is being processed for this entity.
    pub(crate) fn lock_processing(&self) -> MutexGuard<'_, ()> {
        self.processing.lock()
    }
}

impl<S: State, I> fmt::Debug for Entity<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("current", &*self.current.read())
            .field("has_info", &self.info.is_some())
            .finish()
    }
}
