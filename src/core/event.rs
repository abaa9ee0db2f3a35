//! Events and event kinds.
//!
//! An [`Event`] pairs a [`Kind`] with an optional caller-owned payload. Caller
//! kinds implement [`EventKind`]; the engine wraps them in [`Kind::Custom`] and
//! reserves [`Kind::Entry`] and [`Kind::Exit`] for the notifications it
//! synthesizes around a state change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

/// Trait for caller-defined event kinds.
///
/// Kinds are keys of the transition table, the common event set and the
/// per-kind metrics, hence the `Eq + Hash` bounds.
///
/// # Example
///
/// ```rust
/// use lockstep::core::EventKind;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum SessionEvent {
///     Start,
///     Stop,
/// }
///
/// impl EventKind for SessionEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Start => "Start",
///             Self::Stop => "Stop",
///         }
///     }
/// }
/// ```
pub trait EventKind:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the kind's name for display/logging.
    fn name(&self) -> &str;
}

/// The kind an event carries when it reaches a callback.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Kind<K> {
    /// The state the callback is registered for has just been entered.
    Entry,
    /// The state the callback is registered for is about to be left.
    Exit,
    /// A caller-defined kind.
    Custom(K),
}

impl<K: EventKind> Kind<K> {
    /// The caller kind, or `None` for engine-synthesized notifications.
    pub fn as_custom(&self) -> Option<&K> {
        match self {
            Self::Custom(kind) => Some(kind),
            Self::Entry | Self::Exit => None,
        }
    }

    /// Whether this is an engine-reserved kind.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Entry => "Entry",
            Self::Exit => "Exit",
            Self::Custom(kind) => kind.name(),
        }
    }
}

/// An immutable event submitted against an entity.
///
/// The payload is shared behind an `Arc`, so the ENTRY/EXIT notifications
/// derived from an event carry the very same payload value. The engine never
/// looks inside it.
///
/// # Example
///
/// ```rust
/// use lockstep::core::{Event, EventKind, Kind};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// # enum Signal { Attach }
/// # impl EventKind for Signal {
/// #     fn name(&self) -> &str { "Attach" }
/// # }
///
/// struct AttachRequest {
///     imsi: String,
/// }
///
/// let event = Event::with_payload(
///     Signal::Attach,
///     AttachRequest { imsi: "001010000000001".to_string() },
/// );
///
/// assert_eq!(event.kind(), &Kind::Custom(Signal::Attach));
/// assert_eq!(event.payload().map(|p| p.imsi.as_str()), Some("001010000000001"));
/// ```
pub struct Event<K, P = ()> {
    kind: Kind<K>,
    payload: Option<Arc<P>>,
    created_at: DateTime<Utc>,
}

impl<K: EventKind, P> Event<K, P> {
    /// Create an event without a payload.
    pub fn new(kind: K) -> Self {
        Self {
            kind: Kind::Custom(kind),
            payload: None,
            created_at: Utc::now(),
        }
    }

    /// Create an event carrying `payload`.
    pub fn with_payload(kind: K, payload: P) -> Self {
        Self::with_shared_payload(kind, Arc::new(payload))
    }

    /// Create an event carrying a payload the caller keeps a handle to.
    pub fn with_shared_payload(kind: K, payload: Arc<P>) -> Self {
        Self {
            kind: Kind::Custom(kind),
            payload: Some(payload),
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> &Kind<K> {
        &self.kind
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_deref()
    }

    /// A new handle to the payload, if any.
    pub fn shared_payload(&self) -> Option<Arc<P>> {
        self.payload.clone()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this event with another kind and the same payload.
    pub(crate) fn derive(&self, kind: Kind<K>) -> Self {
        Self {
            kind,
            payload: self.payload.clone(),
            created_at: Utc::now(),
        }
    }
}

impl<K: Clone, P> Clone for Event<K, P> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            payload: self.payload.clone(),
            created_at: self.created_at,
        }
    }
}

impl<K: Debug, P> Debug for Event<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("has_payload", &self.payload.is_some())
            .field("created_at", &self.created_at)
            .finish()
    }
}
