//! Declarative transition table.

use crate::core::{EventKind, State};
use std::collections::HashMap;

/// Mapping from `(current state, event kind)` to the next state.
///
/// Tables are assembled once, handed to the engine, and never modified
/// afterwards. Re-declaring an existing key replaces its target.
///
/// # Example
///
/// ```
/// use lockstep::builder::TransitionTable;
/// use lockstep::{event_enum, state_enum};
///
/// state_enum! {
///     enum Call { Idle, Ringing, Connected }
/// }
/// event_enum! {
///     enum Signal { Invite, Answer }
/// }
///
/// let table = TransitionTable::new()
///     .with(Call::Idle, Signal::Invite, Call::Ringing)
///     .with(Call::Ringing, Signal::Answer, Call::Connected);
///
/// assert_eq!(table.next(&Call::Idle, &Signal::Invite), Some(&Call::Ringing));
/// assert_eq!(table.next(&Call::Idle, &Signal::Answer), None);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, K: EventKind> {
    rules: HashMap<(S, K), S>,
}

impl<S: State, K: EventKind> TransitionTable<S, K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Declare `from --kind--> to`, returning the previous target if the key
    /// was already present.
    pub fn insert(&mut self, from: S, kind: K, to: S) -> Option<S> {
        self.rules.insert((from, kind), to)
    }

    /// Declare `from --kind--> to` in a chain.
    pub fn with(mut self, from: S, kind: K, to: S) -> Self {
        self.insert(from, kind, to);
        self
    }

    /// Look up the state `kind` leads to from `current`.
    pub fn next(&self, current: &S, kind: &K) -> Option<&S> {
        // Keyed lookup needs an owned tuple; states and kinds are cheap tokens.
        self.rules.get(&(current.clone(), kind.clone()))
    }

    pub fn contains_kind(&self, kind: &K) -> bool {
        self.rules.keys().any(|(_, k)| k == kind)
    }

    /// States that appear as the source of a rule (may repeat).
    pub fn sources(&self) -> impl Iterator<Item = &S> {
        self.rules.keys().map(|(from, _)| from)
    }

    /// States that appear as the target of a rule (may repeat).
    pub fn targets(&self) -> impl Iterator<Item = &S> {
        self.rules.values()
    }

    /// Event kinds that appear in some rule (may repeat).
    pub fn kinds(&self) -> impl Iterator<Item = &K> {
        self.rules.keys().map(|(_, kind)| kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &K, &S)> {
        self.rules.iter().map(|((from, kind), to)| (from, kind, to))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: State, K: EventKind> Default for TransitionTable<S, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, K: EventKind> FromIterator<(S, K, S)> for TransitionTable<S, K> {
    fn from_iter<T: IntoIterator<Item = (S, K, S)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (from, kind, to) in iter {
            table.insert(from, kind, to);
        }
        table
    }
}
