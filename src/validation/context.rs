//! Read-only view of a configuration under validation.

use crate::builder::TransitionTable;
use crate::core::{EventKind, State};
use std::collections::HashSet;

/// What the validation rules get to see of a configuration.
///
/// Callbacks themselves are not needed, only the states they are registered
/// for, which keeps the rules independent of payload and info types.
pub struct ConfigContext<'a, S: State, K: EventKind> {
    pub transitions: &'a TransitionTable<S, K>,
    pub callback_states: HashSet<&'a S>,
    pub common_events: &'a HashSet<K>,
    pub has_common_handler: bool,
}
