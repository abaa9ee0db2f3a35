//! Builder for constructing state machines.

use crate::builder::error::ConfigError;
use crate::builder::transition::TransitionTable;
use crate::core::{EventKind, State};
use crate::engine::{CallbackContext, Executer, Fsm, FsmOptions};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// Nothing is checked until [`FsmBuilder::build`], which validates the whole
/// configuration at once.
pub struct FsmBuilder<S: State, K: EventKind, P = (), I = ()> {
    options: FsmOptions<S, K, P, I>,
}

impl<S: State, K: EventKind, P, I> FsmBuilder<S, K, P, I> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: FsmOptions::default(),
        }
    }

    /// Add the rule `from --kind--> to`.
    pub fn transition(mut self, from: S, kind: K, to: S) -> Self {
        self.options.transitions.insert(from, kind, to);
        self
    }

    /// Add every rule of `table`.
    pub fn transitions(mut self, table: TransitionTable<S, K>) -> Self {
        for (from, kind, to) in table.iter() {
            self.options
                .transitions
                .insert(from.clone(), kind.clone(), to.clone());
        }
        self
    }

    /// Register the callback for `state`, replacing any previous one.
    pub fn callback<F>(mut self, state: S, callback: F) -> Self
    where
        F: Fn(&CallbackContext<'_, S, K, P, I>) + Send + Sync + 'static,
    {
        self.options.callbacks.insert(state, Arc::new(callback));
        self
    }

    /// Declare `kind` as a common event.
    pub fn common_event(mut self, kind: K) -> Self {
        self.options.common_events.insert(kind);
        self
    }

    /// Declare several common events at once.
    pub fn common_events(mut self, kinds: impl IntoIterator<Item = K>) -> Self {
        self.options.common_events.extend(kinds);
        self
    }

    /// Set the handler shared by all common events.
    pub fn common_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CallbackContext<'_, S, K, P, I>) + Send + Sync + 'static,
    {
        self.options.common_handler = Some(Arc::new(handler));
        self
    }

    /// The collected configuration, unvalidated.
    pub fn into_options(self) -> FsmOptions<S, K, P, I> {
        self.options
    }

    /// Validate the configuration and build the state machine.
    pub fn build<E>(self, executer: E) -> Result<Fsm<S, K, P, I>, ConfigError>
    where
        E: Executer + 'static,
    {
        Fsm::new(self.options, executer)
    }

    /// Like [`FsmBuilder::build`], for an executer shared with other state
    /// machines.
    pub fn build_shared(self, executer: Arc<dyn Executer>) -> Result<Fsm<S, K, P, I>, ConfigError> {
        Fsm::with_executer(self.options, executer)
    }
}

impl<S: State, K: EventKind, P, I> Default for FsmBuilder<S, K, P, I> {
    fn default() -> Self {
        Self::new()
    }
}
