//! The rule table and its dispatch algorithm.

use crate::builder::{ConfigError, TransitionTable};
use crate::core::{Entity, Event, EventKind, Kind, State};
use crate::engine::completion::{self, Completion, Reporter};
use crate::engine::context::{Callback, CallbackContext, Chaining};
use crate::engine::error::FsmError;
use crate::engine::executer::{Executer, Job};
use crate::metrics::{FsmMetrics, MetricsSnapshot};
use crate::validation::{validate, ConfigContext, ConfigViolation};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use stillwater::validation::Validation;
use tracing::{debug, warn};

/// Everything a state machine is built from, apart from its executer.
pub struct FsmOptions<S: State, K: EventKind, P = (), I = ()> {
    /// `(state, kind) -> next state` rules.
    pub transitions: TransitionTable<S, K>,
    /// One callback per state.
    pub callbacks: HashMap<S, Callback<S, K, P, I>>,
    /// Handler for every common event, whatever the entity's state.
    pub common_handler: Option<Callback<S, K, P, I>>,
    /// Kinds that bypass the transition table.
    pub common_events: HashSet<K>,
}

impl<S: State, K: EventKind, P, I> Default for FsmOptions<S, K, P, I> {
    fn default() -> Self {
        Self {
            transitions: TransitionTable::new(),
            callbacks: HashMap::new(),
            common_handler: None,
            common_events: HashSet::new(),
        }
    }
}

/// A validated, immutable rule table shared by any number of entities.
///
/// Cloning is cheap; clones share rules, executer and metrics.
///
/// Events for one [`Entity`] are processed strictly one at a time, chained
/// events included. Events for different entities run independently.
///
/// # Example
///
/// ```rust
/// use lockstep::builder::FsmBuilder;
/// use lockstep::core::{Entity, Event};
/// use lockstep::engine::{Job, ScheduleError};
/// use lockstep::{event_enum, state_enum};
///
/// state_enum! {
///     enum Session { Idle, Active, Closed }
///     final: [Closed]
/// }
/// event_enum! {
///     enum Signal { Start, Stop }
/// }
///
/// let fsm = FsmBuilder::<Session, Signal>::new()
///     .transition(Session::Idle, Signal::Start, Session::Active)
///     .transition(Session::Active, Signal::Stop, Session::Closed)
///     .callback(Session::Idle, |_ctx| {})
///     .callback(Session::Active, |_ctx| {})
///     .callback(Session::Closed, |_ctx| {})
///     .build(|job: Job| -> Result<(), ScheduleError> {
///         std::thread::spawn(job);
///         Ok(())
///     })
///     .unwrap();
///
/// let session = Entity::new(Session::Idle);
/// fsm.sync_send_event(&session, Event::new(Signal::Start)).unwrap();
/// fsm.sync_send_event(&session, Event::new(Signal::Stop)).unwrap();
///
/// assert_eq!(session.current_state(), Session::Closed);
/// assert!(fsm.sync_send_event(&session, Event::new(Signal::Start)).is_err());
/// ```
pub struct Fsm<S: State, K: EventKind, P = (), I = ()> {
    rules: Arc<Rules<S, K, P, I>>,
}

struct Rules<S: State, K: EventKind, P, I> {
    transitions: TransitionTable<S, K>,
    callbacks: HashMap<S, Callback<S, K, P, I>>,
    common_handler: Option<Callback<S, K, P, I>>,
    common_events: HashSet<K>,
    executer: Arc<dyn Executer>,
    metrics: FsmMetrics<K>,
}

impl<S: State, K: EventKind, P, I> Fsm<S, K, P, I> {
    /// Validate `options` and build a state machine that runs asynchronous
    /// sends on `executer`.
    pub fn new<E>(options: FsmOptions<S, K, P, I>, executer: E) -> Result<Self, ConfigError>
    where
        E: Executer + 'static,
    {
        Self::with_executer(options, Arc::new(executer))
    }

    /// Like [`Fsm::new`], for an executer shared with other state machines.
    pub fn with_executer(
        options: FsmOptions<S, K, P, I>,
        executer: Arc<dyn Executer>,
    ) -> Result<Self, ConfigError> {
        let ctx = ConfigContext {
            transitions: &options.transitions,
            callback_states: options.callbacks.keys().collect(),
            common_events: &options.common_events,
            has_common_handler: options.common_handler.is_some(),
        };
        if let Validation::Failure(errors) = validate(&ctx) {
            let violations: Vec<ConfigViolation> = errors.iter().cloned().collect();
            warn!(
                violations = violations.len(),
                "rejected state machine configuration"
            );
            return Err(ConfigError::new(violations));
        }

        debug!(
            transitions = options.transitions.len(),
            states = options.callbacks.len(),
            common_events = options.common_events.len(),
            "state machine configured"
        );

        Ok(Self {
            rules: Arc::new(Rules {
                transitions: options.transitions,
                callbacks: options.callbacks,
                common_handler: options.common_handler,
                common_events: options.common_events,
                executer,
                metrics: FsmMetrics::new(),
            }),
        })
    }

    /// Process `event` for `entity` inline and return its outcome.
    ///
    /// Blocks while another event for `entity` is being processed, then for as
    /// long as the callbacks (and any chained events) run.
    pub fn sync_send_event(&self, entity: &Entity<S, I>, event: Event<K, P>) -> Result<(), FsmError> {
        let (reporter, mut completion) = completion::channel();
        self.rules.metrics.on_submitted();

        if let Some(kind) = self.rules.admit(entity, &event, &reporter) {
            let common = self.rules.is_common(&kind);
            self.rules.run(entity, event, &reporter);
            if common {
                reporter.report(Ok(()));
            }
        }

        drop(reporter);
        completion.try_result().unwrap_or(Err(FsmError::Abandoned))
    }

    /// Whether `kind` is handled by the common handler.
    pub fn is_common(&self, kind: &K) -> bool {
        self.rules.is_common(kind)
    }

    /// The state `kind` leads to from `state`, if there is a rule for it.
    pub fn next_state(&self, state: &S, kind: &K) -> Option<&S> {
        self.rules.transitions.next(state, kind)
    }

    pub fn transitions(&self) -> &TransitionTable<S, K> {
        &self.rules.transitions
    }

    /// Point-in-time copy of the dispatch counters.
    pub fn metrics(&self) -> MetricsSnapshot<K> {
        self.rules.metrics.snapshot()
    }
}

impl<S, K, P, I> Fsm<S, K, P, I>
where
    S: State,
    K: EventKind,
    P: Send + Sync + 'static,
    I: Send + Sync + 'static,
{
    /// Hand `event` for `entity` to the executer and return immediately.
    ///
    /// Transitional events report once the transition is known to be valid
    /// (or not); common events report as soon as the executer accepts them.
    /// If the executer rejects the work, the rejection is reported and nothing
    /// runs.
    pub fn send_event(&self, entity: &Arc<Entity<S, I>>, event: Event<K, P>) -> Completion {
        let (reporter, completion) = completion::channel();
        self.rules.metrics.on_submitted();

        let Some(kind) = self.rules.admit(entity, &event, &reporter) else {
            return completion;
        };
        let common = self.rules.is_common(&kind);

        let rules = Arc::clone(&self.rules);
        let target = Arc::clone(entity);
        let job_reporter = reporter.clone();
        let job: Job = Box::new(move || rules.run(&target, event, &job_reporter));

        match self.rules.executer.execute(job) {
            Ok(()) if common => reporter.report(Ok(())),
            Ok(()) => {}
            Err(err) => {
                warn!(
                    entity = %entity.id(),
                    event = kind.name(),
                    error = %err,
                    "executer rejected event"
                );
                reporter.report(Err(FsmError::Schedule(err)));
            }
        }

        completion
    }
}

impl<S: State, K: EventKind, P, I> Clone for Fsm<S, K, P, I> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<S: State, K: EventKind, P, I> fmt::Debug for Fsm<S, K, P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("transitions", &self.rules.transitions.len())
            .field("states", &self.rules.callbacks.len())
            .field("common_events", &self.rules.common_events)
            .finish()
    }
}

impl<S: State, K: EventKind, P, I> Rules<S, K, P, I> {
    fn is_common(&self, kind: &K) -> bool {
        self.common_events.contains(kind)
    }

    /// Accept caller events only; ENTRY/EXIT belong to the engine.
    fn admit(&self, entity: &Entity<S, I>, event: &Event<K, P>, reporter: &Reporter) -> Option<K> {
        match event.kind() {
            Kind::Custom(kind) => Some(kind.clone()),
            reserved => {
                warn!(
                    entity = %entity.id(),
                    event = reserved.name(),
                    "refused engine-reserved event kind"
                );
                reporter.report(Err(FsmError::ReservedKind {
                    kind: reserved.name().to_string(),
                }));
                None
            }
        }
    }

    /// Process `event` and everything it chains while holding the entity's
    /// processing lock.
    fn run(&self, entity: &Entity<S, I>, event: Event<K, P>, reporter: &Reporter) {
        let _processing = entity.lock_processing();

        let mut next = self.dispatch(entity, &event, reporter);
        while let Some(chained) = next.take() {
            self.metrics.on_submitted();
            debug!(
                entity = %entity.id(),
                event = chained.kind().name(),
                "processing chained event"
            );
            next = self.dispatch(entity, &chained, &Reporter::detached());
        }
    }

    fn dispatch(&self, entity: &Entity<S, I>, event: &Event<K, P>, reporter: &Reporter) -> Option<Event<K, P>> {
        // Reserved kinds never get this far: `admit` and `set_next_event`
        // refuse them.
        let kind = event.kind().as_custom()?;

        let started = Instant::now();
        self.metrics.on_triggered();

        let next = if self.is_common(kind) {
            self.handle_common(entity, event)
        } else {
            self.transit(entity, event, kind, reporter)
        };

        self.metrics.on_completed(kind, started.elapsed());
        next
    }

    fn handle_common(&self, entity: &Entity<S, I>, event: &Event<K, P>) -> Option<Event<K, P>> {
        let handler = self.common_handler.as_ref()?;
        let ctx = CallbackContext::new(entity, event, Chaining::Allowed);
        handler(&ctx);
        ctx.into_next()
    }

    fn transit(
        &self,
        entity: &Entity<S, I>,
        event: &Event<K, P>,
        kind: &K,
        reporter: &Reporter,
    ) -> Option<Event<K, P>> {
        let current = entity.current_state();

        let Some(next) = self.transitions.next(&current, kind) else {
            warn!(
                entity = %entity.id(),
                state = current.name(),
                event = kind.name(),
                "unknown transition"
            );
            reporter.report(Err(FsmError::UnknownTransition {
                state: current.name().to_string(),
                event: kind.name().to_string(),
            }));
            return None;
        };

        reporter.report(Ok(()));

        if *next == current {
            return self.invoke(&current, entity, event, Chaining::Allowed);
        }

        self.invoke(&current, entity, event, Chaining::Transition { to: next });
        self.invoke(&current, entity, &event.derive(Kind::Exit), Chaining::Exit);

        entity.set_state(next.clone());
        debug!(
            entity = %entity.id(),
            from = current.name(),
            to = next.name(),
            event = kind.name(),
            "state changed"
        );

        self.invoke(next, entity, &event.derive(Kind::Entry), Chaining::Allowed)
    }

    fn invoke(
        &self,
        state: &S,
        entity: &Entity<S, I>,
        event: &Event<K, P>,
        chaining: Chaining<'_, S>,
    ) -> Option<Event<K, P>> {
        let callback = self.callbacks.get(state)?;
        let ctx = CallbackContext::new(entity, event, chaining);
        callback(&ctx);
        ctx.into_next()
    }
}
