//! What a callback sees while it runs.

use crate::core::{Entity, Event, EventKind, Kind, State};
use crate::engine::error::NextEventError;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::error;

/// A state callback.
///
/// Registered per state, it is invoked with every event processed while the
/// entity is in that state, and again with ENTRY/EXIT notifications when the
/// entity enters or leaves it. The common handler has the same shape.
pub type Callback<S, K, P = (), I = ()> =
    Arc<dyn Fn(&CallbackContext<'_, S, K, P, I>) + Send + Sync>;

/// Whether the invocation in progress may chain a follow-up event.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Chaining<'a, S> {
    Allowed,
    /// The callback is receiving EXIT for the state being left.
    Exit,
    /// The callback is receiving the event that is about to move the entity to
    /// another state.
    Transition { to: &'a S },
}

/// Context passed to a callback for exactly one invocation.
///
/// The context is borrowed by the callback and cannot outlive the call, which
/// makes the chained-event capability unavailable outside a callback.
pub struct CallbackContext<'a, S: State, K: EventKind, P = (), I = ()> {
    entity: &'a Entity<S, I>,
    event: &'a Event<K, P>,
    chaining: Chaining<'a, S>,
    next: RefCell<Option<Event<K, P>>>,
}

impl<'a, S: State, K: EventKind, P, I> CallbackContext<'a, S, K, P, I> {
    pub(crate) fn new(
        entity: &'a Entity<S, I>,
        event: &'a Event<K, P>,
        chaining: Chaining<'a, S>,
    ) -> Self {
        Self {
            entity,
            event,
            chaining,
            next: RefCell::new(None),
        }
    }

    pub fn entity(&self) -> &'a Entity<S, I> {
        self.entity
    }

    pub fn event(&self) -> &'a Event<K, P> {
        self.event
    }

    pub fn kind(&self) -> &'a Kind<K> {
        self.event.kind()
    }

    pub fn payload(&self) -> Option<&'a P> {
        self.event.payload()
    }

    pub fn info(&self) -> Option<&'a I> {
        self.entity.info()
    }

    /// The entity's current state.
    pub fn state(&self) -> S {
        self.entity.current_state()
    }

    /// Request `event` to be processed for this entity right after the
    /// current dispatch, before any other queued event.
    ///
    /// At most one event may be chained per invocation, and never from an
    /// EXIT notification or from the event that triggers a state change; chain
    /// from the ENTRY notification of the new state instead.
    pub fn set_next_event(&self, event: Event<K, P>) -> Result<(), NextEventError> {
        if event.kind().is_reserved() {
            return self.reject(NextEventError::ReservedKind {
                kind: event.kind().name().to_string(),
            });
        }

        match self.chaining {
            Chaining::Allowed => {}
            Chaining::Exit => {
                return self.reject(NextEventError::DuringExit {
                    state: self.state().name().to_string(),
                });
            }
            Chaining::Transition { to } => {
                return self.reject(NextEventError::BeforeTransition {
                    from: self.state().name().to_string(),
                    to: to.name().to_string(),
                });
            }
        }

        let mut slot = self.next.borrow_mut();
        if slot.is_some() {
            drop(slot);
            return self.reject(NextEventError::AlreadyChained);
        }
        *slot = Some(event);
        Ok(())
    }

    fn reject(&self, err: NextEventError) -> Result<(), NextEventError> {
        error!(
            entity = %self.entity.id(),
            event = self.event.kind().name(),
            error = %err,
            "invalid chained event request"
        );
        Err(err)
    }

    pub(crate) fn into_next(self) -> Option<Event<K, P>> {
        self.next.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Idle,
            Active,
        }
    }

    event_enum! {
        enum TestEvent {
            Start,
            Stop,
        }
    }

    #[test]
    fn allowed_context_accepts_one_event() {
        let entity: Entity<TestState> = Entity::new(TestState::Idle);
        let event: Event<TestEvent> = Event::new(TestEvent::Start);
        let ctx = CallbackContext::new(&entity, &event, Chaining::Allowed);

        assert_eq!(ctx.set_next_event(Event::new(TestEvent::Stop)), Ok(()));
        assert_eq!(
            ctx.set_next_event(Event::new(TestEvent::Stop)),
            Err(NextEventError::AlreadyChained)
        );

        let next = ctx.into_next().unwrap();
        assert_eq!(next.kind(), &Kind::Custom(TestEvent::Stop));
    }

    #[test]
    fn exit_context_refuses_chaining() {
        let entity: Entity<TestState> = Entity::new(TestState::Active);
        let event: Event<TestEvent> = Event::new(TestEvent::Stop).derive(Kind::Exit);
        let ctx = CallbackContext::new(&entity, &event, Chaining::Exit);

        assert_eq!(
            ctx.set_next_event(Event::new(TestEvent::Start)),
            Err(NextEventError::DuringExit {
                state: "Active".to_string()
            })
        );
        assert!(ctx.into_next().is_none());
    }

    #[test]
    fn transitioning_context_refuses_chaining() {
        let entity: Entity<TestState> = Entity::new(TestState::Idle);
        let event: Event<TestEvent> = Event::new(TestEvent::Start);
        let target = TestState::Active;
        let ctx = CallbackContext::new(&entity, &event, Chaining::Transition { to: &target });

        assert_eq!(
            ctx.set_next_event(Event::new(TestEvent::Stop)),
            Err(NextEventError::BeforeTransition {
                from: "Idle".to_string(),
                to: "Active".to_string()
            })
        );
    }

    #[test]
    fn reserved_kinds_cannot_be_chained() {
        let entity: Entity<TestState> = Entity::new(TestState::Idle);
        let event: Event<TestEvent> = Event::new(TestEvent::Start);
        let ctx = CallbackContext::new(&entity, &event, Chaining::Allowed);

        let entry = event.derive(Kind::Entry);
        assert_eq!(
            ctx.set_next_event(entry),
            Err(NextEventError::ReservedKind {
                kind: "Entry".to_string()
            })
        );
        assert!(ctx.into_next().is_none());
    }

    #[test]
    fn context_exposes_entity_and_event() {
        let entity = Entity::with_info(TestState::Idle, "peer-a");
        let event = Event::with_payload(TestEvent::Start, 5u8);
        let ctx = CallbackContext::new(&entity, &event, Chaining::Allowed);

        assert_eq!(ctx.state(), TestState::Idle);
        assert_eq!(ctx.kind(), &Kind::Custom(TestEvent::Start));
        assert_eq!(ctx.payload(), Some(&5));
        assert_eq!(ctx.info(), Some(&"peer-a"));
        assert_eq!(ctx.entity().id(), entity.id());
    }
}
