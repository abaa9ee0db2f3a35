//! Validation rules for state machine configurations.

use crate::core::{EventKind, State};
use crate::validation::context::ConfigContext;
use crate::validation::violations::ConfigViolation;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of a single rule, accumulating every violation it finds.
pub type RuleResult = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Run every rule, accumulating ALL violations.
/// Returns Validation::Success(()) if the configuration is usable.
pub fn validate<S: State, K: EventKind>(ctx: &ConfigContext<'_, S, K>) -> RuleResult {
    let checks = vec![
        callbacks_cover_sources(ctx),
        callbacks_cover_targets(ctx),
        common_events_are_disjoint(ctx),
        common_handler_is_present(ctx),
    ];

    Validation::all_vec(checks).map(|_| ())
}

/// Every state a transition leaves from must have a callback.
pub fn callbacks_cover_sources<S: State, K: EventKind>(ctx: &ConfigContext<'_, S, K>) -> RuleResult {
    let missing: BTreeSet<String> = ctx
        .transitions
        .sources()
        .filter(|state| !ctx.callback_states.contains(state))
        .map(|state| state.name().to_string())
        .collect();

    collect(
        missing
            .into_iter()
            .map(|state| ConfigViolation::MissingSourceCallback { state }),
    )
}

/// Every state a transition leads to must have a callback to receive ENTRY.
pub fn callbacks_cover_targets<S: State, K: EventKind>(ctx: &ConfigContext<'_, S, K>) -> RuleResult {
    let missing: BTreeSet<String> = ctx
        .transitions
        .targets()
        .filter(|state| !ctx.callback_states.contains(state))
        .map(|state| state.name().to_string())
        .collect();

    collect(
        missing
            .into_iter()
            .map(|state| ConfigViolation::MissingTargetCallback { state }),
    )
}

/// A common event is never looked up in the transition table, so it must not
/// be a key there.
pub fn common_events_are_disjoint<S: State, K: EventKind>(
    ctx: &ConfigContext<'_, S, K>,
) -> RuleResult {
    let overlapping: BTreeSet<String> = ctx
        .transitions
        .kinds()
        .filter(|kind| ctx.common_events.contains(kind))
        .map(|kind| kind.name().to_string())
        .collect();

    collect(
        overlapping
            .into_iter()
            .map(|event| ConfigViolation::CommonEventInTransitions { event }),
    )
}

pub fn common_handler_is_present<S: State, K: EventKind>(
    ctx: &ConfigContext<'_, S, K>,
) -> RuleResult {
    if ctx.common_events.is_empty() || ctx.has_common_handler {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::MissingCommonHandler {
            count: ctx.common_events.len(),
        })
    }
}

fn collect(violations: impl Iterator<Item = ConfigViolation>) -> RuleResult {
    let checks: Vec<RuleResult> = violations.map(Validation::fail).collect();
    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionTable;
    use serde::{Deserialize, Serialize};
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Active,
        Closed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Active => "Active",
                Self::Closed => "Closed",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestEvent {
        Start,
        Stop,
        Ping,
    }

    impl EventKind for TestEvent {
        fn name(&self) -> &str {
            match self {
                Self::Start => "Start",
                Self::Stop => "Stop",
                Self::Ping => "Ping",
            }
        }
    }

    fn table() -> TransitionTable<TestState, TestEvent> {
        TransitionTable::new()
            .with(TestState::Idle, TestEvent::Start, TestState::Active)
            .with(TestState::Active, TestEvent::Stop, TestState::Closed)
    }

    fn violations(result: RuleResult) -> Vec<ConfigViolation> {
        match result {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    #[test]
    fn complete_configuration_passes() {
        let transitions = table();
        let states = [TestState::Idle, TestState::Active, TestState::Closed];
        let common: HashSet<TestEvent> = [TestEvent::Ping].into_iter().collect();
        let ctx = ConfigContext {
            transitions: &transitions,
            callback_states: states.iter().collect(),
            common_events: &common,
            has_common_handler: true,
        };

        assert!(validate(&ctx).is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let transitions = table().with(TestState::Closed, TestEvent::Ping, TestState::Idle);
        let states = [TestState::Idle];
        let common: HashSet<TestEvent> = [TestEvent::Ping].into_iter().collect();
        let ctx = ConfigContext {
            transitions: &transitions,
            callback_states: states.iter().collect(),
            common_events: &common,
            has_common_handler: false,
        };

        let found = violations(validate(&ctx));

        assert!(found.contains(&ConfigViolation::MissingSourceCallback {
            state: "Active".to_string()
        }));
        assert!(found.contains(&ConfigViolation::MissingSourceCallback {
            state: "Closed".to_string()
        }));
        assert!(found.contains(&ConfigViolation::MissingTargetCallback {
            state: "Active".to_string()
        }));
        assert!(found.contains(&ConfigViolation::CommonEventInTransitions {
            event: "Ping".to_string()
        }));
        assert!(found.contains(&ConfigViolation::MissingCommonHandler { count: 1 }));
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn missing_target_callback_is_reported_once_per_state() {
        let transitions = TransitionTable::new()
            .with(TestState::Idle, TestEvent::Start, TestState::Closed)
            .with(TestState::Active, TestEvent::Stop, TestState::Closed);
        let states = [TestState::Idle, TestState::Active];
        let common = HashSet::new();
        let ctx = ConfigContext {
            transitions: &transitions,
            callback_states: states.iter().collect(),
            common_events: &common,
            has_common_handler: false,
        };

        assert_eq!(
            violations(callbacks_cover_targets(&ctx)),
            vec![ConfigViolation::MissingTargetCallback {
                state: "Closed".to_string()
            }]
        );
    }

    #[test]
    fn handler_is_optional_without_common_events() {
        let transitions = table();
        let states = [TestState::Idle, TestState::Active, TestState::Closed];
        let common = HashSet::new();
        let ctx = ConfigContext {
            transitions: &transitions,
            callback_states: states.iter().collect(),
            common_events: &common,
            has_common_handler: false,
        };

        assert!(common_handler_is_present(&ctx).is_success());
    }
}
