//! Dispatch metrics for state machines.
//!
//! Every [`Fsm`](crate::engine::Fsm) counts submitted, triggered and
//! completed events, and keeps per-kind counts and durations. Counters are
//! updated from many dispatch jobs at once behind their own lock, which is
//! never held while a callback runs.
//!
//! Per-kind counts are 32 bits wide. When one would overflow it restarts from
//! zero together with its duration, and the kind's reset counter goes up, so
//! a reader can always tell a fresh counter from a wrapped one.

use crate::core::EventKind;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

pub mod error;
pub mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{EventStats, MetricsSnapshot};

/// Collector shared by all dispatch jobs of one state machine.
pub(crate) struct FsmMetrics<K: EventKind> {
    counters: Mutex<Counters<K>>,
}

struct Counters<K> {
    submitted: u64,
    triggered: u64,
    completed: u64,
    events: HashMap<K, EventMetrics>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct EventMetrics {
    count: u32,
    total: Duration,
    resets: u16,
}

impl EventMetrics {
    fn record(&mut self, elapsed: Duration) {
        if self.count == u32::MAX {
            self.count = 0;
            self.total = Duration::ZERO;
            self.resets = self.resets.saturating_add(1);
        }
        self.count += 1;
        self.total = self.total.saturating_add(elapsed);
    }
}

impl<K: EventKind> FsmMetrics<K> {
    pub(crate) fn new() -> Self {
        Self {
            counters: Mutex::new(Counters {
                submitted: 0,
                triggered: 0,
                completed: 0,
                events: HashMap::new(),
            }),
        }
    }

    pub(crate) fn on_submitted(&self) {
        self.counters.lock().submitted += 1;
    }

    pub(crate) fn on_triggered(&self) {
        self.counters.lock().triggered += 1;
    }

    pub(crate) fn on_completed(&self, kind: &K, elapsed: Duration) {
        let mut counters = self.counters.lock();
        counters.completed += 1;
        if let Some(stats) = counters.events.get_mut(kind) {
            stats.record(elapsed);
        } else {
            let mut stats = EventMetrics::default();
            stats.record(elapsed);
            counters.events.insert(kind.clone(), stats);
        }
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot<K> {
        let counters = self.counters.lock();
        let mut events: Vec<EventStats<K>> = counters
            .events
            .iter()
            .map(|(kind, stats)| EventStats {
                kind: kind.clone(),
                count: stats.count,
                total_duration: stats.total,
                resets: stats.resets,
            })
            .collect();
        events.sort_by(|a, b| a.kind.name().cmp(b.kind.name()));

        MetricsSnapshot {
            taken_at: Utc::now(),
            submitted: counters.submitted,
            triggered: counters.triggered,
            completed: counters.completed,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_enum;
    use proptest::prelude::*;

    event_enum! {
        enum TestEvent {
            Start,
            Stop,
            Ping,
        }
    }

    #[test]
    fn new_collector_is_empty() {
        let metrics: FsmMetrics<TestEvent> = FsmMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.submitted, 0);
        assert_eq!(snapshot.triggered, 0);
        assert_eq!(snapshot.completed, 0);
        assert!(snapshot.events.is_empty());
    }

    #[test]
    fn completions_are_grouped_by_kind() {
        let metrics = FsmMetrics::new();
        for _ in 0..3 {
            metrics.on_submitted();
            metrics.on_triggered();
            metrics.on_completed(&TestEvent::Start, Duration::from_millis(2));
        }
        metrics.on_submitted();
        metrics.on_triggered();
        metrics.on_completed(&TestEvent::Ping, Duration::from_millis(1));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.completed, 4);
        let start = snapshot.stats_for(&TestEvent::Start).unwrap();
        assert_eq!(start.count, 3);
        assert_eq!(start.total_duration, Duration::from_millis(6));
        assert_eq!(snapshot.stats_for(&TestEvent::Ping).unwrap().count, 1);
        assert!(snapshot.stats_for(&TestEvent::Stop).is_none());
    }

    #[test]
    fn snapshot_orders_kinds_by_name() {
        let metrics = FsmMetrics::new();
        metrics.on_completed(&TestEvent::Stop, Duration::ZERO);
        metrics.on_completed(&TestEvent::Ping, Duration::ZERO);
        metrics.on_completed(&TestEvent::Start, Duration::ZERO);

        let snapshot = metrics.snapshot();
        let names: Vec<&str> = snapshot.events.iter().map(|s| s.kind.name()).collect();
        assert_eq!(names, vec!["Ping", "Start", "Stop"]);
    }

    #[test]
    fn snapshot_is_detached_from_collector() {
        let metrics = FsmMetrics::<TestEvent>::new();
        metrics.on_submitted();
        let before = metrics.snapshot();
        metrics.on_submitted();

        assert_eq!(before.submitted, 1);
        assert_eq!(metrics.snapshot().submitted, 2);
    }

    #[test]
    fn overflow_resets_count_and_duration() {
        let mut stats = EventMetrics {
            count: u32::MAX,
            total: Duration::from_secs(100),
            resets: 0,
        };

        stats.record(Duration::from_millis(5));

        assert_eq!(stats.count, 1);
        assert_eq!(stats.total, Duration::from_millis(5));
        assert_eq!(stats.resets, 1);
    }

    #[test]
    fn reset_counter_saturates() {
        let mut stats = EventMetrics {
            count: u32::MAX,
            total: Duration::ZERO,
            resets: u16::MAX,
        };

        stats.record(Duration::ZERO);

        assert_eq!(stats.resets, u16::MAX);
        assert_eq!(stats.count, 1);
    }

    proptest! {
        #[test]
        fn record_never_wraps_silently(
            start in (u32::MAX - 8)..=u32::MAX,
            samples in 1usize..20,
        ) {
            let mut stats = EventMetrics { count: start, total: Duration::ZERO, resets: 0 };
            for _ in 0..samples {
                stats.record(Duration::from_nanos(1));
            }

            let recorded = u64::from(start) + samples as u64;
            let expected_resets = u16::from(recorded > u64::from(u32::MAX));
            prop_assert_eq!(stats.resets, expected_resets);
            if expected_resets == 0 {
                prop_assert_eq!(u64::from(stats.count), recorded);
            } else {
                prop_assert_eq!(u64::from(stats.count), recorded - u64::from(u32::MAX));
                prop_assert_eq!(stats.total, Duration::from_nanos(u64::from(stats.count)));
            }
        }
    }
}
