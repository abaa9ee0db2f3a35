//! Immutable copies of the dispatch counters.

use crate::core::EventKind;
use crate::metrics::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters of one event kind at the time of a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EventStats<K: EventKind> {
    pub kind: K,
    /// Completed dispatches since the last counter reset
    pub count: u32,
    /// Time spent in those dispatches
    pub total_duration: Duration,
    /// How many times `count` overflowed and started again from zero
    pub resets: u16,
}

impl<K: EventKind> EventStats<K> {
    /// Mean dispatch time, `None` right after a reset.
    pub fn average_duration(&self) -> Option<Duration> {
        (self.count > 0).then(|| self.total_duration / self.count)
    }
}

/// Point-in-time copy of a state machine's metrics.
///
/// Totals always satisfy `completed <= triggered <= submitted`. Chained
/// events count as submissions of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MetricsSnapshot<K: EventKind> {
    pub taken_at: DateTime<Utc>,
    /// Events handed to the state machine, including rejected ones
    pub submitted: u64,
    /// Dispatches that acquired their entity's lock and started
    pub triggered: u64,
    /// Dispatches that finished
    pub completed: u64,
    /// Per-kind counters, ordered by kind name
    pub events: Vec<EventStats<K>>,
}

impl<K: EventKind> MetricsSnapshot<K> {
    pub fn stats_for(&self, kind: &K) -> Option<&EventStats<K>> {
        self.events.iter().find(|stats| &stats.kind == kind)
    }

    /// Dispatches started but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.triggered.saturating_sub(self.completed)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_enum;

    event_enum! {
        enum TestEvent {
            Start,
            Ping,
        }
    }

    fn snapshot() -> MetricsSnapshot<TestEvent> {
        MetricsSnapshot {
            taken_at: Utc::now(),
            submitted: 5,
            triggered: 4,
            completed: 3,
            events: vec![EventStats {
                kind: TestEvent::Start,
                count: 3,
                total_duration: Duration::from_millis(30),
                resets: 0,
            }],
        }
    }

    #[test]
    fn average_duration_divides_total() {
        let snapshot = snapshot();
        let stats = snapshot.stats_for(&TestEvent::Start).unwrap();
        assert_eq!(stats.average_duration(), Some(Duration::from_millis(10)));
        assert!(snapshot.stats_for(&TestEvent::Ping).is_none());
    }

    #[test]
    fn average_duration_is_none_without_samples() {
        let stats = EventStats {
            kind: TestEvent::Ping,
            count: 0,
            total_duration: Duration::ZERO,
            resets: 1,
        };
        assert_eq!(stats.average_duration(), None);
    }

    #[test]
    fn in_flight_counts_unfinished_dispatches() {
        assert_eq!(snapshot().in_flight(), 1);
    }

    #[test]
    fn json_export_keeps_counters() {
        let snapshot = snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"submitted\":5"));

        let restored = MetricsSnapshot::<TestEvent>::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn binary_export_keeps_counters() {
        let snapshot = snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        let restored = MetricsSnapshot::<TestEvent>::from_bytes(&bytes).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            MetricsSnapshot::<TestEvent>::from_json("{"),
            Err(SnapshotError::DeserializationFailed(_))
        ));
        assert!(matches!(
            MetricsSnapshot::<TestEvent>::from_bytes(&[1, 2]),
            Err(SnapshotError::DeserializationFailed(_))
        ));
    }
}
