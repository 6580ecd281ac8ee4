// ── Scoring log ──

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

/// Events kept before the oldest is evicted.
pub const SCORING_LOG_CAPACITY: usize = 200;

/// One ball detected at a hub exit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringEvent {
    /// Unique per arrival, even if the controller repeats a frame.
    pub id: String,
    /// Detection time, Unix milliseconds.
    pub timestamp_ms: i64,
    /// Exit sensor, 1..=4.
    pub sensor_exit: u8,
    /// Controller's global total after this ball.
    pub count_at_event: u64,
}

impl ScoringEvent {
    /// `arrival` is a per-client sequence number; it is what keeps ids
    /// distinct when two frames carry the same timestamp, count and exit.
    pub fn new(timestamp_ms: i64, sensor_exit: u8, count_at_event: u64, arrival: u64) -> Self {
        Self {
            id: format!("{timestamp_ms}-{count_at_event}-{sensor_exit}-{arrival}"),
            timestamp_ms,
            sensor_exit,
            count_at_event,
        }
    }
}

/// Bounded, most-recent-first log of scoring events.
#[derive(Debug, Clone)]
pub struct ScoringLog {
    events: VecDeque<Arc<ScoringEvent>>,
    capacity: usize,
}

impl Default for ScoringLog {
    fn default() -> Self {
        Self::with_capacity(SCORING_LOG_CAPACITY)
    }
}

impl ScoringLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an event, evicting the oldest past capacity.
    pub fn push(&mut self, event: ScoringEvent) {
        self.events.push_front(Arc::new(event));
        self.events.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest(&self) -> Option<&Arc<ScoringEvent>> {
        self.events.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ScoringEvent>> {
        self.events.iter()
    }

    /// Cheap shareable copy for publication.
    pub fn snapshot(&self) -> Arc<Vec<Arc<ScoringEvent>>> {
        Arc::new(self.events.iter().cloned().collect())
    }
}
