// ── Reactive match store ──
//
// Publication side of the synchronizer. Values are broadcast to any number
// of readers over `watch` channels; only the controller's sync task writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{DerivedMatchState, RemoteStatusSnapshot, ScoringEvent};
use crate::stream::MatchStream;
use crate::sync::{Applied, Synchronizer};

pub type ScoringLogSnapshot = Arc<Vec<Arc<ScoringEvent>>>;

/// Read-only view of the synchronized match state.
///
/// Subscribers are only woken when a value actually changes; re-applying an
/// identical snapshot publishes nothing.
pub struct MatchStore {
    state: watch::Sender<DerivedMatchState>,
    scoring_log: watch::Sender<ScoringLogSnapshot>,
    remote: watch::Sender<Option<Arc<RemoteStatusSnapshot>>>,
    last_message: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for MatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(DerivedMatchState::default());
        let (scoring_log, _) = watch::channel(Arc::new(Vec::new()));
        let (remote, _) = watch::channel(None);
        let (last_message, _) = watch::channel(None);

        Self {
            state,
            scoring_log,
            remote,
            last_message,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> DerivedMatchState {
        *self.state.borrow()
    }

    /// Most recent first.
    pub fn scoring_log_snapshot(&self) -> ScoringLogSnapshot {
        Arc::clone(&self.scoring_log.borrow())
    }

    /// Last raw status, `None` until the first one arrives.
    pub fn remote_snapshot(&self) -> Option<Arc<RemoteStatusSnapshot>> {
        self.remote.borrow().clone()
    }

    /// When the last recognised frame was applied.
    pub fn last_message_at(&self) -> Option<DateTime<Utc>> {
        *self.last_message.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> MatchStream<DerivedMatchState> {
        MatchStream::new(self.state.subscribe())
    }

    pub fn subscribe_scoring_log(&self) -> MatchStream<ScoringLogSnapshot> {
        MatchStream::new(self.scoring_log.subscribe())
    }

    pub fn subscribe_remote(&self) -> MatchStream<Option<Arc<RemoteStatusSnapshot>>> {
        MatchStream::new(self.remote.subscribe())
    }

    // ── Publication (sync task only) ─────────────────────────────────

    /// Publish whatever `applied` may have changed.
    pub(crate) fn publish(&self, sync: &Synchronizer, applied: Applied) {
        match applied {
            Applied::Ignored => return,
            Applied::Status => {
                let remote = sync.remote().cloned();
                self.remote.send_if_modified(|current| {
                    let same = match (current.as_deref(), remote.as_deref()) {
                        (Some(a), Some(b)) => a == b,
                        (None, None) => true,
                        _ => false,
                    };
                    if !same {
                        *current = remote;
                    }
                    !same
                });
            }
            Applied::Score => {
                self.scoring_log.send_replace(sync.scoring_log().snapshot());
            }
        }
        self.publish_state(sync);
        self.last_message.send_replace(Some(Utc::now()));
    }

    /// Publish the derived state if it differs from what readers hold.
    pub(crate) fn publish_state(&self, sync: &Synchronizer) {
        let next = *sync.state();
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use fieldlink_api::{ConnectionState, ScoreMessage};

    fn running_auto() -> RemoteStatusSnapshot {
        RemoteStatusSnapshot {
            running: true,
            period: Some("auto".into()),
            match_time_left: Some(150.0),
            estop_ok: true,
            ball_count: Some(0),
            ..RemoteStatusSnapshot::default()
        }
    }

    #[tokio::test]
    async fn identical_status_does_not_notify() {
        let store = MatchStore::new();
        let mut sync = Synchronizer::new();
        let mut sub = store.subscribe();

        sync.apply_status(running_auto());
        store.publish(&sync, Applied::Status);
        let state = sub.changed().await.unwrap();
        assert_eq!(state.time_remaining, 150);

        sync.apply_status(running_auto());
        store.publish(&sync, Applied::Status);
        let quiet = tokio::time::timeout(Duration::from_millis(50), sub.changed()).await;
        assert!(quiet.is_err(), "re-applying a snapshot must not notify");
    }

    #[tokio::test]
    async fn scores_publish_log_and_count() {
        let store = MatchStore::new();
        let mut sync = Synchronizer::new();
        let mut log = store.subscribe_scoring_log();
        assert!(log.current().is_empty());

        sync.apply_score(&ScoreMessage {
            count: 9,
            exit: 2,
            ts: 3.0,
        });
        store.publish(&sync, Applied::Score);

        let events = log.changed().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(store.snapshot().global_ball_count, 9);
        assert!(store.last_message_at().is_some());
    }

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        use futures_util::StreamExt;

        let store = MatchStore::new();
        let mut sync = Synchronizer::new();
        let mut states = store.subscribe().into_stream();

        let first = states.next().await.unwrap();
        assert_eq!(first.time_remaining, 0);

        sync.apply_status(running_auto());
        store.publish(&sync, Applied::Status);
        let next = tokio::time::timeout(Duration::from_secs(1), states.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.time_remaining, 150);
    }

    #[test]
    fn ignored_frames_publish_nothing() {
        let store = MatchStore::new();
        let sync = Synchronizer::new();
        store.publish(&sync, Applied::Ignored);
        assert!(store.last_message_at().is_none());
        assert!(store.remote_snapshot().is_none());
    }

    #[test]
    fn connection_state_publishes() {
        let store = MatchStore::new();
        let mut sync = Synchronizer::new();
        sync.set_connection_state(ConnectionState::Connecting);
        store.publish_state(&sync);
        assert_eq!(store.snapshot().connection_state, ConnectionState::Connecting);
    }
}
