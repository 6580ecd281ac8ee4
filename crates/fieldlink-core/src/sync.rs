// ── State synchronizer ──
//
// A pure fold: inbound envelopes in, derived state out. No timers, no I/O,
// no clocks. Driven by the controller's sync task, which publishes the
// result to the `MatchStore` after each step.

use std::sync::Arc;

use tracing::{debug, trace};

use fieldlink_api::{ConnectionState, Envelope, ScoreMessage};

use crate::derive;
use crate::model::{
    DerivedMatchState, MotorState, Period, RemoteStatusSnapshot, ScoringEvent, ScoringLog,
};

/// What an envelope touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Status,
    Score,
    Ignored,
}

/// Owns the raw snapshot, the derived state, and the scoring log.
#[derive(Debug, Default)]
pub struct Synchronizer {
    state: DerivedMatchState,
    log: ScoringLog,
    remote: Option<Arc<RemoteStatusSnapshot>>,
    arrivals: u64,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one envelope. Unknown frame types change nothing.
    pub fn apply(&mut self, envelope: Envelope) -> Applied {
        match envelope {
            Envelope::Status(msg) => {
                self.apply_status(RemoteStatusSnapshot::from(msg));
                Applied::Status
            }
            Envelope::Score(msg) => {
                self.apply_score(&msg);
                Applied::Score
            }
            Envelope::Unknown { kind } => {
                debug!(kind, "ignoring frame type with no handler");
                Applied::Ignored
            }
        }
    }

    /// Replace the snapshot and re-derive the state from it.
    ///
    /// Idempotent. The ball count is the only value carried over from
    /// before, and only when the snapshot omits it.
    pub fn apply_status(&mut self, snapshot: RemoteStatusSnapshot) {
        let hubs = derive::hub_statuses(&snapshot);
        let period = Period::from_controller(snapshot.period.as_deref());

        self.state = DerivedMatchState {
            period,
            time_remaining: derive::time_remaining(snapshot.match_time_left),
            paused: snapshot.paused,
            red_hub_status: hubs.red,
            blue_hub_status: hubs.blue,
            led_mode: derive::led_mode(&snapshot),
            global_ball_count: snapshot
                .ball_count
                .unwrap_or(self.state.global_ball_count),
            estop_ok: snapshot.estop_ok,
            connection_state: self.state.connection_state,
            hub_side: snapshot.hub_side,
            motor: MotorState {
                enabled: snapshot.motor_enabled.unwrap_or(false),
                estop_engaged: !snapshot.estop_ok,
            },
        };
        trace!(%period, time_remaining = self.state.time_remaining, "applied status");
        self.remote = Some(Arc::new(snapshot));
    }

    /// Log the event and take the controller's count verbatim.
    pub fn apply_score(&mut self, score: &ScoreMessage) {
        self.arrivals += 1;
        self.log.push(ScoringEvent::from_report(score, self.arrivals));
        self.state.global_ball_count = score.count;
        debug!(count = score.count, exit = score.exit, "ball scored");
    }

    pub fn set_connection_state(&mut self, state: ConnectionState) {
        self.state.connection_state = state;
    }

    pub fn state(&self) -> &DerivedMatchState {
        &self.state
    }

    pub fn scoring_log(&self) -> &ScoringLog {
        &self.log
    }

    /// Last raw snapshot, if any status has arrived.
    pub fn remote(&self) -> Option<&Arc<RemoteStatusSnapshot>> {
        self.remote.as_ref()
    }
}
