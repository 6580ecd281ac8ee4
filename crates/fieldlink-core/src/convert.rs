// ── Wire-to-domain conversions ──
//
// Bridges `fieldlink_api` frames into `fieldlink_core::model` types. No
// mapping to canonical enums happens here; that is `derive`'s job. Wire
// quirks are already normalized by the codec.

use fieldlink_api::{ScoreMessage, StatusMessage};

use crate::model::{RemoteStatusSnapshot, ScoringEvent};

impl From<StatusMessage> for RemoteStatusSnapshot {
    fn from(msg: StatusMessage) -> Self {
        let m = msg.match_status;
        Self {
            running: m.running,
            paused: m.paused,
            period: m.period,
            match_time_left: m.match_time_left,
            time_left_in_period: m.time_left_in_period,
            hub_active: m.hub_active,
            warn_deactivate: m.warn_deactivate,
            led_mode: m.led_mode,
            led_alliance: m.led_alliance,
            auto_winner: m.auto_winner,
            hub_side: m.hub_side,
            force_mode: m.force_mode,
            field_safe: m.field_safe,
            estop_ok: msg.estop_ok,
            ball_count: msg.ball_count,
            motor_enabled: msg.motor_enabled,
            ts: msg.ts,
        }
    }
}

impl ScoringEvent {
    /// Build the log entry for the `arrival`-th score frame.
    pub fn from_report(msg: &ScoreMessage, arrival: u64) -> Self {
        Self::new(msg.timestamp_ms(), msg.exit, msg.count, arrival)
    }
}
