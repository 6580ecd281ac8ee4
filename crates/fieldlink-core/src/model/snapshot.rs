// ── Raw controller snapshot ──

use serde::Serialize;

use super::{Alliance, FieldSafeMode, ForceMode};

/// The fields of the last status message, kept as the controller sent them.
///
/// Replaced wholesale on every status message. Strings stay in controller
/// vocabulary here; mapping to canonical enums happens in [`crate::derive`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStatusSnapshot {
    pub running: bool,
    pub paused: bool,
    pub period: Option<String>,
    pub match_time_left: Option<f64>,
    pub time_left_in_period: Option<f64>,

    /// Only meaningful for this controller's own side.
    pub hub_active: bool,
    pub warn_deactivate: bool,

    pub led_mode: Option<String>,
    pub led_alliance: Alliance,
    pub auto_winner: Option<Alliance>,
    pub hub_side: Alliance,
    pub force_mode: Option<ForceMode>,
    pub field_safe: Option<FieldSafeMode>,

    pub estop_ok: bool,
    pub ball_count: Option<u64>,
    pub motor_enabled: Option<bool>,

    /// Controller clock when the snapshot was taken, Unix seconds.
    pub ts: Option<f64>,
}
