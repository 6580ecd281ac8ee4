// ── Derived match state ──

use serde::Serialize;

use fieldlink_api::ConnectionState;

use super::{Alliance, HubStatus, LedMode, Period};

/// Seconds left at which the endgame clock is drawn as urgent.
const URGENT_SECS: u32 = 10;

/// Motor view: what the controller says about the ball-feed motor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorState {
    pub enabled: bool,
    /// Hardware e-stop chain is open.
    pub estop_engaged: bool,
}

/// The canonical, presentation-facing match state.
///
/// Every field is either copied or derived from the last controller
/// snapshot (or score message, for the ball count). Nothing here advances
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMatchState {
    pub period: Period,
    /// Whole seconds left in the match, rounded up.
    pub time_remaining: u32,
    pub paused: bool,
    pub red_hub_status: HubStatus,
    pub blue_hub_status: HubStatus,
    pub led_mode: LedMode,
    pub global_ball_count: u64,
    pub estop_ok: bool,
    pub connection_state: ConnectionState,
    /// Side this controller drives.
    pub hub_side: Alliance,
    pub motor: MotorState,
}

impl Default for DerivedMatchState {
    fn default() -> Self {
        Self {
            period: Period::Disabled,
            time_remaining: 0,
            paused: false,
            red_hub_status: HubStatus::Inactive,
            blue_hub_status: HubStatus::Inactive,
            led_mode: LedMode::Off,
            global_ball_count: 0,
            estop_ok: true,
            connection_state: ConnectionState::Disconnected,
            hub_side: Alliance::Red,
            motor: MotorState::default(),
        }
    }
}

impl DerivedMatchState {
    pub fn hub_status(&self, alliance: Alliance) -> HubStatus {
        match alliance {
            Alliance::Red => self.red_hub_status,
            Alliance::Blue => self.blue_hub_status,
        }
    }

    pub fn clock_text(&self) -> String {
        clock_text(self.period, self.time_remaining)
    }

    /// Last seconds of the endgame.
    pub fn is_urgent(&self) -> bool {
        self.period == Period::Endgame && self.time_remaining <= URGENT_SECS
    }
}

/// `m:ss`, or `--:--` outside a live match.
pub fn clock_text(period: Period, time_remaining: u32) -> String {
    if period.is_idle() {
        return "--:--".into();
    }
    format!("{}:{:02}", time_remaining / 60, time_remaining % 60)
}
