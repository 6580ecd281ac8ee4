// ── Controller wire protocol ──
//
// JSON shapes exchanged with the field controller. Inbound frames are
// discriminated by `type` ("status", "score"); outbound commands are a
// closed `#[serde(tag = "type")]` enum.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Shared vocabulary ────────────────────────────────────────────────

/// One of the two alliances on the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    #[default]
    Red,
    Blue,
}

impl Alliance {
    /// The other alliance.
    pub fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manual hub override reported by (and sent to) the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceMode {
    ForceActive,
    ForceInactive,
}

/// Field-safe / post-match lighting override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSafeMode {
    Green,
    Purple,
}

/// Operator's verdict on the autonomous period. `Tie` is only ever sent;
/// the controller reports a tie as `auto_winner: null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoWinnerChoice {
    Red,
    Blue,
    Tie,
}

// ── Inbound: status ──────────────────────────────────────────────────

/// Full status snapshot, published by the controller on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Controller clock, Unix seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub ts: Option<f64>,

    pub estop_ok: bool,

    /// Authoritative running ball total. Absent on some firmware builds.
    #[serde(default, deserialize_with = "lenient")]
    pub ball_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient")]
    pub motor_enabled: Option<bool>,

    #[serde(rename = "match")]
    pub match_status: MatchStatus,
}

/// The `match` object inside a status snapshot.
///
/// Every field is defaulted, and a value of the wrong type or outside the
/// vocabulary decodes to that default (`null` flags read as `false`, an
/// unknown alliance as `red`, an unknown override as none). One odd field
/// never costs the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchStatus {
    #[serde(deserialize_with = "lenient")]
    pub running: bool,
    #[serde(deserialize_with = "lenient")]
    pub paused: bool,

    /// Controller period vocabulary: `prematch`, `auto`, `shift1`, `postmatch`, ...
    #[serde(deserialize_with = "lenient")]
    pub period: Option<String>,

    /// Seconds left in the whole match.
    #[serde(deserialize_with = "lenient")]
    pub match_time_left: Option<f64>,

    /// Seconds left in the current period.
    #[serde(deserialize_with = "lenient")]
    pub time_left_in_period: Option<f64>,

    /// Whether the hub on *this controller's* side is active.
    #[serde(deserialize_with = "lenient")]
    pub hub_active: bool,
    #[serde(deserialize_with = "lenient")]
    pub warn_deactivate: bool,

    /// Low-level animation name: `off`, `solid`, `pulse`, `chase`, `green`, `purple`.
    #[serde(deserialize_with = "lenient")]
    pub led_mode: Option<String>,

    /// LED colour. Older firmware omits it; the codec fills it in from
    /// `hub_side` before this struct is built.
    #[serde(deserialize_with = "lenient")]
    pub led_alliance: Alliance,

    /// `None` is a tie (or no verdict yet).
    #[serde(deserialize_with = "lenient")]
    pub auto_winner: Option<Alliance>,
    #[serde(deserialize_with = "lenient")]
    pub hub_side: Alliance,
    #[serde(deserialize_with = "lenient")]
    pub force_mode: Option<ForceMode>,
    #[serde(deserialize_with = "lenient")]
    pub field_safe: Option<FieldSafeMode>,
}

/// Decode a field, falling back to its default when the value does not fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_else(|e| {
        if !value.is_null() {
            tracing::debug!(%value, error = %e, "Status field out of vocabulary, using default");
        }
        T::default()
    }))
}

// ── Inbound: score ───────────────────────────────────────────────────

/// One ball detected at a hub exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMessage {
    /// New global total after this ball.
    pub count: u64,

    /// Sensor exit id, 1..=4. Older firmware calls this `sensor`.
    #[serde(alias = "sensor")]
    pub exit: u8,

    /// Unix seconds (fractional).
    pub ts: f64,
}

impl ScoreMessage {
    /// Detection time in Unix milliseconds.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn timestamp_ms(&self) -> i64 {
        (self.ts * 1000.0).round() as i64
    }
}

// ── Outbound ─────────────────────────────────────────────────────────

/// Every command shape the controller accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    MatchStart,
    MatchPause,
    MatchResume,
    MatchStop,
    ResetCount,
    SetAutoWinner { winner: AutoWinnerChoice },
    SetHubSide { alliance: Alliance },
    Force { mode: Option<ForceMode> },
    FieldSafe { mode: Option<FieldSafeMode> },
    /// `percent` is a fraction in `0.0..=1.0`; zero stops the motor.
    Motor { percent: f64 },
    /// `ts` is Unix milliseconds.
    Ping { ts: i64 },
}

impl OutboundMessage {
    /// Wire discriminator, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MatchStart => "match_start",
            Self::MatchPause => "match_pause",
            Self::MatchResume => "match_resume",
            Self::MatchStop => "match_stop",
            Self::ResetCount => "reset_count",
            Self::SetAutoWinner { .. } => "set_auto_winner",
            Self::SetHubSide { .. } => "set_hub_side",
            Self::Force { .. } => "force",
            Self::FieldSafe { .. } => "field_safe",
            Self::Motor { .. } => "motor",
            Self::Ping { .. } => "ping",
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn outbound_unit_variants_carry_only_type() {
        let value = serde_json::to_value(OutboundMessage::MatchStart).unwrap();
        assert_eq!(value, json!({ "type": "match_start" }));

        let value = serde_json::to_value(OutboundMessage::ResetCount).unwrap();
        assert_eq!(value, json!({ "type": "reset_count" }));
    }

    #[test]
    fn outbound_clear_override_serializes_explicit_null() {
        let value = serde_json::to_value(OutboundMessage::Force { mode: None }).unwrap();
        assert_eq!(value, json!({ "type": "force", "mode": null }));

        let value = serde_json::to_value(OutboundMessage::FieldSafe {
            mode: Some(FieldSafeMode::Purple),
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "field_safe", "mode": "purple" }));
    }

    #[test]
    fn outbound_payload_field_names() {
        let value = serde_json::to_value(OutboundMessage::SetAutoWinner {
            winner: AutoWinnerChoice::Tie,
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "set_auto_winner", "winner": "tie" }));

        let value = serde_json::to_value(OutboundMessage::Force {
            mode: Some(ForceMode::ForceInactive),
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "force", "mode": "force_inactive" }));

        let value = serde_json::to_value(OutboundMessage::SetHubSide {
            alliance: Alliance::Blue,
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "set_hub_side", "alliance": "blue" }));
    }

    #[test]
    fn match_status_tolerates_missing_fields() {
        let status: MatchStatus = serde_json::from_value(json!({ "running": true })).unwrap();
        assert!(status.running);
        assert_eq!(status.period, None);
        assert_eq!(status.hub_side, Alliance::Red);
        assert_eq!(status.force_mode, None);
    }

    #[test]
    fn score_accepts_legacy_sensor_key() {
        let score: ScoreMessage =
            serde_json::from_value(json!({ "count": 3, "sensor": 2, "ts": 1.5 })).unwrap();
        assert_eq!(score.exit, 2);
        assert_eq!(score.timestamp_ms(), 1500);
    }

    #[test]
    fn alliance_opposite() {
        assert_eq!(Alliance::Red.opposite(), Alliance::Blue);
        assert_eq!(Alliance::Blue.opposite(), Alliance::Red);
    }
}
