// ── Message codec ──
//
// One text frame in, one tagged envelope (or nothing) out. Decoding never
// fails loudly: malformed frames are logged at debug and dropped whole.
// Version differences between controller firmware builds are normalized
// here so nothing downstream sees alternate field names.

use serde_json::Value;

use crate::error::Error;
use crate::protocol::{OutboundMessage, ScoreMessage, StatusMessage};

/// Valid hub exit sensor ids.
const SENSOR_EXITS: std::ops::RangeInclusive<u8> = 1..=4;

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Status(StatusMessage),
    Score(ScoreMessage),
    /// A well-formed frame with a `type` this client has no handler for.
    /// Passed through for forward compatibility.
    Unknown { kind: String },
}

impl Envelope {
    pub fn kind(&self) -> &str {
        match self {
            Self::Status(_) => "status",
            Self::Score(_) => "score",
            Self::Unknown { kind } => kind,
        }
    }
}

/// Decode one raw text frame.
///
/// Returns `None` if the frame is not JSON, is not an object, lacks a string
/// `type`, or is a known type whose body does not match its schema.
pub fn decode(text: &str) -> Option<Envelope> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping non-JSON frame");
            return None;
        }
    };

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        tracing::debug!("Dropping frame without a type discriminator");
        return None;
    };

    match kind {
        "status" => decode_status(value).map(Envelope::Status),
        "score" => decode_score(value).map(Envelope::Score),
        other => {
            tracing::trace!(kind = other, "Passing through unhandled frame type");
            Some(Envelope::Unknown {
                kind: other.to_owned(),
            })
        }
    }
}

fn decode_status(mut value: Value) -> Option<StatusMessage> {
    // Older firmware has no separate LED colour; it always tracked the hub side.
    if let Some(m) = value.get_mut("match").and_then(Value::as_object_mut) {
        let missing = m.get("led_alliance").is_none_or(Value::is_null);
        if missing {
            if let Some(side) = m.get("hub_side").cloned() {
                m.insert("led_alliance".into(), side);
            }
        }
    }

    match serde_json::from_value(value) {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed status frame");
            None
        }
    }
}

fn decode_score(value: Value) -> Option<ScoreMessage> {
    let score: ScoreMessage = match serde_json::from_value(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed score frame");
            return None;
        }
    };

    if !SENSOR_EXITS.contains(&score.exit) {
        tracing::debug!(exit = score.exit, "Dropping score frame with unknown sensor exit");
        return None;
    }
    if !score.ts.is_finite() {
        tracing::debug!("Dropping score frame with non-finite timestamp");
        return None;
    }

    Some(score)
}

/// Serialize an outbound command to its wire text.
pub fn encode(message: &OutboundMessage) -> Result<String, Error> {
    Ok(serde_json::to_string(message)?)
}

// ── Tests ────────────────────────────────────────────────────────────
