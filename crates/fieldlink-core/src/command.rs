// ── Operator commands ──
//
// Fire-and-forget intents. Sending never touches local state: whatever the
// controller does with a command shows up in its next status snapshot.

use std::sync::Arc;

use tracing::debug;

use fieldlink_api::{OutboundMessage, Transport};

use crate::error::CoreError;
use crate::model::{Alliance, AutoWinnerChoice, FieldSafeMode, ForceMode};

/// Every operator action the controller understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    StartMatch,
    PauseMatch,
    ResumeMatch,
    StopMatch,
    /// Zero the controller's ball count.
    ResetCount,
    SetAutoWinner(AutoWinnerChoice),
    SetHubSide(Alliance),
    /// `None` clears the override.
    Force(Option<ForceMode>),
    /// `None` clears the override.
    FieldSafe(Option<FieldSafeMode>),
    /// Motor speed as a fraction, `0.0..=1.0`.
    SetMotor { percent: f64 },
    /// Stop the motor now. Same wire message as `SetMotor { percent: 0.0 }`.
    EmergencyStop,
    Ping,
}

impl Command {
    /// Reject values the controller would not accept.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Self::SetMotor { percent } = *self {
            if !percent.is_finite() || !(0.0..=1.0).contains(&percent) {
                return Err(CoreError::ValidationFailed {
                    message: format!("motor percent must be between 0 and 1, got {percent}"),
                });
            }
        }
        Ok(())
    }

    /// Validate and build the wire message. `Ping` is stamped with the
    /// current time.
    pub fn to_wire(&self) -> Result<OutboundMessage, CoreError> {
        self.to_wire_at(chrono::Utc::now().timestamp_millis())
    }

    fn to_wire_at(&self, now_ms: i64) -> Result<OutboundMessage, CoreError> {
        self.validate()?;
        Ok(match *self {
            Self::StartMatch => OutboundMessage::MatchStart,
            Self::PauseMatch => OutboundMessage::MatchPause,
            Self::ResumeMatch => OutboundMessage::MatchResume,
            Self::StopMatch => OutboundMessage::MatchStop,
            Self::ResetCount => OutboundMessage::ResetCount,
            Self::SetAutoWinner(winner) => OutboundMessage::SetAutoWinner { winner },
            Self::SetHubSide(alliance) => OutboundMessage::SetHubSide { alliance },
            Self::Force(mode) => OutboundMessage::Force { mode },
            Self::FieldSafe(mode) => OutboundMessage::FieldSafe { mode },
            Self::SetMotor { percent } => OutboundMessage::Motor { percent },
            Self::EmergencyStop => OutboundMessage::Motor { percent: 0.0 },
            Self::Ping => OutboundMessage::Ping { ts: now_ms },
        })
    }
}

/// Cloneable handle for issuing commands. Never blocks.
#[derive(Clone)]
pub struct CommandSender {
    transport: Arc<Transport>,
}

impl CommandSender {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Hand a command to the transport.
    ///
    /// Delivered now if connected, otherwise queued in order and flushed on
    /// reconnect. Errors only on invalid input or after teardown.
    pub fn send(&self, command: Command) -> Result<(), CoreError> {
        let message = command.to_wire()?;
        debug!(kind = message.kind(), "sending command");
        self.transport.send(message)?;
        Ok(())
    }
}
