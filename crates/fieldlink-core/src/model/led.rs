// ── Hub lighting ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Alliance;

/// What the hub LEDs are showing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LedMode {
    #[default]
    Off,
    SolidRed,
    SolidBlue,
    PulseRed,
    PulseBlue,
    ChaseRed,
    ChaseBlue,
    FieldSafeGreen,
    PostMatchPurple,
    /// Animation name this client does not know.
    Idle,
}

impl LedMode {
    /// Combine the controller's animation name with the LED colour.
    pub fn from_controller(animation: Option<&str>, color: Alliance) -> Self {
        match (animation, color) {
            (Some("off"), _) => Self::Off,
            (Some("green"), _) => Self::FieldSafeGreen,
            (Some("purple"), _) => Self::PostMatchPurple,
            (Some("solid"), Alliance::Red) => Self::SolidRed,
            (Some("solid"), Alliance::Blue) => Self::SolidBlue,
            (Some("pulse"), Alliance::Red) => Self::PulseRed,
            (Some("pulse"), Alliance::Blue) => Self::PulseBlue,
            (Some("chase"), Alliance::Red) => Self::ChaseRed,
            (Some("chase"), Alliance::Blue) => Self::ChaseBlue,
            _ => Self::Idle,
        }
    }

    /// Alliance colour of a coloured animation.
    pub fn alliance(self) -> Option<Alliance> {
        match self {
            Self::SolidRed | Self::PulseRed | Self::ChaseRed => Some(Alliance::Red),
            Self::SolidBlue | Self::PulseBlue | Self::ChaseBlue => Some(Alliance::Blue),
            _ => None,
        }
    }
}
