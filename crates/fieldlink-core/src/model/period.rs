// ── Match periods ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Canonical match period. Always one of these eleven values, whatever the
/// controller sends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Period {
    #[default]
    Disabled,
    Auto,
    AutoGrace,
    Transition,
    Shift1,
    Shift2,
    Shift3,
    Shift4,
    Endgame,
    TeleopGrace,
    Finished,
}

impl Period {
    /// Map the controller's period vocabulary onto the canonical enum.
    ///
    /// Exact matches only. Firmware spells the grace periods in snake case;
    /// the canonical camel-case names are accepted as well. Anything else,
    /// including a missing period, is `Disabled`.
    pub fn from_controller(raw: Option<&str>) -> Self {
        match raw {
            Some("auto") => Self::Auto,
            Some("auto_grace" | "autoGrace") => Self::AutoGrace,
            Some("transition") => Self::Transition,
            Some("shift1") => Self::Shift1,
            Some("shift2") => Self::Shift2,
            Some("shift3") => Self::Shift3,
            Some("shift4") => Self::Shift4,
            Some("endgame") => Self::Endgame,
            Some("teleop_grace" | "teleopGrace" | "post_grace") => Self::TeleopGrace,
            Some("postmatch") => Self::Finished,
            _ => Self::Disabled,
        }
    }

    /// 1-based shift number for the four alternating shifts.
    pub fn shift_index(self) -> Option<u8> {
        match self {
            Self::Shift1 => Some(1),
            Self::Shift2 => Some(2),
            Self::Shift3 => Some(3),
            Self::Shift4 => Some(4),
            _ => None,
        }
    }

    /// Periods in which both hubs score.
    pub fn both_hubs_active(self) -> bool {
        matches!(
            self,
            Self::Auto | Self::AutoGrace | Self::Transition | Self::Endgame | Self::TeleopGrace
        )
    }

    /// Outside a live match: no clock is shown and both hubs are dark.
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Disabled | Self::Finished)
    }

    /// Scoreboard label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disabled => "PREMATCH",
            Self::Auto => "AUTO",
            Self::AutoGrace => "AUTO GRACE",
            Self::Transition => "TRANSITION",
            Self::Shift1 => "SHIFT 1",
            Self::Shift2 => "SHIFT 2",
            Self::Shift3 => "SHIFT 3",
            Self::Shift4 => "SHIFT 4",
            Self::Endgame => "ENDGAME",
            Self::TeleopGrace => "TELEOP GRACE",
            Self::Finished => "POSTMATCH",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn controller_vocabulary() {
        assert_eq!(Period::from_controller(Some("prematch")), Period::Disabled);
        assert_eq!(Period::from_controller(Some("postmatch")), Period::Finished);
        assert_eq!(Period::from_controller(Some("post_grace")), Period::TeleopGrace);
        assert_eq!(Period::from_controller(Some("auto_grace")), Period::AutoGrace);
        assert_eq!(Period::from_controller(Some("shift3")), Period::Shift3);
        assert_eq!(Period::from_controller(Some("endgame")), Period::Endgame);
    }

    #[test]
    fn canonical_names_pass_through() {
        for period in Period::iter() {
            let name = period.to_string();
            let expected = match period {
                // Not part of the controller vocabulary.
                Period::Disabled | Period::Finished => Period::Disabled,
                other => other,
            };
            assert_eq!(Period::from_controller(Some(&name)), expected, "{name}");
        }
    }

    #[test]
    fn unknown_and_missing_fold_to_disabled() {
        for raw in ["", "SHIFT1", "shift5", "field_safe", " auto", "overtime"] {
            assert_eq!(Period::from_controller(Some(raw)), Period::Disabled, "{raw:?}");
        }
        assert_eq!(Period::from_controller(None), Period::Disabled);
    }

    #[test]
    fn eleven_periods() {
        assert_eq!(Period::iter().count(), 11);
    }

    #[test]
    fn serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&Period::TeleopGrace).unwrap(),
            "\"teleopGrace\""
        );
        assert_eq!(Period::AutoGrace.to_string(), "autoGrace");
    }

    #[test]
    fn labels() {
        assert_eq!(Period::Disabled.label(), "PREMATCH");
        assert_eq!(Period::Shift2.label(), "SHIFT 2");
        assert_eq!(Period::Finished.label(), "POSTMATCH");
    }
}
