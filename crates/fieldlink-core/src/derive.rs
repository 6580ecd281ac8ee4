// ── Derivation rules ──
//
// Pure functions from a controller snapshot to the canonical view. These
// mirror the rules the controller itself runs, so both hubs can be shown
// even though the controller only reports on its own side.

use crate::model::{Alliance, HubStatus, HubStatuses, LedMode, Period, RemoteStatusSnapshot};

/// Seconds before a shift boundary at which a hub that is about to go
/// inactive starts warning.
pub const WARNING_LEAD_SECS: f64 = 3.0;

/// Alliance active in shifts 1..=4 when red won auto. A blue win mirrors it.
const ACTIVE_WHEN_RED_WON_AUTO: [Alliance; 4] =
    [Alliance::Blue, Alliance::Red, Alliance::Blue, Alliance::Red];

/// Alliance whose hub is active in `shift` (1-based). `None` outside 1..=4.
pub fn active_alliance_for_shift(auto_winner: Alliance, shift: u8) -> Option<Alliance> {
    let index = usize::from(shift.checked_sub(1)?);
    let active = *ACTIVE_WHEN_RED_WON_AUTO.get(index)?;
    Some(match auto_winner {
        Alliance::Red => active,
        Alliance::Blue => active.opposite(),
    })
}

/// Red and blue hub status for a snapshot. First matching rule wins.
pub fn hub_statuses(snapshot: &RemoteStatusSnapshot) -> HubStatuses {
    use fieldlink_api::ForceMode;

    let period = Period::from_controller(snapshot.period.as_deref());

    if snapshot.field_safe.is_some() {
        return HubStatuses::both(HubStatus::Active);
    }
    match snapshot.force_mode {
        Some(ForceMode::ForceActive) => return HubStatuses::both(HubStatus::Active),
        Some(ForceMode::ForceInactive) => return HubStatuses::both(HubStatus::Inactive),
        None => {}
    }
    if !snapshot.running || period.is_idle() {
        return HubStatuses::both(HubStatus::Inactive);
    }
    if period.both_hubs_active() {
        return HubStatuses::both(HubStatus::Active);
    }

    let Some(shift) = period.shift_index() else {
        return HubStatuses::both(HubStatus::Inactive);
    };
    let winner = snapshot.auto_winner.unwrap_or_default();
    let Some(active) = active_alliance_for_shift(winner, shift) else {
        return HubStatuses::both(HubStatus::Inactive);
    };

    let mut hubs = HubStatuses::only(active);
    let near_boundary = snapshot
        .time_left_in_period
        .is_some_and(|t| t <= WARNING_LEAD_SECS);
    // After shift 4 comes the endgame with both hubs live (`None`), which
    // still changes who is active.
    if near_boundary && active_alliance_for_shift(winner, shift + 1) != Some(active) {
        *hubs.get_mut(active) = HubStatus::Warning;
    }
    hubs
}

/// Canonical LED mode for a snapshot.
pub fn led_mode(snapshot: &RemoteStatusSnapshot) -> LedMode {
    LedMode::from_controller(snapshot.led_mode.as_deref(), snapshot.led_alliance)
}

/// Whole seconds left in the match: `ceil(max(0, t))`, missing or
/// non-finite counting as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
pub fn time_remaining(match_time_left: Option<f64>) -> u32 {
    let secs = match_time_left
        .filter(|t| t.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
        .ceil();
    secs.min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldlink_api::{FieldSafeMode, ForceMode};
    use pretty_assertions::assert_eq;

    fn in_shift(period: &str, winner: Option<Alliance>, left: Option<f64>) -> RemoteStatusSnapshot {
        RemoteStatusSnapshot {
            running: true,
            period: Some(period.into()),
            auto_winner: winner,
            time_left_in_period: left,
            estop_ok: true,
            ..RemoteStatusSnapshot::default()
        }
    }

    fn hubs(red: HubStatus, blue: HubStatus) -> HubStatuses {
        HubStatuses { red, blue }
    }

    #[test]
    fn shift_table_for_red_winner() {
        let red = Alliance::Red;
        assert_eq!(active_alliance_for_shift(red, 1), Some(Alliance::Blue));
        assert_eq!(active_alliance_for_shift(red, 2), Some(Alliance::Red));
        assert_eq!(active_alliance_for_shift(red, 3), Some(Alliance::Blue));
        assert_eq!(active_alliance_for_shift(red, 4), Some(Alliance::Red));
        assert_eq!(active_alliance_for_shift(red, 0), None);
        assert_eq!(active_alliance_for_shift(red, 5), None);
    }

    #[test]
    fn shift_table_mirrors_for_blue_winner() {
        for shift in 1..=4 {
            assert_eq!(
                active_alliance_for_shift(Alliance::Blue, shift),
                active_alliance_for_shift(Alliance::Red, shift).map(Alliance::opposite)
            );
        }
    }

    #[test]
    fn shift_rotation() {
        let w = Some(Alliance::Red);
        let (active, inactive) = (HubStatus::Active, HubStatus::Inactive);
        assert_eq!(hub_statuses(&in_shift("shift1", w, Some(30.0))), hubs(inactive, active));
        assert_eq!(hub_statuses(&in_shift("shift2", w, Some(30.0))), hubs(active, inactive));
        assert_eq!(hub_statuses(&in_shift("shift3", w, Some(30.0))), hubs(inactive, active));
        assert_eq!(hub_statuses(&in_shift("shift4", w, Some(30.0))), hubs(active, inactive));
    }

    #[test]
    fn missing_winner_defaults_to_red() {
        assert_eq!(
            hub_statuses(&in_shift("shift1", None, None)),
            hubs(HubStatus::Inactive, HubStatus::Active)
        );
    }

    #[test]
    fn warning_edge() {
        let w = Some(Alliance::Red);
        assert_eq!(
            hub_statuses(&in_shift("shift1", w, Some(2.0))),
            hubs(HubStatus::Inactive, HubStatus::Warning)
        );
        assert_eq!(
            hub_statuses(&in_shift("shift1", w, Some(3.0))),
            hubs(HubStatus::Inactive, HubStatus::Warning)
        );
        assert_eq!(
            hub_statuses(&in_shift("shift1", w, Some(4.0))),
            hubs(HubStatus::Inactive, HubStatus::Active)
        );
    }

    #[test]
    fn no_warning_without_period_clock() {
        assert_eq!(
            hub_statuses(&in_shift("shift2", Some(Alliance::Blue), None)),
            hubs(HubStatus::Inactive, HubStatus::Active)
        );
    }

    #[test]
    fn last_shift_warns_before_endgame() {
        assert_eq!(
            hub_statuses(&in_shift("shift4", Some(Alliance::Blue), Some(1.0))),
            hubs(HubStatus::Inactive, HubStatus::Warning)
        );
    }

    #[test]
    fn field_safe_dominates_everything() {
        let mut snap = in_shift("shift2", Some(Alliance::Red), Some(1.0));
        snap.field_safe = Some(FieldSafeMode::Purple);
        snap.force_mode = Some(ForceMode::ForceInactive);
        assert_eq!(hub_statuses(&snap), HubStatuses::both(HubStatus::Active));

        snap.running = false;
        snap.period = Some("postmatch".into());
        assert_eq!(hub_statuses(&snap), HubStatuses::both(HubStatus::Active));
    }

    #[test]
    fn force_beats_period_rules() {
        let mut snap = in_shift("prematch", None, None);
        snap.running = false;
        snap.force_mode = Some(ForceMode::ForceActive);
        assert_eq!(hub_statuses(&snap), HubStatuses::both(HubStatus::Active));

        let mut snap = in_shift("auto", None, None);
        snap.force_mode = Some(ForceMode::ForceInactive);
        assert_eq!(hub_statuses(&snap), HubStatuses::both(HubStatus::Inactive));
    }

    #[test]
    fn not_running_is_dark() {
        let mut snap = in_shift("auto", None, None);
        snap.running = false;
        assert_eq!(hub_statuses(&snap), HubStatuses::both(HubStatus::Inactive));

        assert_eq!(
            hub_statuses(&in_shift("postmatch", None, None)),
            HubStatuses::both(HubStatus::Inactive)
        );
        assert_eq!(
            hub_statuses(&in_shift("bogus", None, None)),
            HubStatuses::both(HubStatus::Inactive)
        );
    }

    #[test]
    fn shared_periods_light_both() {
        for period in ["auto", "auto_grace", "transition", "endgame", "teleop_grace", "post_grace"] {
            assert_eq!(
                hub_statuses(&in_shift(period, None, Some(1.0))),
                HubStatuses::both(HubStatus::Active),
                "{period}"
            );
        }
    }

    #[test]
    fn time_remaining_rounds_up_and_clamps() {
        assert_eq!(time_remaining(Some(39.2)), 40);
        assert_eq!(time_remaining(Some(40.0)), 40);
        assert_eq!(time_remaining(Some(0.01)), 1);
        assert_eq!(time_remaining(Some(-5.0)), 0);
        assert_eq!(time_remaining(None), 0);
        assert_eq!(time_remaining(Some(f64::NAN)), 0);
    }

    #[test]
    fn led_follows_led_alliance() {
        let snap = RemoteStatusSnapshot {
            led_mode: Some("pulse".into()),
            led_alliance: Alliance::Blue,
            ..RemoteStatusSnapshot::default()
        };
        assert_eq!(led_mode(&snap), LedMode::PulseBlue);
    }
}
