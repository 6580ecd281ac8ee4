//! `status`: one snapshot of the match.

use std::fmt::Write;

use fieldlink_core::{Alliance, ControllerConfig, DerivedMatchState, FieldController};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(config: ControllerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let timeout = config.timeout;
    let bar = util::spinner(global, "Waiting for controller status");
    let state =
        FieldController::oneshot(config, |c| async move { c.wait_for_status(timeout).await })
            .await;
    util::finish_spinner(bar);
    let state = state?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &state,
        |s| render_detail(s, color),
        plain_line,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Key/value block for the table view.
pub fn render_detail(s: &DerivedMatchState, color: bool) -> String {
    let mut out = String::new();
    let clock = s.clock_text();
    let clock = output::paint_alert(&clock, s.is_urgent(), color);

    let _ = writeln!(out, "Period      {}", s.period.label());
    if s.paused {
        let _ = writeln!(out, "Clock       {clock} (paused)");
    } else {
        let _ = writeln!(out, "Clock       {clock}");
    }
    for (label, alliance) in [("Red hub ", Alliance::Red), ("Blue hub", Alliance::Blue)] {
        let status = s.hub_status(alliance);
        let _ = writeln!(out, "{label}    {}", output::paint_hub(status, alliance, color));
    }
    let _ = writeln!(out, "Balls       {}", s.global_ball_count);
    let _ = writeln!(out, "LEDs        {}", s.led_mode);
    let _ = writeln!(out, "Hub side    {}", s.hub_side);
    let estop = if s.estop_ok { "ok" } else { "ENGAGED" };
    let _ = writeln!(out, "E-stop      {}", output::paint_alert(estop, !s.estop_ok, color));
    let motor = if s.motor.enabled { "enabled" } else { "disabled" };
    let _ = writeln!(out, "Motor       {motor}");
    let _ = write!(
        out,
        "Link        {}",
        output::paint_connection(s.connection_state, color)
    );
    out
}

/// `period seconds red blue balls`, space separated.
pub fn plain_line(s: &DerivedMatchState) -> String {
    format!(
        "{} {} {} {} {}",
        s.period, s.time_remaining, s.red_hub_status, s.blue_hub_status, s.global_ball_count
    )
}
