//! `watch`: stream state changes until Ctrl-C or `--for` elapses.

use std::sync::Arc;

use chrono::Local;
use tokio_stream::StreamExt;

use fieldlink_core::{Alliance, ControllerConfig, DerivedMatchState, FieldController, ScoringEvent};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{scores, status};

pub async fn handle(
    args: WatchArgs,
    config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let controller = FieldController::new(config);
    // Yields the current state first, then every change.
    let mut states = controller.subscribe().into_stream();
    let mut log = controller.store().subscribe_scoring_log();
    controller.connect()?;

    let color = output::should_color(global.color);
    let deadline = async {
        match args.duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_seen = log.current().first().map(|e| e.id.clone());

    loop {
        tokio::select! {
            () = &mut deadline => break,
            res = &mut ctrl_c => {
                res?;
                break;
            }
            state = states.next() => {
                let Some(state) = state else { break };
                emit_state(&state, global, color)?;
            }
            events = log.changed(), if args.scores => {
                let Some(events) = events else { break };
                let fresh = unseen(&events, last_seen.as_deref());
                for event in fresh.iter().rev() {
                    emit_score(event, global)?;
                }
                last_seen = events.first().map(|e| e.id.clone());
            }
        }
    }

    controller.disconnect().await;
    Ok(())
}

/// Events newer than `last_seen`, newest first.
fn unseen<'a>(events: &'a [Arc<ScoringEvent>], last_seen: Option<&str>) -> &'a [Arc<ScoringEvent>] {
    let end = events
        .iter()
        .position(|e| Some(e.id.as_str()) == last_seen)
        .unwrap_or(events.len());
    events.get(..end).unwrap_or_default()
}

fn emit_state(state: &DerivedMatchState, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let out = match global.output {
        OutputFormat::Table => state_line(state, color),
        OutputFormat::Plain => status::plain_line(state),
        // One document per line for structured streams.
        _ => output::render_single(OutputFormat::JsonCompact, state, |_| String::new(), |_| {
            String::new()
        })?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn emit_score(event: &ScoringEvent, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => format!(
            "{}  ball #{} at exit {}",
            scores::format_timestamp(event.timestamp_ms),
            event.count_at_event,
            event.sensor_exit
        ),
        _ => output::render_single(OutputFormat::JsonCompact, event, |_| String::new(), |_| {
            String::new()
        })?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One line per change for the interactive view.
fn state_line(s: &DerivedMatchState, color: bool) -> String {
    let paused = if s.paused { " (paused)" } else { "" };
    format!(
        "{}  {:<12} {:>5}{paused}  red {:<8} blue {:<8} balls {:<4} {}",
        Local::now().format("%H:%M:%S"),
        s.period.label(),
        output::paint_alert(&s.clock_text(), s.is_urgent(), color),
        output::paint_hub(s.hub_status(Alliance::Red), Alliance::Red, color),
        output::paint_hub(s.hub_status(Alliance::Blue), Alliance::Blue, color),
        s.global_ball_count,
        output::paint_connection(s.connection_state, color),
    )
}
