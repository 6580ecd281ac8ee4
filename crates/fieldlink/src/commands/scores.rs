//! `scores`: listen for a while, then print the scoring log.

use chrono::{DateTime, Local};
use tabled::Tabled;

use fieldlink_core::{ControllerConfig, FieldController, ScoringEvent};

use crate::cli::{GlobalOpts, OutputFormat, ScoresArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Exit")]
    exit: u8,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "ID")]
    id: String,
}

impl ScoreRow {
    fn new(e: &ScoringEvent) -> Self {
        Self {
            time: format_timestamp(e.timestamp_ms),
            exit: e.sensor_exit,
            count: e.count_at_event,
            id: e.id.clone(),
        }
    }
}

/// Local wall-clock time of a controller timestamp.
pub fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |t| t.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: ScoresArgs,
    config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let controller = FieldController::new(config);
    let mut log = controller.store().subscribe_scoring_log();
    controller.connect()?;

    let bar = util::spinner(global, "Listening for scoring events");
    let wanted = args.count;
    let collect = async {
        while let Some(events) = log.changed().await {
            if let Some(bar) = &bar {
                bar.set_message(format!("{} scoring events", events.len()));
            }
            if wanted.is_some_and(|n| events.len() >= n) {
                break;
            }
        }
    };
    // Running out the clock is the normal way to stop.
    let _ = tokio::time::timeout(args.duration, collect).await;
    util::finish_spinner(bar);

    let snapshot = controller.store().scoring_log_snapshot();
    controller.disconnect().await;

    let limit = args.count.unwrap_or(usize::MAX);
    let events: Vec<ScoringEvent> = snapshot.iter().take(limit).map(|e| (**e).clone()).collect();

    let out = render_events(global.output, &events)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_events(format: OutputFormat, events: &[ScoringEvent]) -> Result<String, CliError> {
    output::render_list(
        format,
        events,
        ScoreRow::new,
        |e| format!("{} {} {}", e.timestamp_ms, e.sensor_exit, e.count_at_event),
    )
}
