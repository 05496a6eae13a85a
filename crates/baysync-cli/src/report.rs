//! Human-readable rendering of a sync report.

use baysync_engine::{Decision, SyncReport};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Render one line per merged interval plus a summary, with times shown in `tz`.
pub fn render_text(report: &SyncReport, tz: Tz) -> String {
    let mut lines = vec![format!(
        "bay {}: {} future event(s), {} merged interval(s), window {} - {}",
        report.resource,
        report.source_events,
        report.outcomes.len(),
        local(report.window.start, tz, "%Y-%m-%d %H:%M"),
        local(report.window.end, tz, "%H:%M"),
    )];

    for outcome in &report.outcomes {
        let span = format!(
            "{}-{}",
            local(outcome.interval.start, tz, "%H:%M"),
            local(outcome.interval.end, tz, "%H:%M")
        );
        let label = outcome.interval.label();
        lines.push(match &outcome.decision {
            Decision::Skipped { existing_label } => {
                format!("  skipped  {span}  {label}  (covered by \"{existing_label}\")")
            }
            Decision::Created => format!("  created  {span}  {label}"),
            Decision::Planned => format!("  planned  {span}  {label}"),
            Decision::Failed { message } => format!("  FAILED   {span}  {label}  ({message})"),
        });
    }

    lines.push(format!(
        "{} created, {} skipped, {} planned, {} failed",
        report.created(),
        report.skipped(),
        report.planned(),
        report.failed()
    ));
    lines.join("\n")
}

fn local(instant: DateTime<Utc>, tz: Tz, fmt: &str) -> String {
    instant.with_timezone(&tz).format(fmt).to_string()
}
