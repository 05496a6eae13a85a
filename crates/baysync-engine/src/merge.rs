//! Coalesce overlapping or touching events into merged intervals.
//!
//! Input is stable-sorted by start time, then swept once with a running
//! window seeded from the first event:
//!
//! - an event starting no later than the window end (plus any configured gap
//!   tolerance) extends the window to `max(window.end, event.end)` and
//!   appends its label;
//! - an event starting after that closes the window and seeds the next one.
//!
//! Because of the sort, no event can start before the current window. An event
//! starting exactly at the window start joins the window like any other
//! overlapping event. The final window is always emitted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::SourceEvent;

/// Separator placed between contributing labels when rendering.
pub const LABEL_SEPARATOR: &str = ",";

/// A minimal span covering one or more overlapping source events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Labels of every contributing event, in chronological order.
    pub labels: Vec<String>,
}

impl MergedInterval {
    /// The label sent to the local store: contributing labels joined by `,`.
    pub fn label(&self) -> String {
        self.labels.join(LABEL_SEPARATOR)
    }

    /// Whether `[start, end]` lies entirely inside this interval.
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && end <= self.end
    }
}

impl From<&SourceEvent> for MergedInterval {
    fn from(event: &SourceEvent) -> Self {
        Self {
            start: event.start,
            end: event.end,
            labels: vec![event.label.clone()],
        }
    }
}

/// Tuning for the merge sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// An event starting at most this long after the window end still joins
    /// the window. Zero means only overlapping or touching events merge.
    pub gap_tolerance: Duration,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            gap_tolerance: Duration::zero(),
        }
    }
}

/// Merge source events with the default options.
pub fn merge_intervals(events: &[SourceEvent]) -> Vec<MergedInterval> {
    merge_intervals_with(events, MergeOptions::default())
}

/// Merge source events into pairwise non-overlapping intervals.
///
/// Returns an empty list for empty input, and one interval per event when no
/// two events overlap or touch.
pub fn merge_intervals_with(events: &[SourceEvent], options: MergeOptions) -> Vec<MergedInterval> {
    coalesce(events.iter().map(MergedInterval::from).collect(), options)
}

/// Run the merge sweep over already-built intervals.
///
/// Coalescing the output of a previous merge with the same options returns it
/// unchanged.
pub fn coalesce(mut intervals: Vec<MergedInterval>, options: MergeOptions) -> Vec<MergedInterval> {
    // Stable: equal starts keep their feed order, and so their label order.
    intervals.sort_by_key(|i| i.start);

    let mut iter = intervals.into_iter();
    let Some(mut window) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        if next.start <= window.end + options.gap_tolerance {
            window.end = window.end.max(next.end);
            window.labels.extend(next.labels);
        } else {
            debug!(
                start = %window.start,
                end = %window.end,
                label = %window.label(),
                "closing merged interval"
            );
            merged.push(std::mem::replace(&mut window, next));
        }
    }

    debug!(
        start = %window.start,
        end = %window.end,
        label = %window.label(),
        "closing final merged interval"
    );
    merged.push(window);
    merged
}
