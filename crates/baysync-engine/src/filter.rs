//! Keep only events that have not started yet.

use chrono::{DateTime, Utc};

use crate::event::SourceEvent;

/// Retain events whose start is strictly after `now`, preserving order.
///
/// An event starting exactly at `now` has already begun and is dropped.
pub fn future_events(events: &[SourceEvent], now: DateTime<Utc>) -> Vec<SourceEvent> {
    events.iter().filter(|e| e.start > now).cloned().collect()
}
