//! Event snapshots read from the two calendars, and the time window they are
//! read for.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// An event read from the remote booking feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
    /// Free text; must name a resource tag for the event to be grouped.
    pub location: String,
}

impl SourceEvent {
    /// Build a source event, rejecting intervals that end before they start.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self> {
        check_interval(start, end)?;
        Ok(Self {
            start,
            end,
            label: label.into(),
            location: location.into(),
        })
    }
}

/// An event already present in the local store. Only ever compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl ExistingEvent {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: impl Into<String>) -> Result<Self> {
        check_interval(start, end)?;
        Ok(Self {
            start,
            end,
            label: label.into(),
        })
    }
}

/// A closed `[start, end]` span of time used for feed and store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        check_interval(start, end)?;
        Ok(Self { start, end })
    }

    /// The window from `now` until 23:59:00 of the same calendar day in `tz`.
    ///
    /// If `now` is already past 23:59 local time the window is empty
    /// (`end == start`).
    pub fn rest_of_day(now: DateTime<Utc>, tz: Tz) -> Self {
        let local_day = now.with_timezone(&tz).date_naive();
        let end = NaiveTime::from_hms_opt(23, 59, 0)
            .and_then(|t| tz.from_local_datetime(&local_day.and_time(t)).latest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        Self {
            start: now,
            end: end.max(now),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn check_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(SyncError::InvalidInterval { start, end });
    }
    Ok(())
}
