//! Interfaces to the two calendars the engine reconciles.
//!
//! Both are remote services reached with blocking calls. The engine assumes no
//! transactions, no locking and no retries on their side.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::{ExistingEvent, SourceEvent, TimeWindow};

/// The remote booking feed events are read from.
pub trait Feed {
    /// Fetch every event in `window`, ordered by start time.
    ///
    /// # Errors
    /// `SyncError::RemoteQuery` when the feed is unreachable or its answer
    /// cannot be decoded.
    fn fetch(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>>;
}

/// The local calendar merged intervals are written to.
pub trait Store {
    /// Fetch the events of `calendar_id` that fall within `window`.
    ///
    /// # Errors
    /// `SyncError::RemoteQuery` when the store is unreachable or its answer
    /// cannot be decoded.
    fn query(&self, calendar_id: &str, window: &TimeWindow) -> Result<Vec<ExistingEvent>>;

    /// Create one event in `calendar_id`.
    ///
    /// # Errors
    /// `SyncError::CreateFailure` when the store does not accept the event.
    fn create(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: &str,
    ) -> Result<()>;
}

impl<T: Feed + ?Sized> Feed for &T {
    fn fetch(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>> {
        (**self).fetch(window)
    }
}

impl<T: Store + ?Sized> Store for &T {
    fn query(&self, calendar_id: &str, window: &TimeWindow) -> Result<Vec<ExistingEvent>> {
        (**self).query(calendar_id, window)
    }

    fn create(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: &str,
    ) -> Result<()> {
        (**self).create(calendar_id, start, end, label)
    }
}
