//! In-memory feed and store used by the resolver and orchestrator tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use chrono::{DateTime, TimeZone, Utc};
use baysync_engine::{ExistingEvent, Feed, SourceEvent, Store, SyncError, TimeWindow};

pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

pub fn source(start: (u32, u32), end: (u32, u32), label: &str, location: &str) -> SourceEvent {
    SourceEvent::new(at(start.0, start.1), at(end.0, end.1), label, location).unwrap()
}

pub fn existing(start: (u32, u32), end: (u32, u32), label: &str) -> ExistingEvent {
    ExistingEvent::new(at(start.0, start.1), at(end.0, end.1), label).unwrap()
}

pub fn day_window() -> TimeWindow {
    TimeWindow::new(at(8, 0), at(23, 59)).unwrap()
}

#[derive(Default)]
pub struct FakeFeed {
    pub events: Vec<SourceEvent>,
    pub fail: bool,
    pub fetches: Cell<usize>,
}

impl FakeFeed {
    pub fn with(events: Vec<SourceEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

impl Feed for FakeFeed {
    fn fetch(&self, _window: &TimeWindow) -> Result<Vec<SourceEvent>, SyncError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail {
            return Err(SyncError::RemoteQuery("feed unreachable".to_string()));
        }
        Ok(self.events.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub calendar_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

/// A store that remembers what it was asked. Successful creates become
/// visible to later queries.
#[derive(Default)]
pub struct FakeStore {
    pub events: RefCell<Vec<ExistingEvent>>,
    pub creates: RefCell<Vec<CreateCall>>,
    pub queries: Cell<usize>,
    pub fail_query: bool,
    pub reject_labels: Vec<String>,
}

impl FakeStore {
    pub fn with(events: Vec<ExistingEvent>) -> Self {
        Self {
            events: RefCell::new(events),
            ..Self::default()
        }
    }

    pub fn created_labels(&self) -> Vec<String> {
        self.creates.borrow().iter().map(|c| c.label.clone()).collect()
    }
}

impl Store for FakeStore {
    fn query(&self, _calendar_id: &str, window: &TimeWindow) -> Result<Vec<ExistingEvent>, SyncError> {
        self.queries.set(self.queries.get() + 1);
        if self.fail_query {
            return Err(SyncError::RemoteQuery("store unreachable".to_string()));
        }
        Ok(self
            .events
            .borrow()
            .iter()
            .filter(|e| e.start <= window.end && e.end >= window.start)
            .cloned()
            .collect())
    }

    fn create(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: &str,
    ) -> Result<(), SyncError> {
        self.creates.borrow_mut().push(CreateCall {
            calendar_id: calendar_id.to_string(),
            start,
            end,
            label: label.to_string(),
        });
        if self.reject_labels.iter().any(|l| l == label) {
            return Err(SyncError::CreateFailure {
                label: label.to_string(),
                message: "HTTP 500".to_string(),
            });
        }
        self.events
            .borrow_mut()
            .push(ExistingEvent::new(start, end, label)?);
        Ok(())
    }
}
