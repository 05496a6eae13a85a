//! Drive one resource's sync run from feed to local store.
//!
//! Fetch → group by resource → keep future events → merge → for each merged
//! interval, skip it if the store already covers it, otherwise create it.
//!
//! Query and tag errors abort the run. Create errors are recorded against
//! their interval and the run moves on: there is no rollback and no
//! transaction spanning several intervals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::event::{SourceEvent, TimeWindow};
use crate::filter::future_events;
use crate::group::group_by_resource;
use crate::merge::{merge_intervals_with, MergeOptions, MergedInterval};
use crate::resolve::{resolve_existing, MatchPolicy};
use crate::store::{Feed, Store};
use crate::tag::{TagExtractor, DEFAULT_MARKER};

/// Per-run settings for a [`Syncer`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Resource tag whose events are synced, e.g. `"3"` for "Bay 3".
    pub resource: String,
    /// Local store calendar that receives the merged intervals.
    pub calendar_id: String,
    pub extractor: TagExtractor,
    pub merge: MergeOptions,
    pub match_policy: MatchPolicy,
    /// Decide everything but issue no create calls.
    pub dry_run: bool,
}

impl SyncOptions {
    /// Options with the default `Bay` marker and default merge and match
    /// settings.
    pub fn new(resource: impl Into<String>, calendar_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            resource: resource.into(),
            calendar_id: calendar_id.into(),
            extractor: TagExtractor::new(DEFAULT_MARKER)?,
            merge: MergeOptions::default(),
            match_policy: MatchPolicy::default(),
            dry_run: false,
        })
    }
}

/// What happened to one merged interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// An existing event already covers the interval.
    Skipped { existing_label: String },
    Created,
    /// Dry run: the interval would have been created.
    Planned,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalOutcome {
    pub interval: MergedInterval,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Summary of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub resource: String,
    pub window: TimeWindow,
    /// Future events for the resource that went into the merge.
    pub source_events: usize,
    pub outcomes: Vec<IntervalOutcome>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.count(|d| matches!(d, Decision::Created))
    }

    pub fn skipped(&self) -> usize {
        self.count(|d| matches!(d, Decision::Skipped { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|d| matches!(d, Decision::Planned))
    }

    pub fn failed(&self) -> usize {
        self.count(|d| matches!(d, Decision::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&Decision) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.decision)).count()
    }
}

/// Reconciles a feed against a local store for a single resource.
pub struct Syncer<F, S> {
    feed: F,
    store: S,
    options: SyncOptions,
}

impl<F: Feed, S: Store> Syncer<F, S> {
    pub fn new(feed: F, store: S, options: SyncOptions) -> Self {
        Self {
            feed,
            store,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Fetch `window` from the feed and return this resource's events that
    /// start strictly after `now`, in feed order.
    ///
    /// # Errors
    /// Feed errors, and `MalformedLocation` for any fetched event (of any
    /// resource) whose location carries no tag.
    pub fn future_events(&self, now: DateTime<Utc>, window: &TimeWindow) -> Result<Vec<SourceEvent>> {
        let events = self.feed.fetch(window)?;
        let fetched = events.len();
        let mut groups = group_by_resource(events, &self.options.extractor)?;
        let Some(group) = groups.remove(&self.options.resource) else {
            info!(
                resource = %self.options.resource,
                fetched,
                "no events for resource"
            );
            return Ok(Vec::new());
        };
        Ok(future_events(&group, now))
    }

    /// Run one sync pass.
    ///
    /// `now` is the run's reference instant, captured once by the caller;
    /// `window` is the span queried on both sides.
    ///
    /// An empty `window` (run started after the day's last minute) returns an
    /// empty report without touching the feed or the store.
    ///
    /// # Errors
    /// Feed and store query errors and malformed locations abort the run.
    /// Create failures do not; they show up as [`Decision::Failed`].
    pub fn run(&self, now: DateTime<Utc>, window: &TimeWindow) -> Result<SyncReport> {
        let mut report = SyncReport {
            resource: self.options.resource.clone(),
            window: *window,
            source_events: 0,
            outcomes: Vec::new(),
        };

        // Nothing can start inside an empty window, and the feed rejects one.
        if window.is_empty() {
            info!(
                resource = %self.options.resource,
                at = %window.start,
                "sync window is empty, nothing to do"
            );
            return Ok(report);
        }

        let events = self.future_events(now, window)?;
        report.source_events = events.len();

        if events.is_empty() {
            info!(resource = %self.options.resource, "no future events found");
            return Ok(report);
        }

        let merged = merge_intervals_with(&events, self.options.merge);
        info!(
            resource = %self.options.resource,
            events = events.len(),
            intervals = merged.len(),
            "merged future events"
        );

        for interval in merged {
            let decision = self.reconcile(&interval, window)?;
            report.outcomes.push(IntervalOutcome { interval, decision });
        }

        Ok(report)
    }

    fn reconcile(&self, interval: &MergedInterval, window: &TimeWindow) -> Result<Decision> {
        let label = interval.label();
        let existing = resolve_existing(
            &self.store,
            &self.options.calendar_id,
            interval,
            window,
            self.options.match_policy,
        )?;

        if let Some(existing) = existing {
            info!(
                label = %label,
                existing = %existing.label,
                start = %interval.start,
                end = %interval.end,
                "event already exists, skipping"
            );
            return Ok(Decision::Skipped {
                existing_label: existing.label,
            });
        }

        if self.options.dry_run {
            info!(label = %label, start = %interval.start, end = %interval.end, "would create event");
            return Ok(Decision::Planned);
        }

        info!(label = %label, start = %interval.start, end = %interval.end, "creating event");
        match self.store.create(
            &self.options.calendar_id,
            interval.start,
            interval.end,
            &label,
        ) {
            Ok(()) => Ok(Decision::Created),
            Err(err) => {
                warn!(label = %label, error = %err, "create failed, continuing");
                Ok(Decision::Failed {
                    message: err.to_string(),
                })
            }
        }
    }
}
