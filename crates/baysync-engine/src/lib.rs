//! # baysync-engine
//!
//! Interval merge and reconcile engine for syncing bay bookings from a remote
//! calendar feed into a local calendar.
//!
//! Remote events are tagged by the bay named in their location, filtered to
//! those that have not started, and merged so overlapping bookings become a
//! single local event. Each merged interval is created in the local store
//! unless an existing event already contains it.
//!
//! ## Modules
//!
//! - [`tag`] — location text → resource tag
//! - [`group`] — partition events by resource tag
//! - [`filter`] — drop events that already started
//! - [`merge`] — coalesce overlapping events into merged intervals
//! - [`resolve`] — containment check against the local store
//! - [`sync`] — orchestrate a full run and report each decision
//! - [`store`] — the `Feed` and `Store` collaborator traits
//! - [`event`] — event snapshots and time windows
//! - [`error`] — Error types

pub mod error;
pub mod event;
pub mod filter;
pub mod group;
pub mod merge;
pub mod resolve;
pub mod store;
pub mod sync;
pub mod tag;

pub use error::SyncError;
pub use event::{ExistingEvent, SourceEvent, TimeWindow};
pub use filter::future_events;
pub use group::{group_by_resource, ResourceGroups};
pub use merge::{coalesce, merge_intervals, merge_intervals_with, MergeOptions, MergedInterval};
pub use resolve::{covering_event, resolve_existing, MatchPolicy};
pub use store::{Feed, Store};
pub use sync::{Decision, IntervalOutcome, SyncOptions, SyncReport, Syncer};
pub use tag::TagExtractor;
