//! Decide whether a merged interval is already booked in the local store.
//!
//! Only full containment counts: an existing event must start no later and end
//! no earlier than the merged interval. Partial overlaps, and coverage stitched
//! together from several existing events, do not.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{ExistingEvent, TimeWindow};
use crate::merge::MergedInterval;
use crate::store::Store;

/// What an existing event must satisfy to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The existing event's span contains the merged interval.
    #[default]
    Containment,
    /// Containment, and the existing label equals the rendered merged label.
    ContainmentAndLabel,
}

/// Return the first existing event that covers `interval` under `policy`.
pub fn covering_event<'a>(
    existing: &'a [ExistingEvent],
    interval: &MergedInterval,
    policy: MatchPolicy,
) -> Option<&'a ExistingEvent> {
    let label = match policy {
        MatchPolicy::Containment => None,
        MatchPolicy::ContainmentAndLabel => Some(interval.label()),
    };

    existing.iter().find(|event| {
        event.start <= interval.start
            && event.end >= interval.end
            && label.as_deref().is_none_or(|l| event.label == l)
    })
}

/// Query `store` over `window` and look for an event covering `interval`.
///
/// Never writes to the store.
///
/// # Errors
/// Propagates the store's query error. A failed query is not the same as
/// "not found" and must not lead to a create.
pub fn resolve_existing<S: Store + ?Sized>(
    store: &S,
    calendar_id: &str,
    interval: &MergedInterval,
    window: &TimeWindow,
    policy: MatchPolicy,
) -> Result<Option<ExistingEvent>> {
    let existing = store.query(calendar_id, window)?;
    Ok(covering_event(&existing, interval, policy).cloned())
}
