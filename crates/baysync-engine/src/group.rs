//! Partition source events by resource tag.

use std::collections::BTreeMap;

use crate::event::SourceEvent;
use crate::error::Result;
use crate::tag::TagExtractor;

/// Resource tag → events for that resource, in feed order.
pub type ResourceGroups = BTreeMap<String, Vec<SourceEvent>>;

/// Group events by the resource tag in their location.
///
/// Relative order within each group is the order of `events`. Nothing is
/// dropped or deduplicated.
///
/// # Errors
/// Fails on the first event whose location carries no tag. The grouping is
/// abandoned rather than continued with an event that belongs nowhere.
pub fn group_by_resource(
    events: impl IntoIterator<Item = SourceEvent>,
    extractor: &TagExtractor,
) -> Result<ResourceGroups> {
    let mut groups = ResourceGroups::new();
    for event in events {
        let tag = extractor.extract(&event.location)?;
        groups.entry(tag).or_default().push(event);
    }
    Ok(groups)
}
