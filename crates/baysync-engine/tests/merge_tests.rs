//! Tests for the interval merger.

use chrono::{DateTime, Duration, TimeZone, Utc};
use baysync_engine::{coalesce, merge_intervals, merge_intervals_with, MergeOptions, SourceEvent};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn event(start: (u32, u32), end: (u32, u32), label: &str) -> SourceEvent {
    SourceEvent::new(at(start.0, start.1), at(end.0, end.1), label, "Bay 1").unwrap()
}

// ── Reference scenario ──────────────────────────────────────────────────────

#[test]
fn overlapping_pair_merges_and_gap_splits() {
    // [09:00-09:30 A] [09:20-10:00 B] [11:00-11:30 C]
    // → [09:00-10:00 "A,B"] [11:00-11:30 "C"]
    let events = vec![
        event((9, 0), (9, 30), "A"),
        event((9, 20), (10, 0), "B"),
        event((11, 0), (11, 30), "C"),
    ];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].start, at(9, 0));
    assert_eq!(merged[0].end, at(10, 0));
    assert_eq!(merged[0].label(), "A,B");
    assert_eq!(merged[1].start, at(11, 0));
    assert_eq!(merged[1].end, at(11, 30));
    assert_eq!(merged[1].label(), "C");
}

// ── Basic shapes ────────────────────────────────────────────────────────────

#[test]
fn empty_input_produces_nothing() {
    assert!(merge_intervals(&[]).is_empty());
}

#[test]
fn single_event_is_emitted() {
    let merged = merge_intervals(&[event((9, 0), (10, 0), "solo")]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, at(9, 0));
    assert_eq!(merged[0].end, at(10, 0));
    assert_eq!(merged[0].labels, vec!["solo".to_string()]);
}

#[test]
fn disjoint_events_pass_through() {
    let events = vec![
        event((9, 0), (9, 30), "A"),
        event((10, 0), (10, 30), "B"),
        event((11, 0), (11, 30), "C"),
    ];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 3);
    for (m, e) in merged.iter().zip(&events) {
        assert_eq!(m.start, e.start);
        assert_eq!(m.end, e.end);
        assert_eq!(m.label(), e.label);
    }
}

#[test]
fn touching_events_merge() {
    // B starts exactly when A ends.
    let events = vec![event((9, 0), (10, 0), "A"), event((10, 0), (11, 0), "B")];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].end, at(11, 0));
    assert_eq!(merged[0].label(), "A,B");
}

#[test]
fn contained_event_does_not_shrink_window() {
    // B lies entirely inside A; the window keeps A's end.
    let events = vec![event((9, 0), (12, 0), "A"), event((10, 0), (11, 0), "B")];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, at(9, 0));
    assert_eq!(merged[0].end, at(12, 0));
    assert_eq!(merged[0].label(), "A,B");
}

#[test]
fn chain_of_overlaps_collapses_into_one() {
    let events = vec![
        event((9, 0), (9, 45), "A"),
        event((9, 30), (10, 15), "B"),
        event((10, 0), (10, 45), "C"),
        event((10, 45), (11, 0), "D"),
    ];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, at(9, 0));
    assert_eq!(merged[0].end, at(11, 0));
    assert_eq!(merged[0].label(), "A,B,C,D");
}

// ── Ordering edge cases ─────────────────────────────────────────────────────

#[test]
fn event_with_same_start_as_window_joins_it() {
    // Both start at 09:00. The later one in feed order is appended, and the
    // longer end wins.
    let events = vec![event((9, 0), (9, 30), "A"), event((9, 0), (10, 0), "B")];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].end, at(10, 0));
    assert_eq!(merged[0].label(), "A,B");
}

#[test]
fn unsorted_input_is_sorted_before_merging() {
    let events = vec![
        event((11, 0), (11, 30), "C"),
        event((9, 20), (10, 0), "B"),
        event((9, 0), (9, 30), "A"),
    ];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].label(), "A,B");
    assert_eq!(merged[1].label(), "C");
}

#[test]
fn equal_starts_keep_feed_order_in_labels() {
    let events = vec![
        event((9, 0), (9, 30), "second-in-time-but-first-in-feed"),
        event((8, 0), (8, 30), "early"),
        event((9, 0), (9, 15), "tie"),
    ];

    let merged = merge_intervals(&events);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].label(), "early");
    assert_eq!(merged[1].label(), "second-in-time-but-first-in-feed,tie");
}

// ── Options ─────────────────────────────────────────────────────────────────

#[test]
fn gap_tolerance_bridges_short_gaps() {
    let events = vec![event((9, 0), (10, 0), "A"), event((10, 5), (11, 0), "B")];
    let options = MergeOptions {
        gap_tolerance: Duration::minutes(5),
    };

    let merged = merge_intervals_with(&events, options);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, at(9, 0));
    assert_eq!(merged[0].end, at(11, 0));
}

#[test]
fn gap_longer_than_tolerance_still_splits() {
    let events = vec![event((9, 0), (10, 0), "A"), event((10, 6), (11, 0), "B")];
    let options = MergeOptions {
        gap_tolerance: Duration::minutes(5),
    };

    assert_eq!(merge_intervals_with(&events, options).len(), 2);
}

#[test]
fn default_options_do_not_bridge_gaps() {
    let events = vec![event((9, 0), (10, 0), "A"), event((10, 1), (11, 0), "B")];
    assert_eq!(merge_intervals(&events).len(), 2);
}

// ── Idempotence ─────────────────────────────────────────────────────────────

#[test]
fn coalescing_merged_output_is_a_no_op() {
    let events = vec![
        event((9, 0), (9, 30), "A"),
        event((9, 20), (10, 0), "B"),
        event((11, 0), (11, 30), "C"),
    ];
    let merged = merge_intervals(&events);

    let again = coalesce(merged.clone(), MergeOptions::default());

    assert_eq!(again, merged);
}
