//! Compute free time slots from busy intervals.
//!
//! Sorts busy intervals by start time, optionally merges overlapping periods,
//! then computes the gaps within a given window. Gaps of zero length are never
//! reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::range::TimeRange;

/// How gaps between busy intervals are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Merge overlapping, nested and touching busy intervals before taking
    /// gaps. Free slots never overlap a busy interval.
    #[default]
    Merged,
    /// Compare each busy interval only with the next one by start time.
    ///
    /// Over-reports when one booking is nested inside another: with
    /// `[08:00, 12:00)` and `[09:00, 10:00)` in a `[08:00, 13:00)` window this
    /// reports `[10:00, 13:00)` as free.
    AdjacentPairs,
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of ranges.
pub fn merge_busy_periods(busy: &[TimeRange], window: &TimeRange) -> Vec<TimeRange> {
    // Collect periods clipped to the window, discarding those entirely outside.
    let mut intervals: Vec<TimeRange> = busy.iter().filter_map(|b| b.clamp_to(window)).collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange> = Vec::new();
    for range in intervals {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Find free slots within `window` that are not covered by `busy`.
///
/// `busy` may be in any order and may extend beyond the window. Returns slots
/// sorted by start time; when nothing in `busy` overlaps the window the
/// window itself is the only slot.
pub fn find_free_slots(busy: &[TimeRange], window: &TimeRange, policy: GapPolicy) -> Vec<TimeRange> {
    match policy {
        GapPolicy::Merged => merged_gaps(busy, window),
        GapPolicy::AdjacentPairs => adjacent_pair_gaps(busy, window),
    }
}

/// Find the first free slot of at least `min_duration_minutes` within the window.
///
/// Delegates to [`find_free_slots`] and returns the first slot meeting the minimum
/// duration requirement.
pub fn find_first_free_slot(
    busy: &[TimeRange],
    window: &TimeRange,
    policy: GapPolicy,
    min_duration_minutes: i64,
) -> Option<TimeRange> {
    find_free_slots(busy, window, policy)
        .into_iter()
        .find(|slot| slot.duration_minutes() >= min_duration_minutes)
}

fn merged_gaps(busy: &[TimeRange], window: &TimeRange) -> Vec<TimeRange> {
    let merged = merge_busy_periods(busy, window);

    let mut free = Vec::new();
    let mut cursor = window.start;

    for period in &merged {
        push_gap(&mut free, cursor, period.start);
        cursor = cursor.max(period.end);
    }

    // Trailing free slot after the last busy period.
    push_gap(&mut free, cursor, window.end);

    free
}

fn adjacent_pair_gaps(busy: &[TimeRange], window: &TimeRange) -> Vec<TimeRange> {
    let mut sorted: Vec<TimeRange> = busy.iter().filter(|b| b.overlaps(window)).copied().collect();
    // Stable sort: equal starts keep the caller's order (conflicts arrive
    // already ordered by start, then booking id).
    sorted.sort_by_key(|r| r.start);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return vec![*window];
    };

    let mut free = Vec::new();

    if first.start > window.start {
        push_gap(&mut free, window.start, first.start);
    }

    for pair in sorted.windows(2) {
        if pair[0].end < pair[1].start {
            push_gap(&mut free, pair[0].end, pair[1].start);
        }
    }

    if last.end < window.end {
        push_gap(&mut free, last.end, window.end);
    }

    free
}

fn push_gap(free: &mut Vec<TimeRange>, start: DateTime<Utc>, end: DateTime<Utc>) {
    if start < end {
        free.push(TimeRange { start, end });
    }
}
