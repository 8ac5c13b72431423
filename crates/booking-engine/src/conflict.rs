//! Detect bookings that overlap a candidate range.
//!
//! Only blocking bookings (not rejected, not cancelled) are considered.
//! Adjacent bookings (where one ends exactly when the candidate starts, or
//! starts exactly when it ends) are NOT conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingRecord, BookingStatus};
use crate::config::MalformedPolicy;
use crate::error::Result;
use crate::range::TimeRange;

/// A booking that overlaps the candidate range, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingBooking {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub purpose: String,
}

impl ConflictingBooking {
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }
}

impl From<&BookingRecord> for ConflictingBooking {
    fn from(b: &BookingRecord) -> Self {
        Self {
            id: b.id,
            start: b.start,
            end: b.end,
            status: b.status,
            purpose: b.purpose.clone(),
        }
    }
}

/// Blocking bookings paired with their validated ranges.
///
/// Callers are expected to have filtered to active statuses already; the
/// status check here is repeated regardless. Records with `end <= start` are
/// skipped with a warning or rejected, depending on `policy`.
pub(crate) fn blocking_ranges(
    bookings: &[BookingRecord],
    policy: MalformedPolicy,
) -> Result<Vec<(&BookingRecord, TimeRange)>> {
    let mut out = Vec::with_capacity(bookings.len());
    for booking in bookings.iter().filter(|b| b.is_blocking()) {
        match booking.range() {
            Ok(range) => out.push((booking, range)),
            Err(e) => match policy {
                MalformedPolicy::Skip => {
                    tracing::warn!(booking_id = booking.id, "skipping malformed booking: {}", e);
                }
                MalformedPolicy::Reject => return Err(e),
            },
        }
    }
    Ok(out)
}

/// Find all blocking bookings overlapping `candidate`.
///
/// The result is sorted by start ascending, ties broken by booking id, so the
/// order depends only on the input set.
pub fn find_conflicts(
    candidate: &TimeRange,
    bookings: &[BookingRecord],
    policy: MalformedPolicy,
) -> Result<Vec<ConflictingBooking>> {
    candidate.validate()?;

    let mut conflicts: Vec<ConflictingBooking> = blocking_ranges(bookings, policy)?
        .into_iter()
        .filter(|(_, range)| range.overlaps(candidate))
        .map(|(booking, _)| ConflictingBooking::from(booking))
        .collect();

    conflicts.sort_by_key(|c| (c.start, c.id));
    Ok(conflicts)
}

/// True iff any blocking booking's range contains `instant`
/// (`start <= instant < end`).
///
/// Malformed records never contain an instant, so they are ignored here.
pub fn is_occupied_at(instant: DateTime<Utc>, bookings: &[BookingRecord]) -> bool {
    bookings
        .iter()
        .filter(|b| b.is_blocking())
        .any(|b| b.start <= instant && instant < b.end)
}
