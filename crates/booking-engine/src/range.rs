//! Half-open time ranges.
//!
//! A [`TimeRange`] occupies `[start, end)`: it includes its start instant and
//! excludes its end instant, so two bookings that touch at a boundary never
//! overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A half-open interval `[start, end)` in UTC.
///
/// Fields are public so ranges can be deserialized from caller payloads;
/// operations that require a well-formed range call [`TimeRange::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(EngineError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Two ranges overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent ranges (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains_range(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Intersect with `window`, or `None` when nothing of `self` lies inside it.
    pub fn clamp_to(&self, window: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        (start < end).then_some(TimeRange { start, end })
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
