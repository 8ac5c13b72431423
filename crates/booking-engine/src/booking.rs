//! Booking records as supplied by the storage layer, and the status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::range::TimeRange;

/// Lifecycle status of a booking.
///
/// Stored records spell these with mixed case ("pending", "Pending"), so
/// parsing is case-insensitive. Serialization is always lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its time range.
    ///
    /// Rejected and cancelled bookings are inert; everything else blocks.
    pub fn is_blocking(self) -> bool {
        !matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    /// Apply a lifecycle action.
    ///
    /// ```text
    /// Pending  --approve--> Approved
    /// Pending  --reject---> Rejected
    /// Pending  --cancel---> Cancelled
    /// Approved --cancel---> Cancelled
    /// ```
    pub fn apply(self, action: BookingAction) -> Result<BookingStatus> {
        use BookingAction::*;
        use BookingStatus::*;

        match (self, action) {
            (Pending, Approve) => Ok(Approved),
            (Pending, Reject) => Ok(Rejected),
            (Pending | Approved, Cancel) => Ok(Cancelled),
            (from, action) => Err(EngineError::InvalidTransition { from, action }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(EngineError::UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// An administrative action on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Approve,
    Reject,
    Cancel,
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingAction::Approve => "approve",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
        })
    }
}

/// A booking as read from storage.
///
/// `start`/`end` are kept raw rather than as a [`TimeRange`] so that malformed
/// rows (`end <= start`) can be represented and reported instead of failing
/// deserialization of the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
    #[serde(alias = "bookingAt", alias = "startsAt", deserialize_with = "timestamp::deserialize")]
    pub start: DateTime<Utc>,
    #[serde(alias = "endAt", alias = "endsAt", deserialize_with = "timestamp::deserialize")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, alias = "reason")]
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl BookingRecord {
    /// A pending booking with no metadata.
    pub fn new(id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id,
            resource_id: None,
            start,
            end,
            status: BookingStatus::Pending,
            purpose: String::new(),
            created_by: None,
            capacity: None,
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }

    /// The booking's time range, or `InvalidInput` if `end <= start`.
    pub fn range(&self) -> Result<TimeRange> {
        TimeRange::new(self.start, self.end).map_err(|_| {
            EngineError::InvalidInput(format!(
                "booking {} has end {} not after start {}",
                self.id,
                self.end.to_rfc3339(),
                self.start.to_rfc3339()
            ))
        })
    }
}

/// Parse a timestamp as RFC 3339, or as a naive ISO 8601 date-time read as UTC.
///
/// Naive forms may use `T` or a space as separator and carry fractional
/// seconds (`2026-03-16T10:00:00.0000000`).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|ndt| ndt.and_utc())
        .map_err(|e| EngineError::InvalidInput(format!("Invalid datetime '{}': {}", s, e)))
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
