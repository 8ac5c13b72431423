//! # booking-engine
//!
//! Interval-based availability and conflict detection for room and resource
//! bookings.
//!
//! Given a candidate time range and the bookings already held on a resource,
//! the engine decides whether the range is free, lists the bookings in the
//! way, and computes the free gaps. It performs no I/O: callers fetch
//! bookings from storage and persist new ones themselves.
//!
//! All instants are `DateTime<Utc>`; ranges are half-open `[start, end)`.
//!
//! ## Modules
//!
//! - [`range`]: Half-open time ranges
//! - [`booking`]: Booking records and the status lifecycle
//! - [`conflict`]: Detect bookings overlapping a candidate range
//! - [`freebusy`]: Compute free time slots from busy intervals
//! - [`availability`]: The engine: verdicts, day overviews, "free right now"
//! - [`clock`]: Injectable source of the current instant
//! - [`access`]: Role-based resource access checks
//! - [`config`]: Engine configuration
//! - [`error`]: Error types

pub mod access;
pub mod availability;
pub mod booking;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod range;

pub use access::{can_book_resource_type, has_access, ResourceAccess, ResourceType, Role};
pub use availability::{
    business_day_window, check_availability, free_slots_in_window, AvailabilityEngine,
    AvailabilityResult, DayOverview, ResourceSchedule,
};
pub use booking::{parse_timestamp, BookingAction, BookingRecord, BookingStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BusinessHours, EngineConfig, MalformedPolicy};
pub use conflict::{find_conflicts, is_occupied_at, ConflictingBooking};
pub use error::EngineError;
pub use freebusy::{find_free_slots, GapPolicy};
pub use range::TimeRange;
