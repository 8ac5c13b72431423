//! The availability engine: conflict checks, free slots, and "free right now"
//! queries for a single resource's bookings.
//!
//! The engine is stateless. Every call is a pure function of its inputs and
//! the engine's [`EngineConfig`]; fetching bookings and persisting new ones
//! belong to the caller. Results are advisory unless the caller performs
//! check-and-insert atomically per resource.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::access::{has_access, ResourceAccess};
use crate::booking::BookingRecord;
use crate::clock::Clock;
use crate::config::{BusinessHours, EngineConfig};
use crate::conflict::{self, ConflictingBooking};
use crate::error::{EngineError, Result};
use crate::freebusy;
use crate::range::TimeRange;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Verdict for one candidate range on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// Echoed back from the request; never used for filtering.
    pub resource_id: i64,
    pub is_available: bool,
    /// Overlapping blocking bookings, sorted by start then id.
    pub conflicts: Vec<ConflictingBooking>,
    /// Free parts of the candidate range, sorted by start, non-overlapping.
    pub free_slots: Vec<TimeRange>,
}

/// One resource's calendar day: who holds it and when it is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    pub resource_id: i64,
    pub date: NaiveDate,
    /// Business-hours window the free slots are reported in.
    pub window: TimeRange,
    /// Blocking bookings touching the calendar day, sorted by start then id.
    pub bookings: Vec<ConflictingBooking>,
    pub free_slots: Vec<TimeRange>,
}

/// A resource with its restriction settings and current bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchedule {
    pub resource_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub access: ResourceAccess,
    #[serde(default)]
    pub bookings: Vec<BookingRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityEngine {
    config: EngineConfig,
}

impl AvailabilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check whether `candidate` is free on a resource.
    ///
    /// `bookings` must already be narrowed to the resource; `resource_id` is
    /// only echoed back.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidRange` if `candidate.start >= candidate.end`,
    /// and `EngineError::InvalidInput` for a malformed booking when the config
    /// says to reject them.
    pub fn check_availability(
        &self,
        resource_id: i64,
        candidate: &TimeRange,
        bookings: &[BookingRecord],
    ) -> Result<AvailabilityResult> {
        let conflicts = conflict::find_conflicts(candidate, bookings, self.config.malformed_policy)?;

        let free_slots = if conflicts.is_empty() {
            vec![*candidate]
        } else {
            let busy: Vec<TimeRange> = conflicts.iter().map(ConflictingBooking::range).collect();
            freebusy::find_free_slots(&busy, candidate, self.config.gap_policy)
        };

        tracing::debug!(
            resource_id,
            candidate = %candidate,
            conflicts = conflicts.len(),
            free_slots = free_slots.len(),
            "availability checked"
        );

        Ok(AvailabilityResult {
            resource_id,
            is_available: conflicts.is_empty(),
            conflicts,
            free_slots,
        })
    }

    /// Free slots within an arbitrary bounding window (e.g. a business day).
    ///
    /// Returns `[window]` when no blocking booking overlaps it.
    pub fn free_slots_in_window(
        &self,
        window: &TimeRange,
        bookings: &[BookingRecord],
    ) -> Result<Vec<TimeRange>> {
        window.validate()?;
        let busy = self.busy_ranges(bookings)?;
        Ok(freebusy::find_free_slots(&busy, window, self.config.gap_policy))
    }

    /// The first free slot of at least `min_duration_minutes` in `window`.
    pub fn first_free_slot(
        &self,
        window: &TimeRange,
        bookings: &[BookingRecord],
        min_duration_minutes: i64,
    ) -> Result<Option<TimeRange>> {
        window.validate()?;
        let busy = self.busy_ranges(bookings)?;
        Ok(freebusy::find_first_free_slot(
            &busy,
            window,
            self.config.gap_policy,
            min_duration_minutes,
        ))
    }

    pub fn is_occupied_at(&self, instant: DateTime<Utc>, bookings: &[BookingRecord]) -> bool {
        conflict::is_occupied_at(instant, bookings)
    }

    pub fn is_occupied_now(&self, clock: &impl Clock, bookings: &[BookingRecord]) -> bool {
        conflict::is_occupied_at(clock.now(), bookings)
    }

    /// Resources that nobody holds at `clock.now()`.
    ///
    /// When `role` is given, resources the role may not access are left out.
    /// Input order is preserved.
    pub fn available_now<'a>(
        &self,
        clock: &impl Clock,
        resources: &'a [ResourceSchedule],
        role: Option<&str>,
    ) -> Vec<&'a ResourceSchedule> {
        let now = clock.now();
        resources
            .iter()
            .filter(|r| role.is_none_or(|role| has_access(&r.access, role)))
            .filter(|r| !conflict::is_occupied_at(now, &r.bookings))
            .collect()
    }

    /// The configured business hours on `date`, as a UTC range.
    pub fn business_day_window(&self, date: NaiveDate) -> Result<TimeRange> {
        business_day_window(date, &self.config.business_hours)
    }

    /// Bookings and free slots for one resource on one calendar day.
    ///
    /// Bookings are listed for the whole day in the business-hours timezone;
    /// free slots only within business hours.
    pub fn day_overview(
        &self,
        resource_id: i64,
        date: NaiveDate,
        bookings: &[BookingRecord],
    ) -> Result<DayOverview> {
        let window = self.business_day_window(date)?;
        let day = calendar_day(date, &self.config.business_hours.timezone)?;
        let day_bookings = conflict::find_conflicts(&day, bookings, self.config.malformed_policy)?;
        let free_slots = self.free_slots_in_window(&window, bookings)?;

        Ok(DayOverview {
            resource_id,
            date,
            window,
            bookings: day_bookings,
            free_slots,
        })
    }

    /// Ranges of blocking bookings, ordered by start then booking id.
    fn busy_ranges(&self, bookings: &[BookingRecord]) -> Result<Vec<TimeRange>> {
        let mut busy = conflict::blocking_ranges(bookings, self.config.malformed_policy)?;
        busy.sort_by_key(|(booking, range)| (range.start, booking.id));
        Ok(busy.into_iter().map(|(_, range)| range).collect())
    }
}

/// [`AvailabilityEngine::check_availability`] with the default config.
pub fn check_availability(
    resource_id: i64,
    candidate: &TimeRange,
    bookings: &[BookingRecord],
) -> Result<AvailabilityResult> {
    AvailabilityEngine::default().check_availability(resource_id, candidate, bookings)
}

/// [`AvailabilityEngine::free_slots_in_window`] with the default config.
pub fn free_slots_in_window(window: &TimeRange, bookings: &[BookingRecord]) -> Result<Vec<TimeRange>> {
    AvailabilityEngine::default().free_slots_in_window(window, bookings)
}

/// Build the UTC range covering `hours` on `date` in the hours' timezone.
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` for an unknown IANA name,
/// `EngineError::InvalidInput` if an opening time does not exist on that date
/// (DST gap), and `EngineError::InvalidRange` if close is not after open.
pub fn business_day_window(date: NaiveDate, hours: &BusinessHours) -> Result<TimeRange> {
    let tz = parse_tz(&hours.timezone)?;
    let open = localize(&tz, date, date.and_time(hours.open))?;
    let close = localize(&tz, date, date.and_time(hours.close))?;
    TimeRange::new(open, close)
}

/// Start of `date` to start of the next day in `timezone`, as a UTC range.
///
/// A day whose midnight falls in a DST gap starts at the first local minute
/// that exists.
pub fn calendar_day(date: NaiveDate, timezone: &str) -> Result<TimeRange> {
    let tz = parse_tz(timezone)?;
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| EngineError::InvalidInput(format!("date out of range: {}", date)))?;
    TimeRange::new(start_of_day(&tz, date)?, start_of_day(&tz, next)?)
}

fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

fn start_of_day(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|m| midnight + Duration::minutes(m))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!("{} has no local time in {}", date, tz.name()))
        })
}

fn localize(tz: &Tz, date: NaiveDate, local: chrono::NaiveDateTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "{} does not exist on {} in {}",
                local.time(),
                date,
                tz.name()
            ))
        })
}
