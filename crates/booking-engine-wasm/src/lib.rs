//! WASM bindings for booking-engine.
//!
//! Exposes availability checks, free-slot computation, occupancy and day
//! overviews to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings; an optional engine config may be passed as a JSON string too.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir frontend/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::{AvailabilityEngine, BookingRecord, EngineConfig, TimeRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: parse JSON/ISO 8601 inputs, serialize outputs
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 or naive (UTC) datetime, with the same rules as booking payloads.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    booking_engine::parse_timestamp(s).map_err(|e| e.to_string())
}

fn parse_bookings(json: &str) -> Result<Vec<BookingRecord>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid bookings JSON: {}", e))
}

fn engine(config_json: Option<&str>) -> Result<AvailabilityEngine, String> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(json).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    Ok(AvailabilityEngine::new(config))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn check_availability_json(
    resource_id: i64,
    start: &str,
    end: &str,
    bookings_json: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let candidate = TimeRange {
        start: parse_datetime(start)?,
        end: parse_datetime(end)?,
    };
    let bookings = parse_bookings(bookings_json)?;
    let result = engine(config_json)?
        .check_availability(resource_id, &candidate, &bookings)
        .map_err(|e| e.to_string())?;
    to_json(&result)
}

fn free_slots_json(
    window_start: &str,
    window_end: &str,
    bookings_json: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let window = TimeRange {
        start: parse_datetime(window_start)?,
        end: parse_datetime(window_end)?,
    };
    let bookings = parse_bookings(bookings_json)?;
    let slots = engine(config_json)?
        .free_slots_in_window(&window, &bookings)
        .map_err(|e| e.to_string())?;
    to_json(&slots)
}

fn is_occupied_json(instant: &str, bookings_json: &str) -> Result<bool, String> {
    let instant = parse_datetime(instant)?;
    let bookings = parse_bookings(bookings_json)?;
    Ok(booking_engine::is_occupied_at(instant, &bookings))
}

fn day_overview_json(
    resource_id: i64,
    date: &str,
    bookings_json: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let date: NaiveDate = date
        .parse()
        .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
    let bookings = parse_bookings(bookings_json)?;
    let overview = engine(config_json)?
        .day_overview(resource_id, date, &bookings)
        .map_err(|e| e.to_string())?;
    to_json(&overview)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check whether `[start, end)` is free given a resource's bookings.
///
/// `bookings_json` must be a JSON array of booking records. Returns a JSON
/// string `{resourceId, isAvailable, conflicts, freeSlots}`.
#[wasm_bindgen(js_name = "checkAvailability")]
pub fn check_availability(
    resource_id: i32,
    start: &str,
    end: &str,
    bookings_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    check_availability_json(
        i64::from(resource_id),
        start,
        end,
        bookings_json,
        config_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Free slots within a bounding window, as a JSON array of `{start, end}`.
#[wasm_bindgen(js_name = "freeSlotsInWindow")]
pub fn free_slots_in_window(
    window_start: &str,
    window_end: &str,
    bookings_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    free_slots_json(window_start, window_end, bookings_json, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether any blocking booking holds the resource at `instant`.
#[wasm_bindgen(js_name = "isOccupiedAt")]
pub fn is_occupied_at(instant: &str, bookings_json: &str) -> Result<bool, JsValue> {
    is_occupied_json(instant, bookings_json).map_err(|e| JsValue::from_str(&e))
}

/// Bookings and free business-hour slots for one resource on `date` (YYYY-MM-DD).
#[wasm_bindgen(js_name = "dayOverview")]
pub fn day_overview(
    resource_id: i32,
    date: &str,
    bookings_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    day_overview_json(i64::from(resource_id), date, bookings_json, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}
