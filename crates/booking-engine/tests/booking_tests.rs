//! Tests for booking records and the status lifecycle.

use booking_engine::{parse_timestamp, BookingAction, BookingRecord, BookingStatus, EngineError};
use chrono::{TimeZone, Utc};

// ── Status ──────────────────────────────────────────────────────────────────

#[test]
fn only_rejected_and_cancelled_are_inert() {
    assert!(BookingStatus::Pending.is_blocking());
    assert!(BookingStatus::Approved.is_blocking());
    assert!(!BookingStatus::Rejected.is_blocking());
    assert!(!BookingStatus::Cancelled.is_blocking());
}

#[test]
fn status_parses_case_insensitively() {
    assert_eq!("pending".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
    assert_eq!("Approved".parse::<BookingStatus>().unwrap(), BookingStatus::Approved);
    assert_eq!(" REJECTED ".parse::<BookingStatus>().unwrap(), BookingStatus::Rejected);
    assert_eq!("canceled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
}

#[test]
fn unknown_status_is_an_error() {
    let err = "archived".parse::<BookingStatus>().unwrap_err();
    assert_eq!(err, EngineError::UnknownStatus("archived".to_string()));
}

#[test]
fn lifecycle_allows_documented_transitions() {
    use BookingAction::*;
    use BookingStatus::*;

    assert_eq!(Pending.apply(Approve).unwrap(), Approved);
    assert_eq!(Pending.apply(Reject).unwrap(), Rejected);
    assert_eq!(Pending.apply(Cancel).unwrap(), Cancelled);
    assert_eq!(Approved.apply(Cancel).unwrap(), Cancelled);
}

#[test]
fn lifecycle_rejects_other_transitions() {
    use BookingAction::*;
    use BookingStatus::*;

    for (from, action) in [
        (Approved, Approve),
        (Approved, Reject),
        (Rejected, Approve),
        (Rejected, Cancel),
        (Cancelled, Cancel),
        (Cancelled, Approve),
    ] {
        let err = from.apply(action).unwrap_err();
        assert_eq!(err, EngineError::InvalidTransition { from, action });
    }
}

#[test]
fn transition_error_message_names_status_and_action() {
    let err = BookingStatus::Rejected
        .apply(BookingAction::Approve)
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot approve a booking that is rejected");
}

// ── Records ─────────────────────────────────────────────────────────────────

#[test]
fn record_deserializes_from_storage_field_names() {
    let json = r#"{
        "id": 3,
        "resourceId": 12,
        "bookingAt": "2026-03-16T09:00:00Z",
        "endAt": "2026-03-16T10:00:00Z",
        "status": "Approved",
        "reason": "Seminar",
        "capacity": 40
    }"#;

    let record: BookingRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record.id, 3);
    assert_eq!(record.resource_id, Some(12));
    assert_eq!(record.status, BookingStatus::Approved);
    assert_eq!(record.purpose, "Seminar");
    assert_eq!(record.capacity, Some(40));
    assert_eq!(record.range().unwrap().duration_minutes(), 60);
}

#[test]
fn record_status_defaults_to_pending() {
    let json = r#"{"id": 1, "start": "2026-03-16T09:00:00Z", "end": "2026-03-16T10:00:00Z"}"#;

    let record: BookingRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record.status, BookingStatus::Pending);
    assert!(record.purpose.is_empty());
}

#[test]
fn record_with_unknown_status_fails_to_deserialize() {
    let json = r#"{"id": 1, "start": "2026-03-16T09:00:00Z", "end": "2026-03-16T10:00:00Z", "status": "lost"}"#;

    assert!(serde_json::from_str::<BookingRecord>(json).is_err());
}

#[test]
fn malformed_record_range_is_invalid_input() {
    let json = r#"{"id": 9, "start": "2026-03-16T10:00:00Z", "end": "2026-03-16T09:00:00Z"}"#;
    let record: BookingRecord = serde_json::from_str(json).unwrap();

    let err = record.range().unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(ref msg) if msg.contains("booking 9")));
}

// ── Timestamps ──────────────────────────────────────────────────────────────

#[test]
fn naive_record_timestamps_are_read_as_utc() {
    let json = r#"[
        {"id": 1, "start": "2026-03-16T10:00:00", "end": "2026-03-16T11:00:00", "status": "approved"},
        {"id": 2, "bookingAt": "2026-03-16T12:00:00.0000000", "endAt": "2026-03-16 13:30:00"}
    ]"#;

    let records: Vec<BookingRecord> = serde_json::from_str(json).unwrap();

    assert_eq!(records[0].start, Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap());
    assert_eq!(records[0].end, Utc.with_ymd_and_hms(2026, 3, 16, 11, 0, 0).unwrap());
    assert_eq!(records[1].start, Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap());
    assert_eq!(records[1].end, Utc.with_ymd_and_hms(2026, 3, 16, 13, 30, 0).unwrap());
}

#[test]
fn offset_record_timestamps_are_converted_to_utc() {
    let json = r#"{"id": 1, "start": "2026-03-16T15:30:00+05:30", "end": "2026-03-16T16:30:00+05:30"}"#;

    let record: BookingRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record.start, Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap());
}

#[test]
fn record_survives_serialization_round_trip() {
    let record = BookingRecord::new(
        4,
        Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap(),
    )
    .with_purpose("Lab session");

    let json = serde_json::to_string(&record).unwrap();
    let back: BookingRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(back, record);
}

#[test]
fn unparseable_record_timestamp_fails_to_deserialize() {
    let json = r#"{"id": 1, "start": "next monday", "end": "2026-03-16T10:00:00Z"}"#;

    let err = serde_json::from_str::<BookingRecord>(json).unwrap_err();

    assert!(err.to_string().contains("Invalid datetime 'next monday'"), "{}", err);
}

#[test]
fn parse_timestamp_rejects_date_only_input() {
    let err = parse_timestamp("2026-03-16").unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(_)));
}
