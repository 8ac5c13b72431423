//! Error types for booking-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::booking::{BookingAction, BookingStatus};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid range: start {start} must be before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("Cannot {action} a booking that is {from}")]
    InvalidTransition {
        from: BookingStatus,
        action: BookingAction,
    },

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
