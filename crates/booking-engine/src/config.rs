//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid config
//! that merges busy intervals, skips malformed bookings, and uses 08:00-18:00
//! UTC business hours.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::freebusy::GapPolicy;

/// What to do with a supplied booking whose `end <= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log and ignore the record.
    #[default]
    Skip,
    /// Fail the whole computation with `InvalidInput`.
    Reject,
}

/// Opening hours used to build a day's bounding window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
    /// IANA timezone the opening hours are expressed in.
    pub timezone: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gap_policy: GapPolicy,
    pub malformed_policy: MalformedPolicy,
    pub business_hours: BusinessHours,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }
}

/// `"HH:MM"` (or `"HH:MM:SS"`) wall-clock times.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        s.serialize_str(&time.format(format).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| de::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}
