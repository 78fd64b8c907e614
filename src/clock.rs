use chrono::NaiveTime;

use crate::config::ConfigError;

pub const CLOCK_FORMAT: &str = "%H:%M";

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Parse a wall-clock `HH:MM` value.
pub fn parse_clock(input: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(input.trim(), CLOCK_FORMAT)
        .map_err(|e| ConfigError::InvalidTime(format!("'{input}': {e}")))
}

pub fn time_range_label(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", format_clock(start), format_clock(end))
}

/// Serde adapter that keeps times on the wire as zero-padded `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_clock(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(D::Error::custom)
    }
}
