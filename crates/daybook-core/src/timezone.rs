use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone.trim()).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse_timezone(timezone).map(|_| ())
}

/// Wall-clock time in `tz` at the given instant
pub fn local_datetime(at: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    at.with_timezone(tz).naive_local()
}

/// Get timezone offset string for display (e.g., "-0500")
pub fn get_timezone_offset(tz: &Tz, at: DateTime<Utc>) -> String {
    at.with_timezone(tz).format("%z").to_string()
}
