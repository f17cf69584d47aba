use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse date '{0}'")]
    Date(String),
    #[error("Failed to parse time '{0}', expected e.g. '09:30' or '2:15 PM'")]
    Time(String),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    Color(String),
}

/// Parses an ISO date or a natural phrase ("tomorrow", "next friday")
/// relative to `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    let anchor = today
        .and_hms_opt(12, 0, 0)
        .map(|noon| Utc.from_utc_datetime(&noon))
        .ok_or_else(|| ParseError::Date(input.to_string()))?;
    parse_date_string(input, anchor, Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|_| ParseError::Date(input.to_string()))
}

/// Parses 24-hour (`14:30`) and 12-hour (`2:30 PM`, `9am`) times.
pub fn parse_time(input: &str) -> Result<NaiveTime, ParseError> {
    let err = || ParseError::Time(input.to_string());
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h, m),
        None if meridiem.is_some() => (clock, "0"),
        None => return Err(err()),
    };
    let hour: u32 = hour.parse().map_err(|_| err())?;
    let minute: u32 = minute.parse().map_err(|_| err())?;

    let hour = match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return Err(err()),
        Some(pm) => hour % 12 + if pm { 12 } else { 0 },
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(err)
}

pub fn parse_color(input: &str) -> Result<String, ParseError> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_uppercase()))
    } else {
        Err(ParseError::Color(input.to_string()))
    }
}
