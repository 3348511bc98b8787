//! Date and time utility functions
//!
//! Dates travel over the API as `YYYY-MM-DD` strings. Clients frequently send
//! full ISO timestamps (`2025-01-15T00:00:00.000Z`); those are truncated at the
//! `T` before validation.

use chrono::{DateTime, NaiveDate, Utc};

/// Standard date format used for stored calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Format the current UTC date to YYYY-MM-DD string
pub fn format_today() -> String {
    format_ymd(Utc::now().date_naive())
}

/// Format the calendar date part of a timestamp
pub fn format_timestamp_date(ts: &DateTime<Utc>) -> String {
    format_ymd(ts.date_naive())
}

/// Normalize a client supplied date to `YYYY-MM-DD`.
///
/// # Returns
/// * `Ok(None)` for an empty input
/// * `Ok(Some(date))` for a valid date or timestamp
/// * `Err(_)` when the date part does not parse
pub fn normalize_date(input: &str) -> Result<Option<String>, chrono::ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    parse_date(date_part).map(|d| Some(format_ymd(d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_date() {
        assert_eq!(normalize_date("2025-03-07").unwrap(), Some("2025-03-07".to_string()));
    }

    #[test]
    fn test_normalize_truncates_timestamp() {
        assert_eq!(
            normalize_date("2025-03-07T16:00:00.000Z").unwrap(),
            Some("2025-03-07".to_string())
        );
    }

    #[test]
    fn test_normalize_empty_is_none() {
        assert_eq!(normalize_date("  ").unwrap(), None);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_date("next tuesday").is_err());
        assert!(normalize_date("2025-13-01").is_err());
    }
}
