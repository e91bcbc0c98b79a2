//! Calendar-date handling
//!
//! Parsing for exercise dates and log range bounds, the canonical rendering
//! returned to clients (`Mon Jan 01 2024`), and the clock used to default
//! missing exercise dates.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Canonical output format: weekday, month, two-digit day, four-digit year
pub const CANONICAL_FORMAT: &str = "%a %b %d %Y";

/// Format accepted for `from`/`to` query parameters
pub const RANGE_BOUND_FORMAT: &str = "%Y-%m-%d";

/// Years that render as exactly four digits and sort correctly as ISO text
fn has_four_digit_year(date: &NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

/// Render a date the way every response shows it
pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Parse a `from`/`to` bound
///
/// Only exact `YYYY-MM-DD` is accepted; `2024-1-5` or trailing text is rejected.
pub fn parse_range_bound(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, RANGE_BOUND_FORMAT)
        .ok()
        .filter(has_four_digit_year)?;
    (date.format(RANGE_BOUND_FORMAT).to_string() == value).then_some(date)
}

/// Parse the optional `date` of a new exercise
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (its UTC day) or the canonical form.
/// Years outside `0..=9999` are rejected.
pub fn parse_exercise_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, RANGE_BOUND_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(value, CANONICAL_FORMAT).ok())
        .filter(has_four_digit_year)
}

/// Source of "today" for exercises logged without a date
pub trait Clock: Send + Sync {
    /// The current calendar day
    fn today(&self) -> NaiveDate;
}

/// Wall clock, in UTC
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to one day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_canonical() {
        assert_eq!(format_canonical(day(2024, 1, 1)), "Mon Jan 01 2024");
        assert_eq!(format_canonical(day(2023, 12, 25)), "Mon Dec 25 2023");
        assert_eq!(format_canonical(day(2024, 2, 29)), "Thu Feb 29 2024");
    }

    #[test]
    fn test_parse_range_bound_valid() {
        assert_eq!(parse_range_bound("2024-01-31"), Some(day(2024, 1, 31)));
    }

    #[test]
    fn test_parse_range_bound_is_strict() {
        assert_eq!(parse_range_bound("notadate"), None);
        assert_eq!(parse_range_bound("2024-1-5"), None);
        assert_eq!(parse_range_bound("2024-02-30"), None);
        assert_eq!(parse_range_bound("2024-01-01T00:00:00Z"), None);
        assert_eq!(parse_range_bound(""), None);
    }

    #[test]
    fn test_parse_exercise_date_formats() {
        assert_eq!(parse_exercise_date("2024-03-15"), Some(day(2024, 3, 15)));
        assert_eq!(
            parse_exercise_date("2024-03-15T23:30:00-02:00"),
            Some(day(2024, 3, 16))
        );
        assert_eq!(parse_exercise_date("Fri Mar 15 2024"), Some(day(2024, 3, 15)));
        assert_eq!(parse_exercise_date(" 2024-03-15 "), Some(day(2024, 3, 15)));
        assert_eq!(parse_exercise_date("yesterday"), None);
    }

    #[test]
    fn test_signed_and_five_digit_years_rejected() {
        for value in ["+20240-01-01", "-0001-01-01"] {
            assert_eq!(parse_exercise_date(value), None, "exercise date {}", value);
            assert_eq!(parse_range_bound(value), None, "range bound {}", value);
        }
        assert_eq!(parse_exercise_date("0000-01-01"), Some(day(0, 1, 1)));
        assert_eq!(parse_range_bound("9999-12-31"), Some(day(9999, 12, 31)));
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(day(2024, 1, 1)).today(), day(2024, 1, 1));
    }
}
