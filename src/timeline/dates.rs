//! ISO-8601 date handling for everything that crosses the engine boundary.
//!
//! Dates enter and leave the engine as `YYYY-MM-DD` strings. Internally the
//! engine only ever works with [`NaiveDate`], so no locale-dependent
//! formatting can leak out.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{TimelineError, TimelineResult};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date string.
pub fn parse_iso_date(s: &str) -> TimelineResult<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimelineError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
        .map_err(|_| TimelineError::InvalidDate(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The same month/day in another year.
///
/// February 29th only exists in leap years; other years have no candidate.
pub fn with_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let d = parse_iso_date("2025-01-06").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(format_iso_date(d), "2025-01-06");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_iso_date("").is_err());
        assert!(parse_iso_date("not-a-date").is_err());
        assert!(parse_iso_date("06/01/2025").is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
    }

    #[test]
    fn leap_day_has_no_candidate_in_common_years() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(with_year(leap, 2025), None);
        assert_eq!(with_year(leap, 2028), NaiveDate::from_ymd_opt(2028, 2, 29));
    }

    #[test]
    fn weekend_detection() {
        // 2025-01-11 is a Saturday.
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()));
    }
}
