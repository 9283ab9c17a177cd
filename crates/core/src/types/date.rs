//! Human-readable timestamps for order and page listings.

use chrono::{DateTime, Utc};

/// Placeholder shown when a record has no timestamp yet.
pub const MISSING_DATE: &str = "N/A";

/// Long form with time, e.g. `October 18, 2026, 02:30 PM`.
#[must_use]
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(
        || MISSING_DATE.to_owned(),
        |d| d.format("%B %-d, %Y, %I:%M %p").to_string(),
    )
}

/// Short form without time, e.g. `Oct 18, 2026`.
#[must_use]
pub fn format_short_date(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(
        || MISSING_DATE.to_owned(),
        |d| d.format("%b %-d, %Y").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_long_format() {
        let date = Utc.with_ymd_and_hms(2026, 10, 8, 14, 30, 0).single();
        assert_eq!(format_date(date.as_ref()), "October 8, 2026, 02:30 PM");
    }

    #[test]
    fn test_short_format() {
        let date = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).single();
        assert_eq!(format_short_date(date.as_ref()), "Jan 31, 2026");
    }

    #[test]
    fn test_missing_date() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_short_date(None), "N/A");
    }
}
