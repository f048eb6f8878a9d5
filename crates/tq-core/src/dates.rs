//! Locale-agnostic date recognition shared by schema inference and
//! axis formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried, in order, when parsing a candidate date string.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Try to read a string as a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Quick shape check so epoch seconds and other bare numbers never count
/// as dates even when a lenient parser would accept them.
pub fn looks_date_shaped(value: &str) -> bool {
    let trimmed = value.trim();
    (trimmed.contains('-') || trimmed.contains('/'))
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

/// Render a date the way a chart axis should show it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_formats() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("01/15/2024").is_some());
        assert!(parse_date("2024-01-15T08:30:00Z").is_some());
        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn test_epoch_numbers_are_not_date_shaped() {
        assert!(!looks_date_shaped("1700000000"));
        assert!(looks_date_shaped("2024-01-15"));
        assert!(looks_date_shaped("1/2/2024"));
    }

    #[test]
    fn test_axis_format() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
    }
}
