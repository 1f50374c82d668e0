//! Small text formatting helpers for profile display.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Capitalizes the first letter of every space-separated word and lowercases
/// the rest. Runs of spaces are preserved.
pub fn title(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a server timestamp as `January 5, 2024`, in UTC.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.frac]` values
/// (read as UTC) and bare dates. Absent or unparseable input yields an empty
/// string.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };

    parse_utc(raw)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_capitalizes_each_word() {
        assert_eq!(title("john DOE"), "John Doe");
        assert_eq!(title("mathematics"), "Mathematics");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_title_keeps_spacing() {
        assert_eq!(title("a  b"), "A  B");
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(
            format_date(Some("2024-01-05T10:20:30.123456Z")),
            "January 5, 2024"
        );
    }

    #[test]
    fn test_format_date_converts_to_utc() {
        assert_eq!(
            format_date(Some("2023-12-31T23:30:00-02:00")),
            "January 1, 2024"
        );
    }

    #[test]
    fn test_format_date_bare_and_naive() {
        assert_eq!(format_date(Some("2022-07-14")), "July 14, 2022");
        assert_eq!(format_date(Some("2022-07-14T08:00:00")), "July 14, 2022");
    }

    #[test]
    fn test_format_date_missing_or_invalid() {
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some("")), "");
        assert_eq!(format_date(Some("yesterday")), "");
    }
}
