//! ISO-8601 coercion for date and datetime columns

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a datetime. Offsets are converted to UTC; values without an offset
/// are taken as UTC; a bare date means midnight.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a date, accepting a full datetime and keeping its date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offsets_normalize_to_utc() {
        let expected = Utc.with_ymd_and_hms(2010, 10, 1, 4, 0, 0).unwrap();
        assert_eq!(parse_datetime("2010-10-01T00:00:00-04:00"), Some(expected));
        assert_eq!(parse_datetime("2010-10-01T04:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2010-10-01T04:00:00"), Some(expected));
    }

    #[test]
    fn bare_dates_are_midnight() {
        assert_eq!(
            parse_datetime("2009-05-16"),
            Some(Utc.with_ymd_and_hms(2009, 5, 16, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2009-05-16T12:00:00Z"),
            NaiveDate::from_ymd_opt(2009, 5, 16)
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("2010-13-45"), None);
        assert_eq!(parse_date(""), None);
    }
}
