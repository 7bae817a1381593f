//! Rental periods and date-range validation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Naive formats accepted in addition to RFC 3339; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The closed interval `[start, end]` for which a resource is held.
///
/// Constructed through [`RentalPeriod::new`] or [`RentalPeriod::parse`], both of
/// which enforce `start >= now` and `end > start`. Deserialization enforces
/// `end > start` only, so stored periods that have since started still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredPeriod")]
pub struct RentalPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoredPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<StoredPeriod> for RentalPeriod {
    type Error = BookingError;

    fn try_from(stored: StoredPeriod) -> Result<Self> {
        let StoredPeriod { start, end } = stored;
        if end <= start {
            return Err(BookingError::ReturnBeforeRental { start, end });
        }
        Ok(Self { start, end })
    }
}

impl RentalPeriod {
    /// Validates a period against the current time.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Result<Self> {
        if start < now {
            return Err(BookingError::RentalInPast { start });
        }
        if end <= start {
            return Err(BookingError::ReturnBeforeRental { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses and validates raw start/end inputs.
    pub fn parse(start: &str, end: &str, now: DateTime<Utc>) -> Result<Self> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Self::new(start, end, now)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive overlap: touching endpoints conflict.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl std::fmt::Display for RentalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parses a timestamp from RFC 3339, a naive date-time, or a plain date.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| BookingError::InvalidDateFormat {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_accepts_supported_formats() {
        assert_eq!(parse_timestamp("2025-06-01").unwrap(), day(1));
        assert_eq!(parse_timestamp("2025-06-01T00:00").unwrap(), day(1));
        assert_eq!(parse_timestamp("2025-06-01T00:00:00").unwrap(), day(1));
        assert_eq!(parse_timestamp("2025-06-01T02:00:00+02:00").unwrap(), day(1));
        assert_eq!(parse_timestamp("2025-06-01T00:00:00Z").unwrap(), day(1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "tomorrow", "2025-13-01", "01/06/2025", "2025-06-31"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert!(matches!(err, BookingError::InvalidDateFormat { .. }), "{bad}");
        }
    }

    #[test]
    fn test_start_in_past_is_rejected() {
        let err = RentalPeriod::new(now() - Duration::seconds(1), day(2), now()).unwrap_err();
        assert!(matches!(err, BookingError::RentalInPast { .. }));
    }

    #[test]
    fn test_start_equal_to_now_is_accepted() {
        assert!(RentalPeriod::new(now(), day(2), now()).is_ok());
    }

    #[test]
    fn test_end_equal_to_start_is_rejected() {
        let err = RentalPeriod::new(day(1), day(1), now()).unwrap_err();
        assert!(matches!(err, BookingError::ReturnBeforeRental { .. }));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = RentalPeriod::parse("2025-06-03", "2025-06-02", now()).unwrap_err();
        assert!(matches!(err, BookingError::ReturnBeforeRental { .. }));
    }

    #[test]
    fn test_end_one_unit_after_start_is_accepted() {
        assert!(RentalPeriod::new(day(1), day(1) + Duration::seconds(1), now()).is_ok());
        assert!(RentalPeriod::parse("2025-06-01", "2025-06-02", now()).is_ok());
    }

    #[test]
    fn test_format_error_takes_precedence() {
        let err = RentalPeriod::parse("2020-01-01", "soon", now()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateFormat { value } if value == "soon"));
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let json = r#"{"start":"2025-06-03T00:00:00Z","end":"2025-06-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<RentalPeriod>(json).is_err());

        let empty = r#"{"start":"2025-06-01T00:00:00Z","end":"2025-06-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<RentalPeriod>(empty).is_err());
    }

    #[test]
    fn test_deserialize_accepts_started_period() {
        let json = r#"{"start":"2020-01-01T00:00:00Z","end":"2020-01-02T00:00:00Z"}"#;
        let period: RentalPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.end() - period.start(), Duration::days(1));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = RentalPeriod::new(day(1), day(3), now()).unwrap();
        let touching = RentalPeriod::new(day(3), day(5), now()).unwrap();
        let inside = RentalPeriod::new(day(2), day(2) + Duration::hours(1), now()).unwrap();
        let after = RentalPeriod::new(day(4), day(6), now()).unwrap();

        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(!a.overlaps(&after));
        assert!(!after.overlaps(&a));
    }
}
