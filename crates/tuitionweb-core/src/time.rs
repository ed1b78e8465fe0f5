//! Timestamp parsing and date-range buckets for listings

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, Utc};
use tuitionweb_config::DateRange;

/// Parse an API timestamp
///
/// Accepts RFC 3339 and naive ISO-8601 (read as UTC). A bare date is
/// midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Build the display offset from whole hours, falling back to UTC
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Records that carry a creation timestamp
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// A date bucket evaluated against a fixed "now"
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    pub range: DateRange,
    /// Wall-clock instant the bucket is anchored to
    pub now: DateTime<Utc>,
    /// Offset that decides calendar days for `Today`
    pub offset: FixedOffset,
}

impl TimeContext {
    /// Anchor the bucket to the current wall-clock time
    pub fn new(range: DateRange, offset: FixedOffset) -> Self {
        Self::at(range, Utc::now(), offset)
    }

    pub fn at(range: DateRange, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { range, now, offset }
    }

    /// Earliest instant included, if the bucket has a lower bound
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self.range {
            DateRange::All => None,
            DateRange::Today => {
                let local = self.now.with_timezone(&self.offset);
                local
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .and_then(|midnight| midnight.and_local_timezone(self.offset).single())
                    .map(|dt| dt.with_timezone(&Utc))
            }
            DateRange::Week => Some(self.now - Duration::days(7)),
            DateRange::Month => self.now.checked_sub_months(Months::new(1)),
        }
    }

    /// Check if a timestamp falls inside the bucket
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        match self.range {
            DateRange::All => true,
            DateRange::Today => {
                ts.with_timezone(&self.offset).date_naive()
                    == self.now.with_timezone(&self.offset).date_naive()
            }
            DateRange::Week | DateRange::Month => match self.start() {
                Some(start) => *ts >= start,
                None => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-09-01T10:00:00"), Some(utc(2024, 9, 1, 10, 0)));
        assert_eq!(parse_timestamp("2024-09-01T10:00:00.123456").map(|t| t.timestamp()), Some(utc(2024, 9, 1, 10, 0).timestamp()));
        assert_eq!(parse_timestamp("2024-09-01T13:00:00+03:00"), Some(utc(2024, 9, 1, 10, 0)));
        assert_eq!(parse_timestamp("2024-09-01 10:00:00"), Some(utc(2024, 9, 1, 10, 0)));
        assert_eq!(parse_timestamp("2024-09-01"), Some(utc(2024, 9, 1, 0, 0)));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_all_contains_everything() {
        let ctx = TimeContext::at(DateRange::All, utc(2024, 9, 10, 12, 0), offset_from_hours(0));
        assert!(ctx.contains(&utc(1999, 1, 1, 0, 0)));
        assert!(ctx.start().is_none());
    }

    #[test]
    fn test_today_uses_display_offset() {
        // 22:30 UTC on Sep 9 is already Sep 10 at UTC+3
        let now = utc(2024, 9, 10, 9, 0);
        let ctx = TimeContext::at(DateRange::Today, now, offset_from_hours(3));
        assert!(ctx.contains(&utc(2024, 9, 9, 22, 30)));
        assert!(!ctx.contains(&utc(2024, 9, 9, 20, 30)));

        let utc_ctx = TimeContext::at(DateRange::Today, now, offset_from_hours(0));
        assert!(!utc_ctx.contains(&utc(2024, 9, 9, 22, 30)));
        assert_eq!(ctx.start(), Some(utc(2024, 9, 9, 21, 0)));
    }

    #[test]
    fn test_week_is_seven_days_back() {
        let ctx = TimeContext::at(DateRange::Week, utc(2024, 9, 10, 12, 0), offset_from_hours(0));
        assert!(ctx.contains(&utc(2024, 9, 3, 12, 0)));
        assert!(!ctx.contains(&utc(2024, 9, 3, 11, 59)));
    }

    #[test]
    fn test_month_clamps_to_shorter_month() {
        let ctx = TimeContext::at(DateRange::Month, utc(2024, 3, 31, 12, 0), offset_from_hours(0));
        assert_eq!(ctx.start(), Some(utc(2024, 2, 29, 12, 0)));
        assert!(ctx.contains(&utc(2024, 3, 1, 0, 0)));
        assert!(!ctx.contains(&utc(2024, 2, 28, 0, 0)));
    }
}
