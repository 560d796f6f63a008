//! Conversions between millisecond timestamps and calendar dates, and the
//! date/time labels shown next to transactions.
//!
//! Timestamps are stored as milliseconds since the Unix epoch. Converting one
//! to a calendar date can fail when the value is outside the range supported
//! by [time], so every function here treats such timestamps as invalid rather
//! than panicking.

use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Convert a millisecond timestamp to a date-time in `offset`.
///
/// Returns `None` if the timestamp cannot be represented as a calendar date.
pub fn from_millis(millis: i64, offset: UtcOffset) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
        .ok()?
        .checked_to_offset(offset)
}

/// Convert a millisecond timestamp to a wall-clock date-time in `offset`.
pub fn local_date_time(millis: i64, offset: UtcOffset) -> Option<PrimitiveDateTime> {
    from_millis(millis, offset)
        .map(|date_time| PrimitiveDateTime::new(date_time.date(), date_time.time()))
}

/// Convert a date-time to milliseconds since the Unix epoch.
pub fn to_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / NANOS_PER_MILLI) as i64
}

/// Format a date like "October 5, 2025".
pub fn format_date(date: Date) -> String {
    format!("{} {}, {}", date.month(), date.day(), date.year())
}

/// Format the time of day on a 12-hour clock, e.g. "3:07 PM".
///
/// Hours after midday are shifted down by twelve, earlier hours are printed
/// as is, so midnight prints as "0:00 AM".
pub fn format_time(date_time: PrimitiveDateTime) -> String {
    let hour = date_time.hour();
    let display_hour = if hour > 12 { hour - 12 } else { hour };
    let am_pm = if hour >= 12 { "PM" } else { "AM" };

    format!("{display_hour}:{:02} {am_pm}", date_time.minute())
}

/// Format a timestamp like "2025-10-05 3:07 PM".
pub fn format_date_time(millis: i64, offset: UtcOffset) -> String {
    match local_date_time(millis, offset) {
        Some(date_time) => format!("{} {}", date_time.date(), format_time(date_time)),
        None => "Invalid date".to_owned(),
    }
}

/// Format the date of a timestamp like "October 5, 2025".
pub fn format_timestamp_date(millis: i64, offset: UtcOffset) -> String {
    match local_date_time(millis, offset) {
        Some(date_time) => format_date(date_time.date()),
        None => "Invalid date".to_owned(),
    }
}

/// Whether `millis` is a valid timestamp that is no later than `now`.
pub fn is_valid_date(millis: i64, now: OffsetDateTime) -> bool {
    from_millis(millis, now.offset()).is_some_and(|date_time| date_time <= now)
}

/// Whether `millis` falls on the same local calendar day as `now`.
pub fn is_today(millis: i64, now: OffsetDateTime) -> bool {
    days_before(millis, now) == Some(0)
}

/// Whether `millis` falls on the local calendar day before `now`.
pub fn is_yesterday(millis: i64, now: OffsetDateTime) -> bool {
    days_before(millis, now) == Some(1)
}

/// Describe how long ago `millis` was, e.g. "Yesterday" or "3 weeks ago".
///
/// Months are approximated as 30 days and years as 365 days.
pub fn relative_time_span(millis: i64, now: OffsetDateTime) -> String {
    let Some(days) = days_before(millis, now) else {
        return "Unknown".to_owned();
    };

    match days {
        0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        days if days < 7 => format!("{days} days ago"),
        days if days < 30 => format!("{} weeks ago", days / 7),
        days if days < 365 => format!("{} months ago", days / 30),
        days => format!("{} years ago", days / 365),
    }
}

/// The label used to group transactions by day: "Today", "Yesterday", or the
/// formatted date.
pub fn day_group_label(millis: i64, now: OffsetDateTime) -> String {
    match days_before(millis, now) {
        Some(0) => "Today".to_owned(),
        Some(1) => "Yesterday".to_owned(),
        _ => format_timestamp_date(millis, now.offset()),
    }
}

fn days_before(millis: i64, now: OffsetDateTime) -> Option<i32> {
    let date_time = from_millis(millis, now.offset())?;

    Some(now.date().to_julian_day() - date_time.date().to_julian_day())
}

#[cfg(test)]
mod tests {
    use time::{
        Duration, UtcOffset,
        macros::{date, datetime, offset},
    };

    use super::*;

    fn millis(date_time: OffsetDateTime) -> i64 {
        to_millis(date_time)
    }

    #[test]
    fn round_trips_through_millis() {
        let date_time = datetime!(2025-10-05 15:07:12.345 UTC);

        let converted = from_millis(to_millis(date_time), UtcOffset::UTC);

        assert_eq!(converted, Some(date_time));
    }

    #[test]
    fn out_of_range_timestamp_is_invalid() {
        assert_eq!(from_millis(i64::MAX, UtcOffset::UTC), None);
        assert_eq!(from_millis(i64::MIN, UtcOffset::UTC), None);
    }

    #[test]
    fn local_date_time_applies_offset() {
        let utc = datetime!(2025-10-05 23:30 UTC);

        let local = local_date_time(millis(utc), offset!(+13));

        assert_eq!(local, Some(datetime!(2025-10-06 12:30)));
    }

    #[test]
    fn formats_date_with_full_month_name() {
        assert_eq!(format_date(date!(2025 - 10 - 05)), "October 5, 2025");
    }

    #[test]
    fn formats_time_on_twelve_hour_clock() {
        assert_eq!(format_time(datetime!(2025-10-05 15:07)), "3:07 PM");
        assert_eq!(format_time(datetime!(2025-10-05 12:30)), "12:30 PM");
        assert_eq!(format_time(datetime!(2025-10-05 09:05)), "9:05 AM");
        assert_eq!(format_time(datetime!(2025-10-05 00:05)), "0:05 AM");
    }

    #[test]
    fn formats_date_time() {
        let timestamp = millis(datetime!(2025-10-05 15:07 UTC));

        assert_eq!(
            format_date_time(timestamp, UtcOffset::UTC),
            "2025-10-05 3:07 PM"
        );
        assert_eq!(format_date_time(i64::MAX, UtcOffset::UTC), "Invalid date");
    }

    #[test]
    fn future_date_is_not_valid() {
        let now = datetime!(2025-10-05 12:00 UTC);

        assert!(is_valid_date(millis(now), now));
        assert!(is_valid_date(millis(now - Duration::days(3)), now));
        assert!(!is_valid_date(millis(now + Duration::seconds(1)), now));
        assert!(!is_valid_date(i64::MAX, now));
    }

    #[test]
    fn relative_time_spans() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let ago = |days: i64| millis(now - Duration::days(days));

        assert_eq!(relative_time_span(ago(0), now), "Today");
        assert_eq!(relative_time_span(ago(1), now), "Yesterday");
        assert_eq!(relative_time_span(ago(4), now), "4 days ago");
        assert_eq!(relative_time_span(ago(15), now), "2 weeks ago");
        assert_eq!(relative_time_span(ago(95), now), "3 months ago");
        assert_eq!(relative_time_span(ago(800), now), "2 years ago");
        assert_eq!(relative_time_span(i64::MIN, now), "Unknown");
    }

    #[test]
    fn today_and_yesterday_use_calendar_days() {
        let now = datetime!(2025-10-05 00:10 UTC);
        let late_yesterday = millis(datetime!(2025-10-04 23:50 UTC));

        assert!(is_yesterday(late_yesterday, now));
        assert!(!is_today(late_yesterday, now));
        assert!(is_today(millis(now), now));
    }

    #[test]
    fn day_group_labels() {
        let now = datetime!(2025-10-05 12:00 UTC);

        assert_eq!(day_group_label(millis(now), now), "Today");
        assert_eq!(
            day_group_label(millis(now - Duration::days(1)), now),
            "Yesterday"
        );
        assert_eq!(
            day_group_label(millis(now - Duration::days(10)), now),
            "September 25, 2025"
        );
    }
}
