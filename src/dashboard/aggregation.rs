//! Spending aggregation for the dashboard chart.
//!
//! Transactions are summed into fixed buckets that depend on the selected
//! [TimeFrame]: hours of today, days of the last week, weeks of the last month,
//! or months of the last year. Every bucket is reported, even when empty.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Weekday};

use crate::{Error, transaction::Transaction};

/// The span of time the spending chart covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    /// 24 hourly buckets for the current day.
    Today,
    /// 7 daily buckets ending today.
    Week,
    /// 4 weekly buckets.
    #[default]
    Month,
    /// 12 monthly buckets ending with the current month.
    Year,
}

impl TimeFrame {
    /// The number of buckets produced for this time frame.
    pub fn bucket_count(self) -> usize {
        match self {
            Self::Today => 24,
            Self::Week => 7,
            Self::Month => 4,
            Self::Year => 12,
        }
    }

    /// The name shown on the time frame selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

impl Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeFrame {
    type Err = Error;

    /// Parse a time frame name, falling back to [TimeFrame::Week] for
    /// unrecognised names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Today" => Self::Today,
            "Month" => Self::Month,
            "Year" => Self::Year,
            _ => Self::Week,
        })
    }
}

/// The total amount in one chart bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPoint {
    /// The sum of the amounts of every transaction in the bucket.
    pub value: f64,
    /// The label shown under the bucket, e.g. "13:00", "MON", "Week 2" or "JAN".
    pub label: String,
    /// The local date-time the bucket starts at.
    pub bucket_start: PrimitiveDateTime,
}

/// Sum transaction amounts into the buckets for `time_frame`.
///
/// Buckets are relative to the local date of `now` and each transaction is
/// converted to `now`'s UTC offset. Income and expenses are both added as
/// positive amounts. Transactions with timestamps that cannot be converted to
/// a date are left out of every bucket.
pub fn spending_by_time_frame(
    transactions: &[Transaction],
    time_frame: TimeFrame,
    now: OffsetDateTime,
) -> Vec<SpendingPoint> {
    let dated: Vec<(PrimitiveDateTime, f64)> = transactions
        .iter()
        .filter_map(|transaction| {
            transaction
                .local_occurred_at(now.offset())
                .map(|date_time| (date_time, transaction.amount))
        })
        .collect();
    let today = now.date();

    match time_frame {
        TimeFrame::Today => hourly_spending(&dated, today),
        TimeFrame::Week => daily_spending(&dated, today),
        TimeFrame::Month => weekly_spending(&dated, today),
        TimeFrame::Year => monthly_spending(&dated, today),
    }
}

fn sum_where(
    dated: &[(PrimitiveDateTime, f64)],
    predicate: impl Fn(PrimitiveDateTime) -> bool,
) -> f64 {
    dated
        .iter()
        .filter(|(date_time, _)| predicate(*date_time))
        .map(|(_, amount)| amount)
        .sum()
}

fn hourly_spending(dated: &[(PrimitiveDateTime, f64)], today: Date) -> Vec<SpendingPoint> {
    (0..24u8)
        .map(|hour| SpendingPoint {
            value: sum_where(dated, |date_time| {
                date_time.date() == today && date_time.hour() == hour
            }),
            label: format!("{hour}:00"),
            bucket_start: today.midnight() + Duration::hours(hour.into()),
        })
        .collect()
}

fn daily_spending(dated: &[(PrimitiveDateTime, f64)], today: Date) -> Vec<SpendingPoint> {
    (0..=6i64)
        .rev()
        .filter_map(|days_ago| {
            let date = today.checked_sub(Duration::days(days_ago))?;

            let label = match days_ago {
                0 => "Today".to_owned(),
                1 => "Yesterday".to_owned(),
                _ => weekday_abbrev(date.weekday()).to_owned(),
            };

            Some(SpendingPoint {
                value: sum_where(dated, |date_time| date_time.date() == date),
                label,
                bucket_start: date.midnight(),
            })
        })
        .collect()
}

fn weekly_spending(dated: &[(PrimitiveDateTime, f64)], today: Date) -> Vec<SpendingPoint> {
    (0..=3i64)
        .rev()
        .filter_map(|weeks_ago| {
            let start = today.checked_sub(Duration::weeks(weeks_ago))?;
            let week = start..=start.checked_add(Duration::days(6))?;

            Some(SpendingPoint {
                value: sum_where(dated, |date_time| week.contains(&date_time.date())),
                label: format!("Week {}", 4 - weeks_ago),
                bucket_start: start.midnight(),
            })
        })
        .collect()
}

fn monthly_spending(dated: &[(PrimitiveDateTime, f64)], today: Date) -> Vec<SpendingPoint> {
    (0..=11u8)
        .rev()
        .filter_map(|months_ago| {
            let date = months_before(today, months_ago)?;
            let month = date.month();

            Some(SpendingPoint {
                value: sum_where(dated, |date_time| date_time.month() == month),
                label: month_abbrev(month).to_owned(),
                bucket_start: date.midnight(),
            })
        })
        .collect()
}

/// Go back `months` calendar months from `date`, clamping the day to the
/// length of the target month, e.g. March 31 minus one month is February 28.
fn months_before(date: Date, months: u8) -> Option<Date> {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).ok()
}

/// Returns the last day number in the given month (28-31).
pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if time::util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "MON",
        Weekday::Tuesday => "TUE",
        Weekday::Wednesday => "WED",
        Weekday::Thursday => "THU",
        Weekday::Friday => "FRI",
        Weekday::Saturday => "SAT",
        Weekday::Sunday => "SUN",
    }
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "JAN",
        Month::February => "FEB",
        Month::March => "MAR",
        Month::April => "APR",
        Month::May => "MAY",
        Month::June => "JUN",
        Month::July => "JUL",
        Month::August => "AUG",
        Month::September => "SEP",
        Month::October => "OCT",
        Month::November => "NOV",
        Month::December => "DEC",
    }
}

#[cfg(test)]
mod tests {
    use time::{
        Duration, Month, OffsetDateTime,
        macros::{date, datetime, offset},
    };

    use crate::{
        datetime::to_millis,
        transaction::{Transaction, TransactionType},
    };

    use super::{TimeFrame, last_day_of_month, months_before, spending_by_time_frame};

    fn create_test_transaction(amount: f64, occurred_at: OffsetDateTime) -> Transaction {
        create_test_transaction_at_millis(amount, to_millis(occurred_at))
    }

    fn create_test_transaction_at_millis(amount: f64, occurred_at: i64) -> Transaction {
        Transaction {
            id: 1,
            title: "Test".to_owned(),
            amount,
            category: "Food".to_owned(),
            kind: TransactionType::Expense,
            occurred_at,
            created_at: occurred_at,
            tax: 0.0,
        }
    }

    fn values(
        transactions: &[Transaction],
        time_frame: TimeFrame,
        now: OffsetDateTime,
    ) -> Vec<f64> {
        spending_by_time_frame(transactions, time_frame, now)
            .iter()
            .map(|point| point.value)
            .collect()
    }

    #[test]
    fn produces_fixed_bucket_counts_for_empty_input() {
        let now = datetime!(2025-10-05 12:00 UTC);

        for time_frame in [
            TimeFrame::Today,
            TimeFrame::Week,
            TimeFrame::Month,
            TimeFrame::Year,
        ] {
            let points = spending_by_time_frame(&[], time_frame, now);

            assert_eq!(points.len(), time_frame.bucket_count());
            assert!(points.iter().all(|point| point.value == 0.0));
        }
    }

    #[test]
    fn today_sums_by_hour() {
        let now = datetime!(2025-10-05 15:30 UTC);
        let transactions = vec![
            create_test_transaction(5.0, datetime!(2025-10-05 09:15 UTC)),
            create_test_transaction(2.5, datetime!(2025-10-05 09:45 UTC)),
            create_test_transaction(10.0, datetime!(2025-10-05 15:00 UTC)),
            create_test_transaction(99.0, datetime!(2025-10-04 09:15 UTC)),
        ];

        let points = spending_by_time_frame(&transactions, TimeFrame::Today, now);

        assert_eq!(points[9].value, 7.5);
        assert_eq!(points[15].value, 10.0);
        assert_eq!(points.iter().map(|point| point.value).sum::<f64>(), 17.5);
        assert_eq!(points[0].label, "0:00");
        assert_eq!(points[13].label, "13:00");
        assert_eq!(points[13].bucket_start, datetime!(2025-10-05 13:00));
    }

    #[test]
    fn week_labels_count_back_from_today() {
        // 2025-10-05 is a Sunday.
        let now = datetime!(2025-10-05 12:00 UTC);

        let points = spending_by_time_frame(&[], TimeFrame::Week, now);

        let labels: Vec<_> = points.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["MON", "TUE", "WED", "THU", "FRI", "Yesterday", "Today"]
        );
        assert_eq!(points[0].bucket_start, datetime!(2025-09-29 00:00));
    }

    #[test]
    fn week_sums_only_the_last_seven_days() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let transactions = vec![
            create_test_transaction(1.0, now),
            create_test_transaction(2.0, now - Duration::days(1)),
            create_test_transaction(4.0, now - Duration::days(6)),
            create_test_transaction(8.0, now - Duration::days(7)),
        ];

        assert_eq!(
            values(&transactions, TimeFrame::Week, now),
            vec![4.0, 0.0, 0.0, 0.0, 0.0, 2.0, 1.0]
        );
    }

    #[test]
    fn month_buckets_are_week_windows() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let transactions = vec![
            create_test_transaction(1.0, now),
            create_test_transaction(2.0, now - Duration::days(7)),
            create_test_transaction(4.0, now - Duration::days(21)),
            create_test_transaction(8.0, now - Duration::days(22)),
        ];

        let points = spending_by_time_frame(&transactions, TimeFrame::Month, now);

        let labels: Vec<_> = points.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
        let values: Vec<_> = points.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![4.0, 0.0, 2.0, 1.0]);
        assert_eq!(points[0].bucket_start, datetime!(2025-09-14 00:00));
    }

    #[test]
    fn year_matches_month_ignoring_year() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let transactions = vec![
            create_test_transaction(1.0, datetime!(2025-10-01 08:00 UTC)),
            create_test_transaction(2.0, datetime!(2024-10-20 08:00 UTC)),
            create_test_transaction(4.0, datetime!(2025-01-15 08:00 UTC)),
        ];

        let points = spending_by_time_frame(&transactions, TimeFrame::Year, now);

        let labels: Vec<_> = points.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "NOV", "DEC", "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT"
            ]
        );
        assert_eq!(points[11].value, 3.0);
        assert_eq!(points[2].value, 4.0);
        assert_eq!(points[0].bucket_start, datetime!(2024-11-05 00:00));
    }

    #[test]
    fn income_and_expenses_are_both_added() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let mut salary = create_test_transaction(2000.0, now);
        salary.kind = TransactionType::Income;
        let transactions = vec![salary, create_test_transaction(5.0, now)];

        let points = spending_by_time_frame(&transactions, TimeFrame::Week, now);

        assert_eq!(points[6].value, 2005.0);
    }

    #[test]
    fn unconvertible_timestamps_are_skipped() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let transactions = vec![
            create_test_transaction_at_millis(50.0, i64::MAX),
            create_test_transaction(5.0, now),
        ];

        for time_frame in [
            TimeFrame::Today,
            TimeFrame::Week,
            TimeFrame::Month,
            TimeFrame::Year,
        ] {
            let total: f64 = values(&transactions, time_frame, now).iter().sum();

            assert_eq!(total, 5.0, "{time_frame} should skip invalid timestamps");
        }
    }

    #[test]
    fn buckets_use_local_offset() {
        let now = datetime!(2025-10-05 09:00 +13);
        // 2025-10-04 22:30 UTC is 2025-10-05 11:30 in UTC+13.
        let transaction = create_test_transaction(5.0, datetime!(2025-10-04 22:30 UTC));

        let points = spending_by_time_frame(&[transaction], TimeFrame::Today, now);

        assert_eq!(points[11].value, 5.0);
        assert_eq!(now.offset(), offset!(+13));
    }

    #[test]
    fn aggregation_is_repeatable() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let transactions = vec![create_test_transaction(5.0, now)];

        assert_eq!(
            spending_by_time_frame(&transactions, TimeFrame::Month, now),
            spending_by_time_frame(&transactions, TimeFrame::Month, now)
        );
    }

    #[test]
    fn months_before_clamps_day() {
        let cases = [
            (date!(2025 - 03 - 31), 1, date!(2025 - 02 - 28)),
            (date!(2024 - 03 - 31), 1, date!(2024 - 02 - 29)),
            (date!(2025 - 01 - 15), 11, date!(2024 - 02 - 15)),
            (date!(2025 - 10 - 05), 0, date!(2025 - 10 - 05)),
        ];

        for (date, months, expected) in cases {
            assert_eq!(months_before(date, months), Some(expected));
        }
    }

    #[test]
    fn last_day_of_february_depends_on_leap_year() {
        assert_eq!(last_day_of_month(2024, Month::February), 29);
        assert_eq!(last_day_of_month(2025, Month::February), 28);
        assert_eq!(last_day_of_month(2025, Month::April), 30);
    }

    #[test]
    fn parses_time_frame_names() {
        assert_eq!("Today".parse(), Ok(TimeFrame::Today));
        assert_eq!("Month".parse(), Ok(TimeFrame::Month));
        assert_eq!("Year".parse(), Ok(TimeFrame::Year));
        assert_eq!("Decade".parse(), Ok(TimeFrame::Week));
        assert_eq!(TimeFrame::default(), TimeFrame::Month);
    }
}
