//! Filtering for the transaction list on the home screen.
//!
//! Only one of the search, category, type and date range filters applies at a
//! time, in that order of precedence. The result is then always narrowed to
//! the selected month.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::{Date, Month, Time};

use crate::{
    Error,
    dashboard::aggregation::last_day_of_month,
    datetime::to_millis,
    stores::TransactionStore,
    transaction::{Transaction, TransactionType},
};

/// The filters the user has chosen for the transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Text to look for in transaction titles and categories. Blank means no search.
    pub search_query: String,
    /// Only show transactions in this category.
    pub selected_category: Option<String>,
    /// Only show transactions of this type.
    pub selected_type: Option<TransactionType>,
    /// Only show transactions between these times (inclusive), in milliseconds
    /// since the Unix epoch.
    pub date_range: Option<(i64, i64)>,
    /// The month of the current year the list is narrowed to.
    pub selected_month: Month,
}

impl FilterCriteria {
    /// No filters, narrowed to `selected_month`.
    pub fn new(selected_month: Month) -> Self {
        Self {
            search_query: String::new(),
            selected_category: None,
            selected_type: None,
            date_range: None,
            selected_month,
        }
    }

    /// Remove the search, category, type and date range filters.
    ///
    /// The selected month is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.selected_month);
    }

    /// The filter that takes precedence over the others.
    pub fn active_filter(&self) -> ActiveFilter<'_> {
        if !self.search_query.trim().is_empty() {
            ActiveFilter::Search(&self.search_query)
        } else if let Some(category) = &self.selected_category {
            ActiveFilter::Category(category)
        } else if let Some(kind) = self.selected_type {
            ActiveFilter::Type(kind)
        } else if let Some((start, end)) = self.date_range {
            ActiveFilter::DateRange(start..=end)
        } else {
            ActiveFilter::All
        }
    }

    /// Apply the active filter to `transactions` and keep those in the
    /// selected month of `year`, preserving their order.
    pub fn apply(&self, transactions: &[Transaction], year: i32) -> Vec<Transaction> {
        let filter = self.active_filter();
        let Some(month) = month_bounds(self.selected_month, year) else {
            return Vec::new();
        };

        transactions
            .iter()
            .filter(|transaction| filter.matches(transaction))
            .filter(|transaction| month.contains(&transaction.occurred_at))
            .cloned()
            .collect()
    }
}

/// The single filter picked by [FilterCriteria::active_filter].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveFilter<'a> {
    /// Title or category contains the text, ignoring ASCII case.
    Search(&'a str),
    /// Category equals the name exactly.
    Category(&'a str),
    /// Type equals the given type.
    Type(TransactionType),
    /// Occurred within the range of milliseconds since the Unix epoch.
    DateRange(RangeInclusive<i64>),
    /// Every transaction.
    All,
}

impl ActiveFilter<'_> {
    /// Whether `transaction` passes the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Self::Search(text) => {
                contains_ignore_ascii_case(&transaction.title, text)
                    || contains_ignore_ascii_case(&transaction.category, text)
            }
            Self::Category(category) => transaction.category == *category,
            Self::Type(kind) => transaction.kind == *kind,
            Self::DateRange(range) => range.contains(&transaction.occurred_at),
            Self::All => true,
        }
    }

    /// Fetch the transactions that pass the filter from `store`.
    ///
    /// # Errors
    /// Returns any error from the store.
    pub fn fetch(&self, store: &impl TransactionStore) -> Result<Vec<Transaction>, Error> {
        match self {
            Self::Search(text) => store.search(text),
            Self::Category(category) => store.filter_by_category(category),
            Self::Type(kind) => store.filter_by_type(*kind),
            Self::DateRange(range) => store.filter_by_date_range(*range.start(), *range.end()),
            Self::All => store.get_all(),
        }
    }
}

/// The first and last instants of `month` in `year` in UTC, in milliseconds
/// since the Unix epoch.
///
/// The month ends at 23:59:59 on its last day, so the final second is
/// excluded. Returns `None` if `year` is out of range.
pub fn month_bounds(month: Month, year: i32) -> Option<RangeInclusive<i64>> {
    let first_day = Date::from_calendar_date(year, month, 1).ok()?;
    let last_day = Date::from_calendar_date(year, month, last_day_of_month(year, month)).ok()?;
    let end_of_day = Time::from_hms(23, 59, 59).ok()?;

    let start = to_millis(first_day.midnight().assume_utc());
    let end = to_millis(last_day.with_time(end_of_day).assume_utc());

    Some(start..=end)
}

/// Income, expense and balance totals for a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl Totals {
    /// Sum the income and expenses in `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut totals = Self::default();

        for transaction in transactions {
            match transaction.kind {
                TransactionType::Income => totals.income += transaction.amount,
                TransactionType::Expense => totals.expenses += transaction.amount,
            }
        }

        totals.balance = totals.income - totals.expenses;
        totals
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::{
        datetime::to_millis,
        transaction::{Transaction, TransactionType},
    };

    use super::{ActiveFilter, FilterCriteria, Totals, month_bounds};

    fn transaction(
        id: i64,
        title: &str,
        category: &str,
        kind: TransactionType,
        occurred_at: i64,
    ) -> Transaction {
        Transaction {
            id,
            title: title.to_owned(),
            amount: 10.0,
            category: category.to_owned(),
            kind,
            occurred_at,
            created_at: occurred_at,
            tax: 0.0,
        }
    }

    fn october() -> i64 {
        to_millis(datetime!(2025-10-05 12:00 UTC))
    }

    fn ids(transactions: &[Transaction]) -> Vec<i64> {
        transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect()
    }

    #[test]
    fn no_filters_is_all() {
        let criteria = FilterCriteria::new(Month::October);

        assert_eq!(criteria.active_filter(), ActiveFilter::All);
    }

    #[test]
    fn search_takes_precedence_over_category() {
        let mut criteria = FilterCriteria::new(Month::October);
        criteria.search_query = "food".to_owned();
        criteria.selected_category = Some("Shopping".to_owned());
        criteria.selected_type = Some(TransactionType::Income);
        let transactions = vec![
            transaction(1, "Coffee", "Food", TransactionType::Expense, october()),
            transaction(2, "Shoes", "Shopping", TransactionType::Expense, october()),
        ];

        let filtered = criteria.apply(&transactions, 2025);

        assert_eq!(criteria.active_filter(), ActiveFilter::Search("food"));
        assert_eq!(ids(&filtered), vec![1]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut criteria = FilterCriteria::new(Month::October);
        criteria.search_query = "   ".to_owned();
        criteria.selected_category = Some("Food".to_owned());

        assert_eq!(criteria.active_filter(), ActiveFilter::Category("Food"));
    }

    #[test]
    fn category_takes_precedence_over_type_and_date_range() {
        let mut criteria = FilterCriteria::new(Month::October);
        criteria.selected_category = Some("Food".to_owned());
        criteria.selected_type = Some(TransactionType::Income);
        criteria.date_range = Some((0, 1));

        assert_eq!(criteria.active_filter(), ActiveFilter::Category("Food"));

        criteria.selected_category = None;
        assert_eq!(
            criteria.active_filter(),
            ActiveFilter::Type(TransactionType::Income)
        );

        criteria.selected_type = None;
        assert_eq!(criteria.active_filter(), ActiveFilter::DateRange(0..=1));
    }

    #[test]
    fn category_match_is_exact() {
        let filter = ActiveFilter::Category("Food");
        let food = transaction(1, "Coffee", "Food", TransactionType::Expense, 0);
        let lowercase_food = transaction(2, "Coffee", "food", TransactionType::Expense, 0);

        assert!(filter.matches(&food));
        assert!(!filter.matches(&lowercase_food));
    }

    #[test]
    fn search_matches_title_or_category_ignoring_case() {
        let filter = ActiveFilter::Search("COF");
        let by_title = transaction(1, "Coffee", "Food", TransactionType::Expense, 0);
        let by_category = transaction(2, "Beans", "Coffee", TransactionType::Expense, 0);
        let neither = transaction(3, "Tea", "Food", TransactionType::Expense, 0);

        assert!(filter.matches(&by_title));
        assert!(filter.matches(&by_category));
        assert!(!filter.matches(&neither));
    }

    #[test]
    fn date_range_is_inclusive() {
        let filter = ActiveFilter::DateRange(10..=20);

        for (occurred_at, expected) in [(9, false), (10, true), (20, true), (21, false)] {
            let candidate = transaction(1, "A", "B", TransactionType::Expense, occurred_at);

            assert_eq!(
                filter.matches(&candidate),
                expected,
                "occurred_at = {occurred_at}"
            );
        }
    }

    #[test]
    fn apply_narrows_to_selected_month() {
        let criteria = FilterCriteria::new(Month::October);
        let september = to_millis(datetime!(2025-09-30 23:59 UTC));
        let last_year = to_millis(datetime!(2024-10-05 12:00 UTC));
        let transactions = vec![
            transaction(1, "Coffee", "Food", TransactionType::Expense, october()),
            transaction(2, "Coffee", "Food", TransactionType::Expense, september),
            transaction(3, "Coffee", "Food", TransactionType::Expense, last_year),
            transaction(4, "Coffee", "Food", TransactionType::Expense, i64::MAX),
        ];

        assert_eq!(ids(&criteria.apply(&transactions, 2025)), vec![1]);
    }

    #[test]
    fn category_outside_selected_month_shows_nothing() {
        let mut criteria = FilterCriteria::new(Month::November);
        criteria.selected_category = Some("Food".to_owned());
        let coffee = transaction(1, "Coffee", "Food", TransactionType::Expense, october());

        assert!(criteria.apply(&[coffee], 2025).is_empty());
    }

    #[test]
    fn clear_keeps_selected_month() {
        let mut criteria = FilterCriteria::new(Month::March);
        criteria.search_query = "coffee".to_owned();
        criteria.selected_category = Some("Food".to_owned());
        criteria.selected_type = Some(TransactionType::Expense);
        criteria.date_range = Some((0, 1));

        criteria.clear();

        assert_eq!(criteria, FilterCriteria::new(Month::March));
    }

    #[test]
    fn month_bounds_cover_whole_seconds_of_month() {
        let bounds = month_bounds(Month::February, 2024).unwrap();

        assert_eq!(*bounds.start(), to_millis(datetime!(2024-02-01 00:00 UTC)));
        assert_eq!(*bounds.end(), to_millis(datetime!(2024-02-29 23:59:59 UTC)));
        assert!(!bounds.contains(&to_millis(datetime!(2024-02-29 23:59:59.500 UTC))));
    }

    #[test]
    fn totals_split_income_and_expenses() {
        let mut salary = transaction(1, "Salary", "Salary", TransactionType::Income, 0);
        salary.amount = 2000.0;
        let mut coffee = transaction(2, "Coffee", "Food", TransactionType::Expense, 0);
        coffee.amount = 5.0;

        let totals = Totals::from_transactions(&[salary, coffee]);

        assert_eq!(
            totals,
            Totals {
                income: 2000.0,
                expenses: 5.0,
                balance: 1995.0,
            }
        );
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(Totals::from_transactions(&[]), Totals::default());
    }
}
