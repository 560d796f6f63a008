//! Grouping logic for the transaction list.

use serde::Serialize;
use time::OffsetDateTime;

use crate::{datetime::day_group_label, transaction::Transaction};

/// Transactions that share a day label, e.g. "Today" or "October 5, 2025".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    /// The label shown above the group.
    pub label: String,
    /// The transactions in the group, in their original order.
    pub transactions: Vec<&'a Transaction>,
}

/// Group transactions by their day label relative to `now`.
///
/// Groups appear in the order their first transaction appears, and every
/// transaction with the same label lands in the same group even when the
/// input is not sorted by date.
pub fn group_by_day(transactions: &[Transaction], now: OffsetDateTime) -> Vec<DayGroup<'_>> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();

    for transaction in transactions {
        let label = day_group_label(transaction.occurred_at, now);

        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.transactions.push(transaction),
            None => groups.push(DayGroup {
                label,
                transactions: vec![transaction],
            }),
        }
    }

    groups
}
