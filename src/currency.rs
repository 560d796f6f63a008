//! Formatting money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::transaction::Transaction;

/// Format `number` as dollars with two decimal places, e.g. "$12.50" or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = |prefix: &str| {
        Formatter::currency(prefix)
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    };

    let (formatter, magnitude, prefix) = if number < 0.0 {
        (NEGATIVE_FMT.get_or_init(|| formatter("-$")), -number, "-$")
    } else if number > 0.0 {
        (POSITIVE_FMT.get_or_init(|| formatter("$")), number, "$")
    } else {
        // numfmt renders zero as "0"
        return "$0.00".to_owned();
    };

    let formatted = match formatter {
        Some(formatter) => formatter.fmt_string(magnitude),
        None => format!("{prefix}{magnitude:.2}"),
    };

    pad_cents(formatted)
}

/// Format a transaction amount with its direction, e.g. "+ $2,000.00" for
/// income or "- $5.00" for an expense.
pub fn format_amount(transaction: &Transaction) -> String {
    let sign = if transaction.is_income() { '+' } else { '-' };

    format!("{sign} {}", format_currency(transaction.amount))
}

// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3".
fn pad_cents(mut formatted: String) -> String {
    let decimals = match formatted.rfind('.') {
        Some(point) => formatted.len() - point - 1,
        None => {
            formatted.push('.');
            0
        }
    };

    for _ in decimals..2 {
        formatted.push('0');
    }

    formatted
}

#[cfg(test)]
mod tests {
    use crate::transaction::{Transaction, TransactionType};

    use super::{format_amount, format_currency, pad_cents};

    fn transaction(amount: f64, kind: TransactionType) -> Transaction {
        Transaction {
            id: 1,
            title: "Coffee".to_owned(),
            amount,
            category: "Food".to_owned(),
            kind,
            occurred_at: 0,
            created_at: 0,
            tax: 0.0,
        }
    }

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(0.99), "$0.99");
        assert_eq!(format_currency(-3.0), "-$3.00");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn pads_missing_cents() {
        assert_eq!(pad_cents("$12".to_owned()), "$12.00");
        assert_eq!(pad_cents("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_cents("$12.34".to_owned()), "$12.34");
    }

    #[test]
    fn amount_shows_direction() {
        assert_eq!(
            format_amount(&transaction(5.0, TransactionType::Expense)),
            "- $5.00"
        );
        assert_eq!(
            format_amount(&transaction(20.5, TransactionType::Income)),
            "+ $20.50"
        );
    }
}
