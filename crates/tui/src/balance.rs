use std::fmt;

use api_types::transaction::{Amount, Transaction, TransactionKind};
use rust_decimal::{Decimal, RoundingStrategy};

/// Signed running balance of a transaction sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Balance {
    Exact(Decimal),
    /// Some amount, or the running total, left the range of [`Decimal`].
    Approximate(f64),
}

impl Balance {
    pub const ZERO: Balance = Balance::Exact(Decimal::ZERO);

    /// Income adds, expense subtracts, everything else contributes 0.
    /// Non-numeric amounts count as 0.
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let signed: Vec<(bool, &Amount)> = transactions
            .into_iter()
            .filter_map(|tx| match tx.kind {
                TransactionKind::Income => Some((false, &tx.amount)),
                TransactionKind::Expense => Some((true, &tx.amount)),
                TransactionKind::Missing | TransactionKind::Unknown(_) => None,
            })
            .collect();

        let exact = signed
            .iter()
            .try_fold(Decimal::ZERO, |total, &(expense, amount)| {
                let value = match amount.value() {
                    Some(value) => value,
                    None if amount.number().is_none() => Decimal::ZERO,
                    None => return None,
                };
                if expense {
                    total.checked_sub(value)
                } else {
                    total.checked_add(value)
                }
            });
        if let Some(total) = exact {
            return Self::Exact(total);
        }

        tracing::debug!("balance out of decimal range, summing as f64");
        let total = signed
            .iter()
            .map(|&(expense, amount)| {
                let value = amount.number().unwrap_or_default();
                if expense { -value } else { value }
            })
            .sum();
        Self::Approximate(total)
    }

    /// The total when it is exactly representable.
    pub fn exact(self) -> Option<Decimal> {
        match self {
            Self::Exact(total) => Some(total),
            Self::Approximate(_) => None,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Self::Exact(total) => total < Decimal::ZERO,
            Self::Approximate(total) => total < 0.0,
        }
    }
}

impl fmt::Display for Balance {
    /// Fixed to two decimals, half away from zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(total) => {
                let rounded =
                    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                write!(f, "{rounded:.2}")
            }
            Self::Approximate(total) => write!(f, "{total:.2}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: TransactionKind, amount: Amount) -> Transaction {
        Transaction {
            id: "x".into(),
            kind,
            category: String::new(),
            amount,
            date: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_sequence_is_zero() {
        let balance = Balance::of(std::iter::empty());
        assert_eq!(balance, Balance::ZERO);
        assert_eq!(balance.to_string(), "0.00");
        assert!(!balance.is_negative());
    }

    #[test]
    fn income_adds_and_expense_subtracts() {
        let mut items = vec![tx(TransactionKind::Income, Amount::Number(100.0))];
        let base = Balance::of(&items);
        assert_eq!(base.to_string(), "100.00");

        items.push(tx(TransactionKind::Expense, Amount::Number(30.0)));
        let after = Balance::of(&items);
        assert_eq!(after.exact(), base.exact().map(|total| total - Decimal::from(30)));
        assert_eq!(after.to_string(), "70.00");
    }

    #[test]
    fn unknown_types_and_bad_amounts_contribute_nothing() {
        let items = vec![
            tx(TransactionKind::Income, Amount::Number(10.0)),
            tx(TransactionKind::Unknown("transfer".into()), Amount::Number(99.0)),
            tx(TransactionKind::Missing, Amount::Number(5.0)),
            tx(TransactionKind::Expense, Amount::Text("n/a".into())),
            tx(TransactionKind::Expense, Amount::Missing),
        ];
        assert_eq!(Balance::of(&items).to_string(), "10.00");
    }

    #[test]
    fn numeric_strings_are_counted() {
        let items = vec![tx(TransactionKind::Income, Amount::Text(" 12.5 ".into()))];
        assert_eq!(Balance::of(&items).to_string(), "12.50");
    }

    #[test]
    fn negative_balance_is_flagged() {
        let items = vec![
            tx(TransactionKind::Income, Amount::Number(10.0)),
            tx(TransactionKind::Expense, Amount::Text("10.005".into())),
        ];
        let balance = Balance::of(&items);
        assert!(balance.is_negative());
        assert_eq!(balance.to_string(), "-0.01");
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let items = vec![
            tx(TransactionKind::Income, Amount::Number(0.1)),
            tx(TransactionKind::Income, Amount::Number(0.2)),
        ];
        assert_eq!(Balance::of(&items).exact(), Some(Decimal::new(3, 1)));
    }

    #[test]
    fn text_amounts_count_their_leading_number() {
        let items = vec![
            tx(TransactionKind::Income, Amount::Text("12abc".into())),
            tx(TransactionKind::Expense, Amount::Text("2.5 eur".into())),
            tx(TransactionKind::Income, Amount::Text("abc12".into())),
        ];
        assert_eq!(Balance::of(&items).to_string(), "9.50");
    }

    #[test]
    fn huge_amounts_fall_back_to_float_sum() {
        let mut items = vec![tx(TransactionKind::Income, Amount::Number(10.0))];
        let base = Balance::of(&items);

        items.push(tx(TransactionKind::Income, Amount::Number(1e29)));
        let balance = Balance::of(&items);
        assert_eq!(balance, Balance::Approximate(10.0 + 1e29));
        assert!(balance.exact().is_none());
        assert!(!balance.is_negative());
        assert_eq!(base, Balance::Exact(Decimal::from(10)));

        items.push(tx(TransactionKind::Expense, Amount::Text("3e29".into())));
        assert!(Balance::of(&items).is_negative());
    }

    #[test]
    fn overflowing_total_falls_back_to_float_sum() {
        let items = vec![
            tx(TransactionKind::Income, Amount::Number(7e28)),
            tx(TransactionKind::Income, Amount::Number(7e28)),
        ];
        assert_eq!(Balance::of(&items), Balance::Approximate(1.4e29));
    }
}
