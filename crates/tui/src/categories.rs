//! Static category lookup used by the form's category selector.

use api_types::transaction::TransactionKind;

const INCOME: &[&str] = &["Salary", "Sales", "Allowance", "Side Hustle"];
const EXPENSE: &[&str] = &["Entertainment", "Groceries", "Subscriptions"];

/// A selectable category: `value` is what gets stored, `label` is what the
/// user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: &'static str,
}

/// Stored form of a label: lowercase with all whitespace removed.
pub fn category_key(label: &str) -> String {
    label
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category choices for a transaction type. Anything that is not an expense
/// gets the income list.
pub fn options_for(kind: &TransactionKind) -> Vec<CategoryOption> {
    let labels = match kind {
        TransactionKind::Expense => EXPENSE,
        _ => INCOME,
    };
    labels
        .iter()
        .map(|label| CategoryOption {
            value: category_key(label),
            label: *label,
        })
        .collect()
}
