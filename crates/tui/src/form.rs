//! Create/edit form state.
//!
//! The form is in Edit mode exactly when it holds an edit target; a
//! successful submit or an explicit reset drops it back to Create.

use api_types::transaction::{Amount, Transaction, TransactionDraft, TransactionId, TransactionKind};
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::categories::{self, CategoryOption};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Amount is required.")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("No category selected.")]
    MissingCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Category,
    Amount,
    Description,
}

impl FormField {
    pub fn is_text(self) -> bool {
        matches!(self, Self::Amount | Self::Description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TransactionId),
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: TransactionKind,
    pub categories: Vec<CategoryOption>,
    pub category: usize,
    pub amount: String,
    pub description: String,
    pub editing: Option<TransactionId>,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let kind = TransactionKind::Income;
        Self {
            categories: categories::options_for(&kind),
            kind,
            category: 0,
            amount: String::new(),
            description: String::new(),
            editing: None,
            error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        match &self.editing {
            Some(id) => FormMode::Edit(id.clone()),
            None => FormMode::Create,
        }
    }

    /// Changes the type and repopulates the category choices.
    pub fn set_kind(&mut self, kind: TransactionKind) {
        let kind = match kind {
            TransactionKind::Expense => TransactionKind::Expense,
            _ => TransactionKind::Income,
        };
        self.categories = categories::options_for(&kind);
        self.category = 0;
        self.kind = kind;
    }

    /// The type the Type field switches to next.
    pub fn next_kind(&self) -> TransactionKind {
        match self.kind {
            TransactionKind::Income => TransactionKind::Expense,
            _ => TransactionKind::Income,
        }
    }

    pub fn next_category(&mut self) {
        if !self.categories.is_empty() {
            self.category = (self.category + 1) % self.categories.len();
        }
    }

    pub fn prev_category(&mut self) {
        if !self.categories.is_empty() {
            self.category = (self.category + self.categories.len() - 1) % self.categories.len();
        }
    }

    pub fn selected_category(&self) -> Option<&CategoryOption> {
        self.categories.get(self.category)
    }

    pub fn input_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Amount => Some(&mut self.amount),
            FormField::Description => Some(&mut self.description),
            FormField::Type | FormField::Category => None,
        }
    }

    /// Back to Create mode with default type and empty inputs.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Loads an existing transaction and targets it for update.
    pub fn populate(&mut self, tx: &Transaction) {
        self.set_kind(tx.kind.clone());
        let stored = categories::category_key(&tx.category);
        self.category = self
            .categories
            .iter()
            .position(|option| option.value == stored)
            .unwrap_or(0);
        self.amount = tx.amount.to_string();
        self.description = tx.description.clone();
        self.editing = Some(tx.id.clone());
        self.error = None;
    }

    /// Builds the request body. The date is always `now`, for edits too.
    pub fn draft(&self, now: DateTime<Utc>) -> Result<TransactionDraft, FormError> {
        let amount = parse_amount(&self.amount)?;
        let category = self
            .selected_category()
            .ok_or(FormError::MissingCategory)?
            .value
            .clone();

        Ok(TransactionDraft {
            kind: self.kind.clone(),
            category,
            amount: Amount::Number(amount),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            description: self.description.clone(),
        })
    }
}

/// Accepts `.` or `,` as decimal separator.
fn parse_amount(input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingAmount);
    }
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::InvalidAmount(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
    }

    fn existing() -> Transaction {
        Transaction {
            id: "7".into(),
            kind: TransactionKind::Expense,
            category: "groceries".to_string(),
            amount: Amount::Number(42.5),
            date: "2023-01-01T00:00:00Z".to_string(),
            description: "market".to_string(),
        }
    }

    #[test]
    fn starts_in_create_mode_with_income_categories() {
        let form = FormState::new();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.kind, TransactionKind::Income);
        assert_eq!(form.selected_category().unwrap().label, "Salary");
    }

    #[test]
    fn changing_type_repopulates_categories() {
        let mut form = FormState::new();
        form.next_category();
        form.set_kind(form.next_kind());
        assert_eq!(form.kind, TransactionKind::Expense);
        assert_eq!(form.next_kind(), TransactionKind::Income);
        assert_eq!(form.category, 0);
        assert_eq!(form.selected_category().unwrap().value, "entertainment");
    }

    #[test]
    fn category_cycling_wraps() {
        let mut form = FormState::new();
        form.prev_category();
        assert_eq!(form.selected_category().unwrap().label, "Side Hustle");
        form.next_category();
        assert_eq!(form.selected_category().unwrap().label, "Salary");
    }

    #[test]
    fn draft_uses_category_value_and_current_time() {
        let mut form = FormState::new();
        form.next_category();
        form.next_category();
        form.next_category();
        form.amount = "12,50".to_string();
        form.description = "gig".to_string();

        let draft = form.draft(now()).unwrap();
        assert_eq!(draft.kind, TransactionKind::Income);
        assert_eq!(draft.category, "sidehustle");
        assert_eq!(draft.amount, Amount::Number(12.5));
        assert_eq!(draft.date, "2024-05-01T10:30:00.000Z");
        assert_eq!(draft.description, "gig");
    }

    #[test]
    fn draft_rejects_bad_amounts() {
        let mut form = FormState::new();
        assert_eq!(form.draft(now()), Err(FormError::MissingAmount));
        form.amount = "ten".to_string();
        assert_eq!(
            form.draft(now()),
            Err(FormError::InvalidAmount("ten".to_string()))
        );
        form.amount = "inf".to_string();
        assert!(form.draft(now()).is_err());
    }

    #[test]
    fn populate_enters_edit_mode() {
        let mut form = FormState::new();
        form.populate(&existing());
        assert_eq!(form.mode(), FormMode::Edit("7".into()));
        assert_eq!(form.kind, TransactionKind::Expense);
        assert_eq!(form.selected_category().unwrap().label, "Groceries");
        assert_eq!(form.amount, "42.5");
        assert_eq!(form.description, "market");
    }

    #[test]
    fn edit_draft_does_not_keep_original_date() {
        let mut form = FormState::new();
        form.populate(&existing());
        let draft = form.draft(now()).unwrap();
        assert_eq!(draft.date, "2024-05-01T10:30:00.000Z");
    }

    #[test]
    fn populate_with_unknown_values_falls_back() {
        let mut tx = existing();
        tx.kind = TransactionKind::Unknown("transfer".to_string());
        tx.category = "Side Hustle".to_string();
        let mut form = FormState::new();
        form.populate(&tx);
        assert_eq!(form.kind, TransactionKind::Income);
        assert_eq!(form.selected_category().unwrap().value, "sidehustle");

        tx.category = "rent".to_string();
        form.populate(&tx);
        assert_eq!(form.category, 0);
    }

    #[test]
    fn reset_returns_to_create_mode() {
        let mut form = FormState::new();
        form.populate(&existing());
        form.reset();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.kind, TransactionKind::Income);
        assert!(form.amount.is_empty());
        assert!(form.description.is_empty());
    }
}
