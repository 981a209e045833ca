//! Expense records and the payloads used to create or patch them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{category::Category, common::*};
use crate::errors::ExpenseError;

/// A persisted expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub item: String,
    #[serde(default)]
    pub note: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl Expense {
    /// Materializes a validated payload under a freshly assigned identifier.
    pub fn from_new(expense: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: expense.amount,
            category: expense.category,
            item: expense.item,
            note: expense.note,
            date: expense.date,
            created_at,
            raw_text: expense.raw_text,
        }
    }

    /// Checks a record that did not come through [`NewExpense::validate`], e.g. one read from disk.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        validate_amount(self.amount).map_err(|_| {
            ExpenseError::InvalidInput(format!(
                "expense {} has amount {}, expected a positive number",
                self.id, self.amount
            ))
        })
    }

    /// Strips the identity and timestamp, e.g. for re-import into another store.
    pub fn to_new(&self) -> NewExpense {
        NewExpense {
            amount: self.amount,
            category: self.category,
            item: self.item.clone(),
            note: self.note.clone(),
            date: self.date,
            raw_text: self.raw_text.clone(),
        }
    }

    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(item) = patch.item.as_ref() {
            self.item = item.clone();
        }
        if let Some(note) = patch.note.as_ref() {
            self.note = note.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.date, self.item, self.category.info().name)
    }
}

/// Input for a new expense, before the repository assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub note: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl NewExpense {
    pub fn new(amount: f64, category: Category, item: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            category,
            item: item.into(),
            note: String::new(),
            date,
            raw_text: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = Some(raw_text.into());
        self
    }

    pub fn validate(&self) -> Result<(), ExpenseError> {
        validate_amount(self.amount)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.item.is_none()
            && self.note.is_none()
            && self.date.is_none()
    }

    pub fn validate(&self) -> Result<(), ExpenseError> {
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }
}

fn validate_amount(amount: f64) -> Result<(), ExpenseError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ExpenseError::InvalidInput(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ExpenseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ExpenseError::InvalidInput(format!("`{raw}` is not a valid YYYY-MM-DD date")))
}
