pub mod json_backend;
pub mod memory;
pub mod session;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::period::PeriodRange,
    domain::{Expense, ExpensePatch, NewExpense},
    errors::ExpenseError,
};

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Abstraction over the stores that can hold expense records.
///
/// Range queries are inclusive on both ends. Result order is newest date first,
/// though analytics callers must not rely on it.
pub trait ExpenseRepository: Send + Sync {
    fn add(&self, expense: NewExpense) -> Result<Uuid>;
    /// Inserts every record under a fresh id, returning how many were written.
    fn insert_many(&self, expenses: Vec<NewExpense>) -> Result<usize>;
    fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<Expense>>;
    fn fetch_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;
    fn fetch_all(&self) -> Result<Vec<Expense>>;
    fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<()>;
    fn delete(&self, id: Uuid) -> Result<()>;
    /// Removes every record, returning how many were dropped.
    fn clear_all(&self) -> Result<usize>;

    fn fetch_range(&self, range: &PeriodRange) -> Result<Vec<Expense>> {
        self.fetch_by_range(range.start, range.end)
    }

    /// Pretty JSON array of every stored record.
    fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fetch_all()?)?)
    }

    /// Bulk-inserts an exported JSON array. Source ids and timestamps are discarded.
    fn import_json(&self, json: &str) -> Result<usize> {
        let records: Vec<NewExpense> = serde_json::from_str(json)?;
        self.insert_many(records)
    }
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(ExpenseError::InvalidInput(format!(
            "range end {end} is before start {start}"
        )));
    }
    Ok(())
}

/// Newest date first; records sharing a date keep insertion order.
pub(crate) fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}

pub use json_backend::JsonExpenseStore;
pub use memory::MemoryExpenseStore;
pub use session::{migrate_local_to_user, Identity, Session, UserId};
