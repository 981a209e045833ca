use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    domain::{Expense, ExpensePatch, NewExpense},
    errors::ExpenseError,
};

use super::{check_range, sort_newest_first, ExpenseRepository, Result};

/// In-process store. Suitable as a per-user stand-in and for tests.
#[derive(Default)]
pub struct MemoryExpenseStore {
    expenses: RwLock<Vec<Expense>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, rejecting any with a non-positive amount.
    pub fn with_records(expenses: Vec<Expense>) -> Result<Self> {
        for expense in &expenses {
            expense.validate()?;
        }
        Ok(Self {
            expenses: RwLock::new(expenses),
        })
    }

    pub fn len(&self) -> usize {
        self.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Expense>>> {
        self.expenses
            .read()
            .map_err(|_| ExpenseError::Storage("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Expense>>> {
        self.expenses
            .write()
            .map_err(|_| ExpenseError::Storage("memory store lock poisoned".into()))
    }

    fn query(&self, filter: impl Fn(&Expense) -> bool) -> Result<Vec<Expense>> {
        let mut matches: Vec<Expense> = self
            .read()?
            .iter()
            .filter(|expense| filter(expense))
            .cloned()
            .collect();
        sort_newest_first(&mut matches);
        Ok(matches)
    }
}

impl ExpenseRepository for MemoryExpenseStore {
    fn add(&self, expense: NewExpense) -> Result<Uuid> {
        expense.validate()?;
        let record = Expense::from_new(expense, Utc::now());
        let id = record.id;
        self.write()?.push(record);
        Ok(id)
    }

    fn insert_many(&self, expenses: Vec<NewExpense>) -> Result<usize> {
        for expense in &expenses {
            expense.validate()?;
        }
        let now = Utc::now();
        let count = expenses.len();
        self.write()?
            .extend(expenses.into_iter().map(|expense| Expense::from_new(expense, now)));
        Ok(count)
    }

    fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<Expense>> {
        self.query(|expense| expense.date == date)
    }

    fn fetch_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        check_range(start, end)?;
        self.query(|expense| expense.date >= start && expense.date <= end)
    }

    fn fetch_all(&self) -> Result<Vec<Expense>> {
        self.query(|_| true)
    }

    fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<()> {
        patch.validate()?;
        let mut expenses = self.write()?;
        let record = expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(ExpenseError::NotFound(id))?;
        record.apply(patch);
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut expenses = self.write()?;
        let before = expenses.len();
        expenses.retain(|expense| expense.id != id);
        if expenses.len() == before {
            return Err(ExpenseError::NotFound(id));
        }
        Ok(())
    }

    fn clear_all(&self) -> Result<usize> {
        let mut expenses = self.write()?;
        let removed = expenses.len();
        expenses.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn export_then_import_assigns_fresh_ids() {
        let source = MemoryExpenseStore::new();
        let original = source
            .add(
                NewExpense::new(120.0, Category::Transport, "taxi", date(2))
                    .with_note("late night")
                    .with_raw_text("taxi home 120"),
            )
            .unwrap();
        let json = source.export_json().unwrap();

        let target = MemoryExpenseStore::new();
        assert_eq!(target.import_json(&json).unwrap(), 1);
        let imported = &target.fetch_all().unwrap()[0];
        assert_ne!(imported.id, original);
        assert_eq!(imported.note, "late night");
        assert_eq!(imported.raw_text.as_deref(), Some("taxi home 120"));
    }

    #[test]
    fn insert_many_is_all_or_nothing_on_validation() {
        let store = MemoryExpenseStore::new();
        let batch = vec![
            NewExpense::new(10.0, Category::Food, "a", date(1)),
            NewExpense::new(0.0, Category::Food, "b", date(1)),
        ];
        assert!(store.insert_many(batch).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn seeding_rejects_invalid_records() {
        let good =
            Expense::from_new(NewExpense::new(5.0, Category::Food, "tea", date(1)), Utc::now());
        let mut bad = good.clone();
        bad.amount = f64::NAN;

        assert_eq!(MemoryExpenseStore::with_records(vec![good.clone()]).unwrap().len(), 1);
        assert!(matches!(
            MemoryExpenseStore::with_records(vec![good, bad]),
            Err(ExpenseError::InvalidInput(_))
        ));
    }

    #[test]
    fn clear_all_reports_removed_count() {
        let store = MemoryExpenseStore::new();
        store
            .add(NewExpense::new(10.0, Category::Food, "a", date(1)))
            .unwrap();
        store
            .add(NewExpense::new(12.0, Category::Food, "b", date(2)))
            .unwrap();
        assert_eq!(store.clear_all().unwrap(), 2);
        assert_eq!(store.clear_all().unwrap(), 0);
    }
}
