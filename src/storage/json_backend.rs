use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::{Expense, ExpensePatch, NewExpense},
    errors::ExpenseError,
};

use super::{check_range, sort_newest_first, ExpenseRepository, Result};

pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(default)]
    expenses: Vec<Expense>,
}

fn default_schema_version() -> u32 {
    STORE_SCHEMA_VERSION
}

/// Single-file JSON store. Every mutation rewrites the file atomically.
pub struct JsonExpenseStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonExpenseStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// The on-device store under `base` (or the default data directory).
    pub fn local(base: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        Self::new(PathResolver::local_store_in(&base))
    }

    /// A store partitioned to one signed-in user.
    pub fn for_user(base: Option<PathBuf>, user_id: &str) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        Self::new(PathResolver::user_store_in(&base, user_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile> {
        let store = self.read_unchecked()?;
        for expense in &store.expenses {
            expense.validate().map_err(|err| {
                ExpenseError::Storage(format!("{}: {err}", self.path.display()))
            })?;
        }
        Ok(store)
    }

    /// Parses the file without record validation, so `clear_all` can still empty a damaged store.
    fn read_unchecked(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let store: StoreFile = serde_json::from_str(&data)?;
        if store.schema_version > STORE_SCHEMA_VERSION {
            return Err(ExpenseError::Storage(format!(
                "{} uses schema v{}, newest supported is v{}",
                self.path.display(),
                store.schema_version,
                STORE_SCHEMA_VERSION
            )));
        }
        Ok(store)
    }

    fn write(&self, store: &StoreFile) -> Result<()> {
        let json = serde_json::to_string_pretty(store)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn query(&self, filter: impl Fn(&Expense) -> bool) -> Result<Vec<Expense>> {
        let _guard = self.guard()?;
        let mut matches: Vec<Expense> = self
            .read()?
            .expenses
            .into_iter()
            .filter(|expense| filter(expense))
            .collect();
        sort_newest_first(&mut matches);
        Ok(matches)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| ExpenseError::Storage("store lock poisoned".into()))
    }
}

impl ExpenseRepository for JsonExpenseStore {
    fn add(&self, expense: NewExpense) -> Result<Uuid> {
        expense.validate()?;
        let _guard = self.guard()?;
        let mut store = self.read()?;
        let record = Expense::from_new(expense, Utc::now());
        let id = record.id;
        store.expenses.push(record);
        self.write(&store)?;
        debug!(%id, path = %self.path.display(), "expense stored");
        Ok(id)
    }

    fn insert_many(&self, expenses: Vec<NewExpense>) -> Result<usize> {
        for expense in &expenses {
            expense.validate()?;
        }
        let _guard = self.guard()?;
        let mut store = self.read()?;
        let now = Utc::now();
        let count = expenses.len();
        store
            .expenses
            .extend(expenses.into_iter().map(|expense| Expense::from_new(expense, now)));
        self.write(&store)?;
        debug!(count, path = %self.path.display(), "expenses bulk inserted");
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
        let _guard = self.guard()?;
        let mut store = self.read()?;
        let record = store
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(ExpenseError::NotFound(id))?;
        record.apply(patch);
        self.write(&store)?;
        debug!(%id, "expense updated");
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let _guard = self.guard()?;
        let mut store = self.read()?;
        let before = store.expenses.len();
        store.expenses.retain(|expense| expense.id != id);
        if store.expenses.len() == before {
            return Err(ExpenseError::NotFound(id));
        }
        self.write(&store)?;
        debug!(%id, "expense deleted");
        Ok(())
    }

    fn clear_all(&self) -> Result<usize> {
        let _guard = self.guard()?;
        let mut store = self.read_unchecked()?;
        let removed = store.expenses.len();
        store.expenses.clear();
        self.write(&store)?;
        info!(removed, path = %self.path.display(), "expense store cleared");
        Ok(removed)
    }
}
