use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::core::grouping::{group_by_date, month_total, DayGroup, YearMonth};
use crate::domain::{Expense, ExpensePatch, NewExpense};
use crate::errors::ExpenseError;
use crate::storage::ExpenseRepository;

use super::ServiceResult;

/// One month of history, grouped by day.
#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: YearMonth,
    pub groups: Vec<DayGroup>,
    pub total: f64,
}

pub struct ExpenseService;

impl ExpenseService {
    /// Validates and stores a new expense. A blank item falls back to the category name.
    pub fn add(repo: &dyn ExpenseRepository, mut expense: NewExpense) -> ServiceResult<Uuid> {
        expense.validate()?;
        expense.item = expense.item.trim().to_string();
        if expense.item.is_empty() {
            expense.item = expense.category.info().name.to_string();
        }
        expense.note = expense.note.trim().to_string();
        let id = repo.add(expense)?;
        info!(%id, "expense recorded");
        Ok(id)
    }

    pub fn update(
        repo: &dyn ExpenseRepository,
        id: Uuid,
        patch: ExpensePatch,
    ) -> ServiceResult<()> {
        if patch.is_empty() {
            return Err(ExpenseError::InvalidInput("nothing to update".into()));
        }
        patch.validate()?;
        repo.update(id, &patch)
    }

    pub fn remove(repo: &dyn ExpenseRepository, id: Uuid) -> ServiceResult<()> {
        repo.delete(id)?;
        info!(%id, "expense removed");
        Ok(())
    }

    pub fn on_date(repo: &dyn ExpenseRepository, date: NaiveDate) -> ServiceResult<Vec<Expense>> {
        repo.fetch_by_date(date)
    }

    pub fn month(repo: &dyn ExpenseRepository, month: YearMonth) -> ServiceResult<MonthView> {
        let range = month.range()?;
        let expenses = repo.fetch_range(&range)?;
        Ok(MonthView {
            month,
            total: month_total(&expenses),
            groups: group_by_date(&expenses),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::storage::MemoryExpenseStore;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn blank_item_defaults_to_category_name() {
        let store = MemoryExpenseStore::new();
        let id = ExpenseService::add(
            &store,
            NewExpense::new(45.0, Category::Medical, "   ", date(3, 1)),
        )
        .unwrap();
        let stored = store.fetch_all().unwrap();
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].item, "Medical");
    }

    #[test]
    fn empty_patch_is_rejected() {
        let store = MemoryExpenseStore::new();
        let id = ExpenseService::add(
            &store,
            NewExpense::new(45.0, Category::Food, "noodles", date(3, 1)),
        )
        .unwrap();
        let err = ExpenseService::update(&store, id, ExpensePatch::default()).unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidInput(_)));

        let zero = ExpensePatch {
            amount: Some(0.0),
            ..ExpensePatch::default()
        };
        assert!(ExpenseService::update(&store, id, zero).is_err());
    }

    #[test]
    fn month_view_groups_days_within_month() {
        let store = MemoryExpenseStore::new();
        for (m, d, amount) in [(2, 28, 5.0), (3, 1, 10.0), (3, 1, 2.5), (3, 31, 7.0), (4, 1, 9.0)] {
            ExpenseService::add(&store, NewExpense::new(amount, Category::Food, "x", date(m, d)))
                .unwrap();
        }
        let view = ExpenseService::month(&store, YearMonth::new(2025, 3).unwrap()).unwrap();
        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.groups[0].date, date(3, 31));
        assert_eq!(view.groups[1].total, 12.5);
        assert_eq!(view.total, 19.5);
    }
}
