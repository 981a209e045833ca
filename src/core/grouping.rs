//! Day-grouped history views and month navigation.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::analytics::sum_amounts;
use crate::core::period::{first_of_month, last_of_month, PeriodRange};
use crate::domain::Expense;
use crate::errors::ExpenseError;

/// Expenses recorded on a single day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub items: Vec<Expense>,
    pub total: f64,
}

/// Groups records by date, newest day first. Items keep their input order.
pub fn group_by_date(expenses: &[Expense]) -> Vec<DayGroup> {
    let mut groups: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
    for expense in expenses {
        groups.entry(expense.date).or_default().push(expense.clone());
    }
    groups
        .into_iter()
        .rev()
        .map(|(date, items)| DayGroup {
            date,
            total: sum_amounts(&items),
            items,
        })
        .collect()
}

pub fn month_total(expenses: &[Expense]) -> f64 {
    sum_amounts(expenses)
}

/// A calendar month, used to page through history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ExpenseError> {
        if !(1..=12).contains(&month) {
            return Err(ExpenseError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(raw: &str) -> Result<Self, ExpenseError> {
        let invalid = || ExpenseError::InvalidInput(format!("`{raw}` is not a valid YYYY-MM month"));
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// Moves `delta` months forward (or back when negative), rolling over years.
    pub fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn range(self) -> Result<PeriodRange, ExpenseError> {
        month_range(self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// First to last day of the given month.
pub fn month_range(year: i32, month: u32) -> Result<PeriodRange, ExpenseError> {
    PeriodRange::new(first_of_month(year, month)?, last_of_month(year, month)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewExpense};
    use chrono::Utc;

    fn expense(amount: f64, day: u32) -> Expense {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        Expense::from_new(NewExpense::new(amount, Category::Food, "meal", date), Utc::now())
    }

    #[test]
    fn groups_newest_first_with_totals() {
        let records = vec![expense(10.0, 1), expense(20.0, 5), expense(5.0, 1)];
        let groups = group_by_date(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date.day(), 5);
        assert_eq!(groups[1].total, 15.0);
        assert_eq!(groups[1].items[0].id, records[0].id);
        assert_eq!(month_total(&records), 35.0);
    }

    #[test]
    fn year_month_shift_rolls_over() {
        let january = YearMonth::new(2025, 1).unwrap();
        assert_eq!(january.shift(-1), YearMonth::new(2024, 12).unwrap());
        assert_eq!(january.shift(12), YearMonth::new(2026, 1).unwrap());
        assert_eq!(YearMonth::new(2024, 12).unwrap().shift(1), january);
    }

    #[test]
    fn parses_and_ranges_months() {
        let month = YearMonth::parse("2024-02").unwrap();
        let range = month.range().unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(month.to_string(), "2024-02");
        assert!(YearMonth::parse("2024-13").is_err());
        assert!(YearMonth::parse("2024").is_err());
    }

    #[test]
    fn months_outside_the_calendar_have_no_range() {
        let far = YearMonth::parse("999999-01").unwrap();
        assert!(matches!(far.range(), Err(ExpenseError::InvalidInput(_))));
        let december = month_range(2025, 12).unwrap();
        assert_eq!(december.len_days(), 31);
    }
}
