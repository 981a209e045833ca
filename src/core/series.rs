//! Exhaustive bucket keys so charts get zero-valued points for empty days and months.

use chrono::{Datelike, NaiveDate};

/// Every calendar date from `start` to `end` inclusive, ascending. Empty when `start > end`.
pub fn date_series(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// The twelve `YYYY-MM` keys of `year`, January first.
pub fn month_series(year: i32) -> Vec<String> {
    (1..=12).map(|month| month_key(year, month)).collect()
}

pub fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Month bucket of a date, i.e. the first seven characters of its `YYYY-MM-DD` form.
pub fn month_key_of(date: NaiveDate) -> String {
    month_key(date.year(), date.month())
}
