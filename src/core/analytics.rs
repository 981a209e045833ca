//! Period-over-period expense analytics.
//!
//! [`AnalyticsEngine::analyze`] turns the records of a current and a previous
//! period into an [`AnalyticsSnapshot`]. The computation is pure: no I/O, no
//! shared state, and the same inputs always produce the same snapshot.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::series::month_key_of;
use crate::domain::{Amounted, Category, Expense, CATEGORIES};

/// Per-category totals for the current period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryStat {
    pub id: Category,
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub amount: f64,
    pub count: usize,
    pub percentage: i64,
}

/// A [`CategoryStat`] plus its change against the previous period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryChange {
    #[serde(flatten)]
    pub stat: CategoryStat,
    pub change: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_amount: f64,
    pub previous_total: f64,
    pub total_change: i64,
    pub transaction_count: usize,
    pub average_amount: f64,
    pub max_expense: Option<Expense>,
    /// One entry per taxonomy member, sorted by amount descending.
    pub category_stats: Vec<CategoryStat>,
    pub category_changes: Vec<CategoryChange>,
    pub daily_totals: BTreeMap<NaiveDate, f64>,
    pub monthly_totals: BTreeMap<String, f64>,
    pub daily_category_totals: BTreeMap<NaiveDate, BTreeMap<Category, f64>>,
}

impl AnalyticsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    pub fn stat(&self, category: Category) -> Option<&CategoryStat> {
        self.category_stats.iter().find(|stat| stat.id == category)
    }

    pub fn change(&self, category: Category) -> Option<&CategoryChange> {
        self.category_changes
            .iter()
            .find(|entry| entry.stat.id == category)
    }
}

pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn analyze(current: &[Expense], previous: &[Expense]) -> AnalyticsSnapshot {
        let total_amount = sum_amounts(current);
        let previous_total = sum_amounts(previous);
        let transaction_count = current.len();
        let average_amount = if transaction_count > 0 {
            round_half_up(total_amount / transaction_count as f64)
        } else {
            0.0
        };

        let category_stats = category_stats(current, total_amount);
        let previous_by_category = category_amounts(previous);
        let category_changes = category_stats
            .iter()
            .map(|stat| CategoryChange {
                change: percent_change(
                    stat.amount,
                    previous_by_category
                        .get(&stat.id)
                        .copied()
                        .unwrap_or_default(),
                ),
                stat: stat.clone(),
            })
            .collect();

        let mut daily_totals = BTreeMap::new();
        let mut monthly_totals = BTreeMap::new();
        let mut daily_category_totals: BTreeMap<NaiveDate, BTreeMap<Category, f64>> =
            BTreeMap::new();
        for expense in current {
            *daily_totals.entry(expense.date).or_insert(0.0) += expense.amount;
            *monthly_totals
                .entry(month_key_of(expense.date))
                .or_insert(0.0) += expense.amount;
            *daily_category_totals
                .entry(expense.date)
                .or_default()
                .entry(expense.category)
                .or_insert(0.0) += expense.amount;
        }

        AnalyticsSnapshot {
            total_amount,
            previous_total,
            total_change: percent_change(total_amount, previous_total),
            transaction_count,
            average_amount,
            max_expense: max_expense(current).cloned(),
            category_stats,
            category_changes,
            daily_totals,
            monthly_totals,
            daily_category_totals,
        }
    }
}

/// Rounded percentage change from `previous` to `current`.
///
/// A zero baseline reports `100` for any new spending and `0` otherwise, so the
/// boundary never divides by zero.
pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    round_half_up((current - previous) / previous * 100.0) as i64
}

/// Rounds halves toward positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// First record holding the greatest amount.
pub fn max_expense(expenses: &[Expense]) -> Option<&Expense> {
    expenses.iter().fold(None, |best: Option<&Expense>, expense| match best {
        Some(current) if expense.amount <= current.amount => Some(current),
        _ => Some(expense),
    })
}

pub fn sum_amounts<T: Amounted>(items: &[T]) -> f64 {
    items.iter().map(Amounted::amount).sum()
}

fn category_amounts(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }
    totals
}

fn category_stats(expenses: &[Expense], total_amount: f64) -> Vec<CategoryStat> {
    let mut stats: Vec<CategoryStat> = CATEGORIES
        .iter()
        .map(|info| CategoryStat {
            id: info.id,
            name: info.name,
            emoji: info.emoji,
            color: info.color,
            amount: 0.0,
            count: 0,
            percentage: 0,
        })
        .collect();

    for expense in expenses {
        // Taxonomy order matches discriminants.
        let stat = &mut stats[expense.category as usize];
        stat.amount += expense.amount;
        stat.count += 1;
    }

    if total_amount > 0.0 {
        for stat in &mut stats {
            stat.percentage = round_half_up(stat.amount / total_amount * 100.0) as i64;
        }
    }

    // Stable: equal amounts keep taxonomy order.
    stats.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    stats
}
