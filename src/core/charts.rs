//! Chart-ready shapes derived from an [`AnalyticsSnapshot`].

use chrono::Datelike;
use serde::Serialize;

use crate::core::{
    analytics::AnalyticsSnapshot,
    period::{PeriodKind, PeriodRange},
    series::{date_series, month_series},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub color: &'static str,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarEntry {
    pub name: &'static str,
    pub emoji: &'static str,
    pub amount: f64,
    pub change: i64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub amount: f64,
}

/// Categories with spending in the current period.
pub fn pie_slices(snapshot: &AnalyticsSnapshot) -> Vec<PieSlice> {
    snapshot
        .category_stats
        .iter()
        .filter(|stat| stat.amount > 0.0)
        .map(|stat| PieSlice {
            name: format!("{} {}", stat.emoji, stat.name),
            value: stat.amount,
            color: stat.color,
            percentage: stat.percentage,
        })
        .collect()
}

/// Categories with current spending or a non-zero change against the previous period.
pub fn bar_entries(snapshot: &AnalyticsSnapshot) -> Vec<BarEntry> {
    snapshot
        .category_changes
        .iter()
        .filter(|entry| entry.stat.amount > 0.0 || entry.change != 0)
        .map(|entry| BarEntry {
            name: entry.stat.name,
            emoji: entry.stat.emoji,
            amount: entry.stat.amount,
            change: entry.change,
            color: entry.stat.color,
        })
        .collect()
}

/// Zero-filled trend series: months for a year view, days otherwise.
pub fn trend_points(
    kind: PeriodKind,
    range: &PeriodRange,
    snapshot: &AnalyticsSnapshot,
) -> Vec<TrendPoint> {
    if kind == PeriodKind::Year {
        return month_series(range.start.year())
            .into_iter()
            .map(|month| TrendPoint {
                amount: snapshot.monthly_totals.get(&month).copied().unwrap_or(0.0),
                label: month
                    .rsplit_once('-')
                    .map_or_else(|| month.clone(), |(_, mm)| mm.to_string()),
            })
            .collect();
    }
    date_series(range.start, range.end)
        .into_iter()
        .map(|day| TrendPoint {
            label: day.format("%m-%d").to_string(),
            amount: snapshot.daily_totals.get(&day).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Whether any trend bucket carries spending.
pub fn has_activity(points: &[TrendPoint]) -> bool {
    points.iter().any(|point| point.amount > 0.0)
}
