use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::core::{
    analytics::{AnalyticsEngine, AnalyticsSnapshot},
    charts::{bar_entries, pie_slices, trend_points, BarEntry, PieSlice, TrendPoint},
    period::{PeriodKind, PeriodRange},
};
use crate::storage::ExpenseRepository;

use super::ServiceResult;

/// Snapshot plus its chart shapes for one analytics request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub kind: PeriodKind,
    pub range: PeriodRange,
    pub previous_range: PeriodRange,
    pub snapshot: AnalyticsSnapshot,
    pub pie: Vec<PieSlice>,
    pub bars: Vec<BarEntry>,
    pub trend: Vec<TrendPoint>,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// Expands `reference` for `kind`, compares against the preceding window and shapes the charts.
    pub fn report(
        repo: &dyn ExpenseRepository,
        kind: PeriodKind,
        reference: NaiveDate,
    ) -> ServiceResult<AnalyticsReport> {
        Self::report_for_range(repo, kind, PeriodRange::for_kind(kind, reference)?)
    }

    /// Same as [`report`](Self::report) over an explicit range, e.g. a trailing N-day window.
    pub fn report_for_range(
        repo: &dyn ExpenseRepository,
        kind: PeriodKind,
        range: PeriodRange,
    ) -> ServiceResult<AnalyticsReport> {
        let previous_range = range.previous()?;
        let snapshot = Self::compare(repo, range)?;
        Ok(AnalyticsReport {
            kind,
            range,
            previous_range,
            pie: pie_slices(&snapshot),
            bars: bar_entries(&snapshot),
            trend: trend_points(kind, &range, &snapshot),
            snapshot,
        })
    }

    /// Fetches `range` and its previous window, failing as a unit if either query fails.
    pub fn compare(
        repo: &dyn ExpenseRepository,
        range: PeriodRange,
    ) -> ServiceResult<AnalyticsSnapshot> {
        let previous_range = range.previous()?;
        let current = repo.fetch_range(&range)?;
        let previous = repo.fetch_range(&previous_range)?;
        debug!(
            %range,
            %previous_range,
            current = current.len(),
            previous = previous.len(),
            "analyzing expenses"
        );
        Ok(AnalyticsEngine::analyze(&current, &previous))
    }
}
