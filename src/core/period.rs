//! Current/previous period ranges for analytics requests.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ExpenseError;

/// How a reference date expands into a range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl PeriodKind {
    pub fn parse(raw: &str) -> Result<Self, ExpenseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(PeriodKind::Day),
            "week" | "w" => Ok(PeriodKind::Week),
            "month" | "m" => Ok(PeriodKind::Month),
            "year" | "y" => Ok(PeriodKind::Year),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown period `{other}` (expected day, week, month or year)"
            ))),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodKind::Day => "Day",
            PeriodKind::Week => "Week",
            PeriodKind::Month => "Month",
            PeriodKind::Year => "Year",
        };
        f.write_str(label)
    }
}

/// Inclusive date range. `start <= end` always holds, including after deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawRange")]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for PeriodRange {
    type Error = ExpenseError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ExpenseError> {
        if end < start {
            return Err(ExpenseError::InvalidInput(format!(
                "range end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Expands `reference` into the range for `kind`.
    ///
    /// Fails only when the range would leave the supported calendar.
    pub fn for_kind(kind: PeriodKind, reference: NaiveDate) -> Result<Self, ExpenseError> {
        match kind {
            PeriodKind::Day => Ok(Self::single(reference)),
            PeriodKind::Week => {
                let offset = u64::from(reference.weekday().num_days_from_monday());
                let monday = reference
                    .checked_sub_days(Days::new(offset))
                    .ok_or_else(|| out_of_range(reference))?;
                let sunday = monday
                    .checked_add_days(Days::new(6))
                    .ok_or_else(|| out_of_range(reference))?;
                Ok(Self {
                    start: monday,
                    end: sunday,
                })
            }
            PeriodKind::Month => Ok(Self {
                start: first_of_month(reference.year(), reference.month())?,
                end: last_of_month(reference.year(), reference.month())?,
            }),
            PeriodKind::Year => Ok(Self {
                start: ymd(reference.year(), 1, 1)?,
                end: ymd(reference.year(), 12, 31)?,
            }),
        }
    }

    /// The `days` most recent days ending on `reference`, inclusive. `days` is clamped to 1.
    pub fn last_n_days(days: u32, reference: NaiveDate) -> Result<Self, ExpenseError> {
        let span = u64::from(days.max(1) - 1);
        let start = reference.checked_sub_days(Days::new(span)).ok_or_else(|| {
            ExpenseError::InvalidInput(format!(
                "a {days}-day window ending {reference} starts before the supported calendar"
            ))
        })?;
        Ok(Self {
            start,
            end: reference,
        })
    }

    /// Equal-length window ending the day before `start`.
    ///
    /// This is a trailing window, not the calendar-aligned prior period: the
    /// previous of March is the 31 days ending February 28th/29th.
    pub fn previous(&self) -> Result<Self, ExpenseError> {
        let length = self.end - self.start;
        let end = self
            .start
            .pred_opt()
            .ok_or_else(|| out_of_range(self))?;
        let start = end
            .checked_sub_signed(length)
            .ok_or_else(|| out_of_range(self))?;
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, inclusive.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

pub(crate) fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ExpenseError> {
    ymd(year, month, 1)
}

pub(crate) fn last_of_month(year: i32, month: u32) -> Result<NaiveDate, ExpenseError> {
    if month == 12 {
        return ymd(year, 12, 31);
    }
    ymd(year, month + 1, 1)?
        .pred_opt()
        .ok_or_else(|| out_of_range(format!("{year:04}-{month:02}")))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, ExpenseError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| out_of_range(format!("{year:04}-{month:02}-{day:02}")))
}

fn out_of_range(what: impl fmt::Display) -> ExpenseError {
    ExpenseError::InvalidInput(format!("{what} falls outside the supported calendar"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2025-03-16 is a Sunday.
        let range = PeriodRange::for_kind(PeriodKind::Week, date(2025, 3, 16)).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));
        assert_eq!(range.end, date(2025, 3, 16));

        let monday = PeriodRange::for_kind(PeriodKind::Week, date(2025, 3, 10)).unwrap();
        assert_eq!(monday, range);
    }

    #[test]
    fn week_crossing_year_boundary() {
        let range = PeriodRange::for_kind(PeriodKind::Week, date(2025, 1, 1)).unwrap();
        assert_eq!(range.start, date(2024, 12, 30));
        assert_eq!(range.end, date(2025, 1, 5));
    }

    #[test]
    fn month_ends_on_last_calendar_day() {
        let leap = PeriodRange::for_kind(PeriodKind::Month, date(2024, 2, 14)).unwrap();
        assert_eq!(leap.start, date(2024, 2, 1));
        assert_eq!(leap.end, date(2024, 2, 29));

        let december = PeriodRange::for_kind(PeriodKind::Month, date(2025, 12, 31)).unwrap();
        assert_eq!(december.end, date(2025, 12, 31));
    }

    #[test]
    fn year_is_literal_bounds() {
        let range = PeriodRange::for_kind(PeriodKind::Year, date(2024, 7, 4)).unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn day_and_last_n_days() {
        let today = date(2025, 3, 1);
        assert_eq!(
            PeriodRange::for_kind(PeriodKind::Day, today).unwrap(),
            PeriodRange::single(today)
        );
        let week = PeriodRange::last_n_days(7, today).unwrap();
        assert_eq!(week.start, date(2025, 2, 23));
        assert_eq!(week.len_days(), 7);
        assert_eq!(PeriodRange::last_n_days(0, today).unwrap(), PeriodRange::single(today));
    }

    #[test]
    fn previous_is_equal_length_trailing_window() {
        let range = PeriodRange::new(date(2025, 3, 10), date(2025, 3, 16)).unwrap();
        let previous = range.previous().unwrap();
        assert_eq!(previous.start, date(2025, 3, 3));
        assert_eq!(previous.end, date(2025, 3, 9));
        assert_eq!(previous.len_days(), range.len_days());
    }

    #[test]
    fn previous_of_month_is_not_calendar_aligned() {
        let march = PeriodRange::for_kind(PeriodKind::Month, date(2025, 3, 5)).unwrap();
        let previous = march.previous().unwrap();
        assert_eq!(previous.end, date(2025, 2, 28));
        assert_eq!(previous.start, date(2025, 1, 29));
        assert_eq!(previous.len_days(), 31);
    }

    #[test]
    fn previous_of_single_day_is_yesterday() {
        let previous = PeriodRange::single(date(2025, 1, 1)).previous().unwrap();
        assert_eq!(previous, PeriodRange::single(date(2024, 12, 31)));
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert!(PeriodRange::new(date(2025, 3, 2), date(2025, 3, 1)).is_err());
        assert!(PeriodRange::new(date(2025, 3, 1), date(2025, 3, 1)).is_ok());
    }

    #[test]
    fn oversized_trailing_window_is_rejected() {
        let today = date(2026, 10, 17);
        assert!(matches!(
            PeriodRange::last_n_days(200_000_000, today),
            Err(ExpenseError::InvalidInput(_))
        ));
        assert!(PeriodRange::last_n_days(u32::MAX, today).is_err());
        let long = PeriodRange::last_n_days(36_500, today).unwrap();
        assert_eq!(long.len_days(), 36_500);
    }

    #[test]
    fn calendar_edges_fail_instead_of_panicking() {
        assert!(PeriodRange::single(NaiveDate::MIN).previous().is_err());
        let wide = PeriodRange::new(date(-200_000, 1, 1), date(200_000, 1, 1)).unwrap();
        assert!(wide.previous().is_err());

        let last_month = PeriodRange::for_kind(PeriodKind::Month, NaiveDate::MAX).unwrap();
        assert_eq!(last_month.end, NaiveDate::MAX);
        let last_year = PeriodRange::for_kind(PeriodKind::Year, NaiveDate::MAX).unwrap();
        assert_eq!(last_year.end, NaiveDate::MAX);
        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            if let Ok(week) = PeriodRange::for_kind(PeriodKind::Week, edge) {
                assert!(week.contains(edge));
            }
        }
    }

    #[test]
    fn deserializing_checks_bounds() {
        let ok: PeriodRange =
            serde_json::from_str(r#"{"start": "2025-03-01", "end": "2025-03-07"}"#).unwrap();
        assert_eq!(ok.len_days(), 7);
        let inverted =
            serde_json::from_str::<PeriodRange>(r#"{"start": "2025-03-07", "end": "2025-03-01"}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn parses_period_names() {
        assert_eq!(PeriodKind::parse("Month").unwrap(), PeriodKind::Month);
        assert!(PeriodKind::parse("fortnight").is_err());
    }
}
