//! Month windows over a 0-indexed (January = 0) series of monthly hours.
//!
//! Every read goes through [`value_at`] or [`MonthWindow::values`], which clip
//! to the data actually present instead of indexing out of range.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// The month scoring is anchored to, passed explicitly through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceMonth {
    pub year: i32,
    /// 0 = January.
    pub month_index: usize,
    /// Day within the month, when known. Drives the early-month fallback.
    pub day_of_month: Option<u32>,
}

impl ReferenceMonth {
    pub fn new(year: i32, month_index: usize) -> Self {
        Self {
            year,
            month_index: month_index.min(11),
            day_of_month: None,
        }
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_index: date.month0() as usize,
            day_of_month: Some(date.day()),
        }
    }

    /// `[max(0, c-n+1), c]`
    pub fn last_n_months(&self, n: usize) -> MonthWindow {
        let n = n.max(1);
        MonthWindow {
            start: (self.month_index + 1).saturating_sub(n),
            end: self.month_index,
        }
    }

    /// Two back-to-back windows of up to `n` months: the earlier one (absent
    /// when it would start before January) and the one ending at the current month.
    pub fn growth_comparison_windows(&self, n: usize) -> (Option<MonthWindow>, MonthWindow) {
        let current = self.last_n_months(n);
        (months_before(current.start, n), current)
    }
}

/// Inclusive month index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub start: usize,
    pub end: usize,
}

impl MonthWindow {
    /// The part of `series` covered by this window; empty when the series is shorter.
    pub fn values<'a>(&self, series: &'a [f64]) -> &'a [f64] {
        if self.start >= series.len() {
            return &[];
        }
        let end = self.end.min(series.len() - 1);
        &series[self.start..=end]
    }
}

/// Up to `n` months strictly before `month`, or `None` when `month` is January.
pub fn months_before(month: usize, n: usize) -> Option<MonthWindow> {
    if month == 0 || n == 0 {
        return None;
    }
    Some(MonthWindow {
        start: month.saturating_sub(n),
        end: month - 1,
    })
}

/// Value at `index`, or 0 when the month is missing or the stored value is unusable.
pub fn value_at(series: &[f64], index: usize) -> f64 {
    match series.get(index) {
        Some(v) if v.is_finite() && *v >= 0.0 => *v,
        Some(v) => {
            log::warn!("window: invalid hours value {v} at month {index}, using 0");
            0.0
        }
        None => {
            log::debug!(
                "window: month {index} beyond series of length {}, using 0",
                series.len()
            );
            0.0
        }
    }
}
