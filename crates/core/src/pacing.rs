//! Month-end pacing projections.
//!
//! Turns a month-to-date actual and a full-month target into a run rate,
//! an end-of-month projection, the daily amount still needed, and a
//! three-way pace judgment. The same algorithm serves turnover and
//! transaction counts.

use crate::calendar::MonthCalendar;
use serde::{Deserialize, Serialize};

/// Ratio difference below which actual and expected progress count as equal.
///
/// Only absorbs floating point noise; any real excess or shortfall moves
/// the status off `OnTrack`.
pub const PACE_TOLERANCE: f64 = 1e-9;

/// Qualitative pace against the month's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    /// Ahead of the straight-line pace
    Ahead,
    /// Exactly on the straight-line pace
    OnTrack,
    /// Behind the straight-line pace
    Behind,
}

impl PaceStatus {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on_track",
            PaceStatus::Behind => "behind",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "Ahead",
            PaceStatus::OnTrack => "On Track",
            PaceStatus::Behind => "Behind",
        }
    }
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A month-to-date actual paired with its full-month target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    /// Cumulative value from the 1st through today
    pub actual: f64,

    /// Full-month target
    pub target: f64,
}

impl MetricTotals {
    /// Pair an actual with its target.
    pub fn new(actual: f64, target: f64) -> Self {
        Self { actual, target }
    }
}

/// Derived pacing figures for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingResult {
    /// Day of month, 1-indexed
    pub days_elapsed: u32,

    /// Length of the month
    pub days_in_month: u32,

    /// Days left after today
    pub days_remaining: u32,

    /// Average per elapsed day
    pub daily_run_rate: f64,

    /// Run rate extrapolated over the whole month
    pub projected_end_of_month: f64,

    /// Shortfall spread over the remaining days
    pub needed_per_day: f64,

    /// Pace judgment
    pub pace_status: PaceStatus,
}

/// Compute pacing for one metric against a calendar position.
///
/// Never fails: every division by zero resolves to a defined default.
pub fn calculate(totals: MetricTotals, calendar: &MonthCalendar) -> PacingResult {
    let MetricTotals { actual, target } = totals;

    let daily_run_rate = if calendar.days_elapsed > 0 {
        actual / calendar.days_elapsed as f64
    } else {
        0.0
    };

    let needed_per_day = if calendar.days_remaining > 0 {
        (target - actual) / calendar.days_remaining as f64
    } else {
        0.0
    };

    PacingResult {
        days_elapsed: calendar.days_elapsed,
        days_in_month: calendar.days_in_month,
        days_remaining: calendar.days_remaining,
        daily_run_rate,
        projected_end_of_month: daily_run_rate * calendar.days_in_month as f64,
        needed_per_day,
        pace_status: classify(totals, calendar),
    }
}

/// Compare actual progress against the elapsed share of the month.
pub fn classify(totals: MetricTotals, calendar: &MonthCalendar) -> PaceStatus {
    if totals.target <= 0.0 {
        return PaceStatus::OnTrack;
    }

    let expected_ratio = calendar.elapsed_ratio();
    let actual_ratio = totals.actual / totals.target;

    if actual_ratio > expected_ratio + PACE_TOLERANCE {
        PaceStatus::Ahead
    } else if actual_ratio < expected_ratio - PACE_TOLERANCE {
        PaceStatus::Behind
    } else {
        PaceStatus::OnTrack
    }
}

/// Turnover and transaction pacing for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingReport {
    /// Calendar shared by both results
    pub calendar: MonthCalendar,

    /// Turnover pacing
    pub turnover: PacingResult,

    /// Transaction count pacing
    pub transactions: PacingResult,
}

impl PacingReport {
    /// Compute both metrics against one calendar.
    pub fn compute(
        calendar: MonthCalendar,
        turnover: MetricTotals,
        transactions: MetricTotals,
    ) -> Self {
        Self {
            calendar,
            turnover: calculate(turnover, &calendar),
            transactions: calculate(transactions, &calendar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::days_in_month;
    use chrono::NaiveDate;

    fn calendar(y: i32, m: u32, d: u32) -> MonthCalendar {
        MonthCalendar::for_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_on_pace_scenario() {
        // 30-day month, day 10
        let cal = calendar(2025, 9, 10);
        let result = calculate(MetricTotals::new(100_000.0, 300_000.0), &cal);

        assert_eq!(result.days_in_month, 30);
        assert_eq!(result.days_elapsed, 10);
        assert_eq!(result.days_remaining, 20);
        assert!(approx(result.daily_run_rate, 10_000.0));
        assert!(approx(result.projected_end_of_month, 300_000.0));
        assert!(approx(result.needed_per_day, 10_000.0));
        assert_eq!(result.pace_status, PaceStatus::OnTrack);
    }

    #[test]
    fn test_ahead_scenario() {
        let cal = calendar(2025, 9, 10);
        let result = calculate(MetricTotals::new(150_000.0, 300_000.0), &cal);

        assert_eq!(result.pace_status, PaceStatus::Ahead);
        assert!(approx(result.projected_end_of_month, 450_000.0));
        assert!(approx(result.needed_per_day, 7_500.0));
    }

    #[test]
    fn test_behind_scenario() {
        let cal = calendar(2025, 9, 10);
        let result = calculate(MetricTotals::new(50_000.0, 300_000.0), &cal);

        assert_eq!(result.pace_status, PaceStatus::Behind);
        assert!(approx(result.projected_end_of_month, 150_000.0));
        assert!(approx(result.needed_per_day, 12_500.0));
    }

    #[test]
    fn test_last_day_needs_nothing_per_day() {
        let cal = calendar(2025, 1, 31);
        let result = calculate(MetricTotals::new(10.0, 1_000_000.0), &cal);

        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.needed_per_day, 0.0);
        assert_eq!(result.pace_status, PaceStatus::Behind);
    }

    #[test]
    fn test_zero_target_is_on_track() {
        let cal = calendar(2025, 3, 15);
        let result = calculate(MetricTotals::new(42_000.0, 0.0), &cal);

        assert_eq!(result.pace_status, PaceStatus::OnTrack);
        assert!(result.needed_per_day.is_finite());
        assert!(result.projected_end_of_month.is_finite());
    }

    #[test]
    fn test_surplus_yields_negative_need() {
        let cal = calendar(2025, 9, 10);
        let result = calculate(MetricTotals::new(400_000.0, 300_000.0), &cal);
        assert!(result.needed_per_day < 0.0);
    }

    #[test]
    fn test_exact_expected_progress_is_on_track_every_day() {
        for (year, month) in [(2024, 2), (2025, 2), (2025, 4), (2025, 7)] {
            let len = days_in_month(year, month);
            let target = 310_000.0;
            for day in 1..=len {
                let cal = calendar(year, month, day);
                let actual = target * (day as f64 / len as f64);
                assert_eq!(
                    classify(MetricTotals::new(actual, target), &cal),
                    PaceStatus::OnTrack,
                    "{year}-{month}-{day}"
                );
            }
        }
    }

    #[test]
    fn test_run_rate_reconstructs_actual() {
        let actual = 123_456.78;
        for day in 1..=31 {
            let cal = calendar(2025, 10, day);
            let result = calculate(MetricTotals::new(actual, 500_000.0), &cal);
            assert!(approx(result.daily_run_rate * day as f64, actual));
            assert_eq!(
                result.projected_end_of_month,
                result.daily_run_rate * result.days_in_month as f64
            );
        }
    }

    #[test]
    fn test_report_shares_calendar() {
        let cal = calendar(2024, 2, 12);
        let report = PacingReport::compute(
            cal,
            MetricTotals::new(1_000_000.0, 2_900_000.0),
            MetricTotals::new(9_000.0, 21_500.0),
        );

        assert_eq!(report.turnover.days_elapsed, report.transactions.days_elapsed);
        assert_eq!(report.turnover.days_in_month, 29);
        assert_eq!(report.transactions.days_in_month, 29);
        assert_eq!(report.calendar, cal);
    }

    #[test]
    fn test_pace_status_serde_names() {
        let json = serde_json::to_string(&PaceStatus::OnTrack).unwrap();
        assert_eq!(json, "\"on_track\"");
        let parsed: PaceStatus = serde_json::from_str("\"behind\"").unwrap();
        assert_eq!(parsed, PaceStatus::Behind);
        assert_eq!(PaceStatus::Ahead.label(), "Ahead");
    }
}
