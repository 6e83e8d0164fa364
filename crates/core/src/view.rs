//! Derived dashboard view - everything a renderer needs for one refresh.

use crate::calendar::MonthCalendar;
use crate::pacing::{MetricTotals, PacingReport};
use crate::progress::TargetProgress;
use crate::snapshot::DashboardSnapshot;
use crate::Time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A snapshot together with its derived figures.
///
/// All derived fields are computed from one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Raw payload
    pub snapshot: DashboardSnapshot,

    /// Pacing for turnover and transactions
    pub pacing: PacingReport,

    /// Turnover against target
    pub turnover_progress: TargetProgress,

    /// Transaction count against target
    pub transactions_progress: TargetProgress,

    /// When the snapshot was received
    pub fetched_at: Time,
}

impl DashboardView {
    /// Derive a view from a snapshot.
    ///
    /// `default_transactions_target` applies when the snapshot carries no
    /// transaction target of its own.
    pub fn build(
        snapshot: DashboardSnapshot,
        today: NaiveDate,
        default_transactions_target: f64,
        fetched_at: Time,
    ) -> Self {
        let calendar = MonthCalendar::for_date(today);
        let transactions_target = snapshot
            .transactions_target
            .unwrap_or(default_transactions_target);

        let pacing = PacingReport::compute(
            calendar,
            MetricTotals::new(snapshot.turnover_till_date, snapshot.target_till_date),
            MetricTotals::new(snapshot.transactions_mtd, transactions_target),
        );

        let turnover_progress = TargetProgress::with_percentage(
            snapshot.turnover_till_date,
            snapshot.target_till_date,
            snapshot.target_achievement_percentage,
        );
        let transactions_progress =
            TargetProgress::from_totals(snapshot.transactions_mtd, transactions_target);

        Self {
            snapshot,
            pacing,
            turnover_progress,
            transactions_progress,
            fetched_at,
        }
    }

    /// The reference date all derived figures share.
    pub fn reference_date(&self) -> NaiveDate {
        self.pacing.calendar.date
    }
}
