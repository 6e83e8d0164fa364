//! Paceboard core data models.
//!
//! This crate defines the dashboard snapshot received from the metrics
//! backend and the pure pacing computations derived from it.

#![warn(missing_docs)]

// Payload
mod snapshot;

// Derived figures
mod calendar;
mod pacing;
mod progress;
mod view;

// Re-exports
pub use calendar::{days_in_month, MonthCalendar};
pub use pacing::{
    calculate, classify, MetricTotals, PaceStatus, PacingReport, PacingResult, PACE_TOLERANCE,
};
pub use progress::{ProgressBand, TargetProgress, DEFAULT_TRANSACTIONS_TARGET};
pub use snapshot::{
    ActivityFeed, DashboardSnapshot, TerminalStat, Transaction, TransactionOutcome, ViewMode,
};
pub use view::DashboardView;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
