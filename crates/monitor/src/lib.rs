//! Dashboard refresh cycle.
//!
//! Keeps the currently displayed dashboard view up to date: polls the
//! snapshot source on a fixed interval, derives pacing figures, and keeps
//! the last good view on display when a later refresh fails.

#![warn(missing_docs)]

pub mod monitor;
pub mod state;

pub use monitor::{DashboardMonitor, MonitorConfig, RefreshOutcome, RetryHandle};
pub use state::DashboardState;
