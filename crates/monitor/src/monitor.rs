//! Refresh cycle: fetch, derive, publish.

use crate::state::DashboardState;
use chrono::{Local, NaiveDate, Utc};
use paceboard_client::{ClientConfig, SnapshotSource};
use paceboard_core::{DashboardView, DEFAULT_TRANSACTIONS_TARGET};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Time between scheduled refreshes
    pub refresh_interval: Duration,

    /// Monthly transaction target when the backend sends none
    pub transactions_target: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            transactions_target: DEFAULT_TRANSACTIONS_TARGET,
        }
    }
}

impl From<&ClientConfig> for MonitorConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            transactions_target: config.transactions_target,
        }
    }
}

/// Result of a single refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new view replaced the old one
    Updated,
    /// Fetch failed; the previous view stays on display
    KeptStale,
    /// Fetch failed and there is nothing to show
    Failed,
}

/// Requests an out-of-schedule refresh.
#[derive(Debug, Clone)]
pub struct RetryHandle {
    tx: mpsc::Sender<()>,
}

impl RetryHandle {
    /// Ask for an immediate refresh. Requests made while one is already
    /// pending collapse into it.
    pub fn request(&self) {
        if self.tx.try_send(()).is_err() {
            debug!("Refresh already pending");
        }
    }
}

type TodayFn = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Owns the displayed dashboard state and keeps it fresh.
pub struct DashboardMonitor<S: SnapshotSource> {
    source: S,
    config: MonitorConfig,
    today: TodayFn,
    state_tx: watch::Sender<DashboardState>,
    retry_tx: mpsc::Sender<()>,
    retry_rx: mpsc::Receiver<()>,
}

impl<S: SnapshotSource> DashboardMonitor<S> {
    /// Create a monitor in the `Loading` state.
    pub fn new(source: S, config: MonitorConfig) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::Loading);
        let (retry_tx, retry_rx) = mpsc::channel(1);

        Self {
            source,
            config,
            today: Box::new(|| Local::now().date_naive()),
            state_tx,
            retry_tx,
            retry_rx,
        }
    }

    /// Override the source of "today" (local date by default).
    pub fn with_today<F>(mut self, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.today = Box::new(today);
        self
    }

    /// Receive every published state.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Handle for manual refresh requests.
    pub fn retry_handle(&self) -> RetryHandle {
        RetryHandle {
            tx: self.retry_tx.clone(),
        }
    }

    /// Fetch once and update the state.
    ///
    /// A failure after a successful load keeps the old view and records the
    /// error; a failure before any load moves to `Failed`.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                let view = DashboardView::build(
                    snapshot,
                    (self.today)(),
                    self.config.transactions_target,
                    Utc::now(),
                );
                info!(
                    "Dashboard refreshed: turnover {} / transactions {}",
                    view.pacing.turnover.pace_status, view.pacing.transactions.pace_status
                );
                self.state_tx.send_replace(DashboardState::Ready {
                    view: Arc::new(view),
                    last_error: None,
                });
                RefreshOutcome::Updated
            }
            Err(e) => {
                let previous = self.state_tx.borrow().view().cloned();
                match previous {
                    Some(view) => {
                        warn!("Refresh failed, keeping previous snapshot: {}", e);
                        self.state_tx.send_replace(DashboardState::Ready {
                            view,
                            last_error: Some(e.to_string()),
                        });
                        RefreshOutcome::KeptStale
                    }
                    None => {
                        error!("Failed to load dashboard data: {}", e);
                        self.state_tx.send_replace(DashboardState::Failed {
                            error: e.to_string(),
                            at: Utc::now(),
                        });
                        RefreshOutcome::Failed
                    }
                }
            }
        }
    }

    /// Refresh now, then on every interval tick or retry request, until
    /// `shutdown` completes.
    ///
    /// Refreshes run one at a time; ticks missed during a slow fetch are
    /// skipped rather than queued.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            "Starting dashboard refresh every {:?}",
            self.config.refresh_interval
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping dashboard refresh");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                Some(()) = self.retry_rx.recv() => {
                    info!("Manual refresh requested");
                    self.refresh().await;
                    ticker.reset();
                }
            }
        }
    }
}
