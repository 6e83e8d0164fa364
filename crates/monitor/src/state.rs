//! Dashboard display state.

use paceboard_core::{DashboardView, Time};
use std::sync::Arc;

/// What the dashboard can currently show.
#[derive(Debug, Clone)]
pub enum DashboardState {
    /// No refresh has finished yet
    Loading,

    /// No snapshot has ever been obtained
    Failed {
        /// Error from the latest attempt
        error: String,
        /// When the latest attempt failed
        at: Time,
    },

    /// A snapshot is available, possibly stale
    Ready {
        /// Latest successful view
        view: Arc<DashboardView>,
        /// Error from the latest refresh, if it failed after this view was taken
        last_error: Option<String>,
    },
}

impl DashboardState {
    /// The displayed view, if any.
    pub fn view(&self) -> Option<&Arc<DashboardView>> {
        match self {
            DashboardState::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    /// True while showing data from before a failed refresh.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            DashboardState::Ready {
                last_error: Some(_),
                ..
            }
        )
    }

    /// True when the blocking error view applies.
    pub fn is_failed(&self) -> bool {
        matches!(self, DashboardState::Failed { .. })
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState::Loading
    }
}
