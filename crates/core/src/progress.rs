//! Target achievement and progress bands.

use serde::{Deserialize, Serialize};

/// Transaction target used when neither config nor backend supply one.
pub const DEFAULT_TRANSACTIONS_TARGET: f64 = 21_500.0;

/// Coarse progress bucket used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// 80% or more
    Strong,
    /// 50% up to 80%
    Moderate,
    /// Below 50%
    Weak,
}

impl ProgressBand {
    /// Bucket a percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ProgressBand::Strong
        } else if percentage >= 50.0 {
            ProgressBand::Moderate
        } else {
            ProgressBand::Weak
        }
    }
}

/// Achievement of one metric against its monthly target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetProgress {
    /// Month-to-date value
    pub achieved: f64,

    /// Full-month target
    pub target: f64,

    /// Unclamped percentage
    pub percentage: f64,

    /// Percentage clamped to [0, 100] for display
    pub display_percentage: f64,

    /// Colour bucket of the display percentage
    pub band: ProgressBand,
}

impl TargetProgress {
    /// Progress computed from achieved / target; zero when target is zero.
    pub fn from_totals(achieved: f64, target: f64) -> Self {
        let percentage = if target > 0.0 {
            achieved / target * 100.0
        } else {
            0.0
        };
        Self::with_percentage(achieved, target, percentage)
    }

    /// Progress with an externally reported percentage.
    pub fn with_percentage(achieved: f64, target: f64, percentage: f64) -> Self {
        let percentage = if percentage.is_finite() { percentage } else { 0.0 };
        let display_percentage = percentage.clamp(0.0, 100.0);

        Self {
            achieved,
            target,
            percentage,
            display_percentage,
            band: ProgressBand::from_percentage(display_percentage),
        }
    }
}
