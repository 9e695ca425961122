//! One position as recorded by the backtester.

use serde::{Deserialize, Serialize};

use super::ROI_EXIT_REASON;

/// A single trade from the backtest record.
///
/// Only the fields the exit-reason breakdown needs are decoded; the record
/// carries many more, which serde skips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Exit category as recorded by the engine (`roi`, `stop_loss`, `exit_signal`, ...).
    #[serde(default)]
    pub exit_reason: String,
    /// Absolute profit in stake currency.
    #[serde(default)]
    pub profit_abs: f64,
    /// Profit as a fraction of the stake (0.05 = 5%).
    #[serde(default)]
    pub profit_ratio: f64,
    #[serde(default)]
    pub is_open: bool,
    /// Duration in minutes. `0` means the backtester did not record one.
    #[serde(rename = "trade_duration", default)]
    pub duration: i64,
}

impl Trade {
    pub fn is_roi_exit(&self) -> bool {
        self.exit_reason == ROI_EXIT_REASON
    }

    /// Whether the duration is usable for duration statistics.
    pub fn has_duration(&self) -> bool {
        self.duration > 0
    }
}
