//! Domain types for ExitLab

pub mod roi;
pub mod strategy;
pub mod timestamp;
pub mod trade;

pub use roi::{RoiTable, RoiTier};
pub use strategy::{BacktestResult, Strategy, SummaryMetrics};
pub use trade::Trade;

/// Exit reason the backtester records for minimal-ROI exits.
pub const ROI_EXIT_REASON: &str = "roi";
