//! ExitLab Core: domain types and backtest-record loading.
//!
//! This crate contains everything the analysis layer reads:
//! - Trade and strategy records as written by the backtester
//! - The sorted minimal-ROI tier table
//! - Timestamp decoding for the backtester's `YYYY-MM-DD HH:MM:SS` format
//! - File loading with typed errors

pub mod domain;
pub mod loader;

pub use domain::{BacktestResult, RoiTable, RoiTier, Strategy, SummaryMetrics, Trade};
pub use loader::{load_backtest_result, parse_backtest_result, LoadError};
