//! Strategy records and the top-level backtest result.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::roi::{MinimalRoi, RoiTable};
use super::timestamp;
use super::trade::Trade;

/// Root of the backtest result document: one record per strategy.
///
/// Keyed by strategy name; a `BTreeMap` keeps iteration order stable so
/// reports come out in the same order on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default)]
    pub strategy: BTreeMap<String, Strategy>,
}

impl BacktestResult {
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategy.keys().map(|s| s.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Strategy> {
        self.strategy.get(name)
    }
}

/// Backtest results for a single strategy.
///
/// Ratios (`profit_total`, `profit_mean`, `max_relative_drawdown`, ...) are
/// fractions: 0.05 means 5%. Every field defaults so partial records load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    // ── General ──
    #[serde(with = "timestamp")]
    pub backtest_start: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub backtest_end: Option<NaiveDateTime>,
    pub backtest_days: i64,

    // ── Finance ──
    pub total_trades: i64,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub profit_total_abs: f64,
    pub profit_total: f64,
    pub profit_mean: f64,
    pub profit_factor: f64,
    pub cagr: f64,
    pub sortino: f64,
    pub sharpe: f64,
    pub calmar: f64,
    pub expectancy: f64,
    pub trades_per_day: f64,
    pub avg_stake_amount: f64,
    pub total_volume: f64,
    pub trade_count_long: i64,
    pub trade_count_short: i64,
    pub profit_total_long: f64,
    pub profit_total_short: f64,
    pub profit_total_long_abs: f64,
    pub profit_total_short_abs: f64,

    // ── Outcomes ──
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    /// Average holding time in seconds.
    #[serde(rename = "holding_avg_s")]
    pub holding_avg_secs: f64,
    #[serde(rename = "winner_holding_avg_s")]
    pub winner_holding_avg_secs: f64,
    #[serde(rename = "loser_holding_avg_s")]
    pub loser_holding_avg_secs: f64,

    // ── Balance and drawdown ──
    #[serde(rename = "csum_min")]
    pub min_balance: f64,
    #[serde(rename = "csum_max")]
    pub max_balance: f64,
    #[serde(rename = "max_relative_drawdown")]
    pub drawdown_relative: f64,
    #[serde(rename = "max_drawdown_account")]
    pub drawdown_account: f64,
    #[serde(rename = "max_drawdown_abs")]
    pub drawdown_abs: f64,
    #[serde(rename = "max_drawdown_high")]
    pub drawdown_high: f64,
    #[serde(rename = "max_drawdown_low")]
    pub drawdown_low: f64,
    #[serde(with = "timestamp")]
    pub drawdown_start: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub drawdown_end: Option<NaiveDateTime>,
    pub market_change: f64,

    // ── Trades ──
    pub trades: Vec<Trade>,

    // ── Config ──
    pub max_open_trades: i64,
    pub minimal_roi: MinimalRoi,
    pub stake_currency: String,
    pub stoploss: f64,
}

impl Strategy {
    /// Minimal-ROI tiers sorted for classification.
    pub fn roi_table(&self) -> RoiTable {
        RoiTable::from_minimal_roi(&self.minimal_roi)
    }

    /// The five scoring inputs, converted from fractions to percentages
    /// where the score expects percentage units.
    pub fn summary_metrics(&self) -> SummaryMetrics {
        SummaryMetrics {
            expectancy: self.expectancy,
            profit_factor: self.profit_factor,
            drawdown_pct: self.drawdown_relative * 100.0,
            avg_profit_pct: self.profit_mean * 100.0,
            total_profit_pct: self.profit_total * 100.0,
        }
    }

    pub fn closed_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.is_open)
    }
}

/// Strategy-level scalars consumed by the score calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub expectancy: f64,
    pub profit_factor: f64,
    /// Maximum relative drawdown, in percent.
    pub drawdown_pct: f64,
    /// Mean profit per trade, in percent.
    pub avg_profit_pct: f64,
    /// Total profit, in percent.
    pub total_profit_pct: f64,
}
