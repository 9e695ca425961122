//! Plain-text tables for strategy reports.
//!
//! Every function returns the rendered text; `main` decides where it goes.

use std::fmt::Write;

use exitlab_core::domain::ROI_EXIT_REASON;
use exitlab_core::Strategy;
use exitlab_report::{ReportNode, ReportTree, ScoreCard, ScoreMetric, StrategyReport, Verdict};

use crate::format;

const NODE_COLUMNS: [(&str, usize); 6] = [
    ("Exits", 6),
    ("Avg Profit", 12),
    ("Tot Profit", 12),
    ("Tot Profit %", 13),
    ("Avg Duration", 14),
    ("StdDev Duration", 16),
];

/// Whether a node belongs in the ROI-exit table: longer than the coarse
/// `roi` label and starting with it.
pub fn is_roi_tier(reason: &str) -> bool {
    reason.len() > ROI_EXIT_REASON.len() && reason.starts_with(ROI_EXIT_REASON)
}

/// Flatten the tree and split it into exit-reason rows and ROI-tier rows,
/// each stably sorted by exits, most first.
pub fn split_rows(tree: &ReportTree) -> (Vec<&ReportNode>, Vec<&ReportNode>) {
    let (mut roi, mut exits): (Vec<&ReportNode>, Vec<&ReportNode>) = tree
        .flatten()
        .into_iter()
        .map(|(_, node)| node)
        .partition(|node| is_roi_tier(&node.reason));
    exits.sort_by(|a, b| b.exits.cmp(&a.exits));
    roi.sort_by(|a, b| b.exits.cmp(&a.exits));
    (exits, roi)
}

/// One table of report nodes under the given first-column title.
pub fn node_table(title: &str, rows: &[&ReportNode]) -> String {
    let width = rows
        .iter()
        .map(|n| n.reason.chars().count())
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(title.len());

    let mut out = String::new();
    let _ = write!(out, "{title:<width$}");
    for (name, w) in NODE_COLUMNS {
        let _ = write!(out, " {name:>w$}");
    }
    out.push('\n');
    let total_width = width + NODE_COLUMNS.iter().map(|(_, w)| w + 1).sum::<usize>();
    let _ = writeln!(out, "{}", "-".repeat(total_width));

    for node in rows {
        let cells = [
            node.exits.to_string(),
            format::number(node.avg_profit),
            format::number(node.total_profit),
            format::number(node.total_profit_pct),
            format::minutes(node.avg_duration as f64),
            format::minutes(node.std_dev_duration),
        ];
        let _ = write!(out, "{:<width$}", node.reason);
        for ((_, w), cell) in NODE_COLUMNS.iter().zip(cells) {
            let _ = write!(out, " {cell:>w$}", w = *w);
        }
        out.push('\n');
    }
    out
}

/// The TOTAL win/loss row from the strategy's summary fields.
pub fn win_loss_table(strategy: &Strategy) -> String {
    let trades = strategy.total_trades as f64;
    let currency = &strategy.stake_currency;
    let profit_header = format!("Tot Profit {currency}");
    let profit_width = profit_header.len().max(16);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>8} {:>12} {:>pw$} {:>12} {:>14} {:>6} {:>6} {:>6} {:>8}",
        "TAG",
        "Entries",
        "Avg Profit",
        profit_header,
        "Tot Profit %",
        "Avg Duration",
        "Wins",
        "Draws",
        "Loss",
        "Win %",
        pw = profit_width,
    );
    let _ = writeln!(out, "{}", "-".repeat(96 + profit_width - 16));
    let _ = writeln!(
        out,
        "{:<6} {:>8} {:>12} {:>pw$} {:>12} {:>14} {:>6} {:>6} {:>6} {:>8}",
        "TOTAL",
        strategy.total_trades,
        format::number(format::ratio(strategy.profit_total_abs, trades)),
        format::price(strategy.profit_total_abs, currency),
        format::percent(strategy.profit_total),
        format::seconds(strategy.holding_avg_secs),
        strategy.wins,
        strategy.draws,
        strategy.losses,
        format::percent(format::ratio(strategy.wins as f64, trades)),
        pw = profit_width,
    );
    out
}

fn score_cell(card: &ScoreCard) -> String {
    match card.verdict {
        Verdict::Scored => format::number(card.score),
        Verdict::Unprofitable => format!("{} (unprofitable)", format::number(card.score)),
        Verdict::OutOfDomain(metric) => {
            format!("{} ({} out of range)", format::number(card.score), metric.name())
        }
    }
}

/// Metric/value rows for one strategy. Empty rows separate blocks.
pub fn metric_rows(name: &str, strategy: &Strategy, report: &StrategyReport) -> Vec<(String, String)> {
    let cur = strategy.stake_currency.as_str();
    let price = |v: f64| format::price(v, cur);
    let days = strategy.backtest_days as f64;
    let blank = || (String::new(), String::new());
    let row = |label: &str, value: String| (label.to_string(), value);

    vec![
        row("Strategy", name.to_string()),
        row("Minimal ROI", report.roi_table.to_string()),
        row("Stoploss", format!("{:.4}", strategy.stoploss)),
        blank(),
        row("Backtest from", format::timestamp(strategy.backtest_start)),
        row("Backtest to", format::timestamp(strategy.backtest_end)),
        row("Max open trades", strategy.max_open_trades.to_string()),
        blank(),
        row(
            "Total/Daily Avg Trades",
            format!(
                "{} / {}",
                strategy.total_trades,
                format::number(format::ratio(strategy.total_trades as f64, days))
            ),
        ),
        row("Starting balance", price(strategy.starting_balance)),
        row("Final balance", price(strategy.final_balance)),
        row("Absolute profit", price(strategy.profit_total_abs)),
        row("Total profit %", format::percent(strategy.profit_total)),
        row("Avg profit %", format::percent(strategy.profit_mean)),
        row("CAGR %", format::percent(strategy.cagr)),
        row("Sortino", format::number(strategy.sortino)),
        row("Sharpe", format::number(strategy.sharpe)),
        row("Calmar", format::number(strategy.calmar)),
        row("Profit factor", format::number(strategy.profit_factor)),
        row("Expectancy", format::number(strategy.expectancy)),
        row("Trades per day", format::number(strategy.trades_per_day)),
        row(
            "Avg. daily profit %",
            format::number(format::ratio(strategy.profit_total * 100.0, days)),
        ),
        row("Avg. stake amount", price(strategy.avg_stake_amount)),
        row("Total trade volume", price(strategy.total_volume)),
        blank(),
        row(
            "Long / Short",
            format!("{} / {}", strategy.trade_count_long, strategy.trade_count_short),
        ),
        row("Total profit Long %", format::percent(strategy.profit_total_long)),
        row("Total profit Short %", format::percent(strategy.profit_total_short)),
        row("Absolute profit Long", price(strategy.profit_total_long_abs)),
        row("Absolute profit Short", price(strategy.profit_total_short_abs)),
        blank(),
        row("Avg. Duration Winners", format::seconds(strategy.winner_holding_avg_secs)),
        row("Avg. Duration Loser", format::seconds(strategy.loser_holding_avg_secs)),
        blank(),
        row("Min balance", price(strategy.min_balance)),
        row("Max balance", price(strategy.max_balance)),
        row("Max % of account underwater", format::percent(strategy.drawdown_relative)),
        row("Absolute Drawdown (Account)", format::percent(strategy.drawdown_account)),
        row("Absolute Drawdown", price(strategy.drawdown_abs)),
        row("Drawdown high", price(strategy.drawdown_high)),
        row("Drawdown low", price(strategy.drawdown_low)),
        row("Drawdown Start", format::timestamp(strategy.drawdown_start)),
        row("Drawdown End", format::timestamp(strategy.drawdown_end)),
        row("Market change", format::percent(strategy.market_change)),
        row("Score", score_cell(&report.score)),
    ]
}

/// Two-column key/value table.
pub fn key_value_table(header: (&str, &str), rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(k, _)| k.len())
        .chain(std::iter::once(header.0.len()))
        .max()
        .unwrap_or(header.0.len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {}", header.0, header.1);
    let _ = writeln!(out, "{}", "-".repeat(width + 2 + 24));
    for (key, value) in rows {
        if key.is_empty() && value.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{key:<width$}  {value}");
        }
    }
    out
}

/// All tables for one strategy, in print order.
pub fn strategy_report(strategy: &Strategy, report: &StrategyReport) -> String {
    let (exit_rows, roi_rows) = split_rows(&report.tree);

    let mut out = String::new();
    let _ = writeln!(out, "=== Strategy: {} ===", report.name);
    out.push('\n');
    out.push_str(&node_table("Exit Reason", &exit_rows));
    out.push('\n');
    out.push_str(&node_table("ROI exit Reason", &roi_rows));
    out.push('\n');
    out.push_str(&win_loss_table(strategy));
    out.push('\n');
    out.push_str(&key_value_table(
        ("Metric", "Value"),
        &metric_rows(&report.name, strategy, report),
    ));
    out
}

/// Per-metric breakdown for the `score` command.
pub fn score_table(card: &ScoreCard, inputs: &exitlab_core::SummaryMetrics) -> String {
    let mut rows: Vec<(String, String)> = ScoreMetric::ALL
        .iter()
        .map(|metric| {
            let contribution = card
                .contributions
                .iter()
                .find(|(m, _)| m == metric)
                .map(|(_, c)| format!("{c:+.4}"))
                .unwrap_or_else(|| "-".to_string());
            (
                metric.name().to_string(),
                format!("{:>10}  {contribution:>8}", format::number(metric.extract(inputs))),
            )
        })
        .collect();
    rows.push((String::new(), String::new()));
    rows.push(("score".to_string(), score_cell(card)));
    key_value_table(("Metric", "     Value  Weighted"), &rows)
}
