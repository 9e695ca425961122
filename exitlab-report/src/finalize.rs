//! Statistics finalizer: derives per-node statistics from raw samples.
//!
//! Percentages are local to each sibling group: a node's total profit is
//! divided by the sum of absolute totals of the nodes at its own level, not
//! by the grand total of the tree. Every division is guarded, so an empty
//! group or node yields zeros instead of NaN.

use crate::tree::{ReportNode, ReportTree};

impl ReportTree {
    /// Compute derived fields for every node. Idempotent: derived fields are
    /// overwritten from the raw samples on each call.
    pub fn finalize(&mut self) {
        let mut absolute_total = 0.0;
        for node in self.nodes_mut() {
            node.compute_stats();
            absolute_total += node.total_profit.abs();
        }

        for node in self.nodes_mut() {
            node.total_profit_pct = percentage_of(node.total_profit, absolute_total);
            node.children.finalize();
        }
    }
}

impl ReportNode {
    fn compute_stats(&mut self) {
        self.total_profit = self.profits.iter().sum();
        self.avg_profit = if self.profits.is_empty() {
            0.0
        } else {
            self.total_profit / self.profits.len() as f64
        };

        let total_duration: i64 = self.durations.iter().sum();
        let samples = self.durations.len().max(1) as i64;
        self.avg_duration = total_duration / samples;

        let durations: Vec<f64> = self.durations.iter().map(|&d| d as f64).collect();
        self.std_dev_duration = population_std_dev(&durations);
    }
}

/// `value / total * 100`, or 0 when the total is zero.
fn percentage_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    value / total * 100.0
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n). 0 for an empty slice.
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ReasonPath;
    use exitlab_core::Trade;

    fn trade(profit_abs: f64, duration: i64) -> Trade {
        Trade {
            exit_reason: String::new(),
            profit_abs,
            profit_ratio: 0.0,
            is_open: false,
            duration,
        }
    }

    fn path(segments: &[&str]) -> ReasonPath {
        ReasonPath::new(segments.iter().map(|s| s.to_string()).collect())
    }

    fn sample_tree() -> ReportTree {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(15.0, 20), &path(&["roi", "roi 0:0.100"]));
        tree.add_trade(&trade(5.0, 70), &path(&["roi", "roi 60:0.020"]));
        tree.add_trade(&trade(-8.0, 120), &path(&["stop_loss"]));
        tree.add_trade(&trade(-6.0, 40), &path(&["stop_loss"]));
        tree.finalize();
        tree
    }

    // ── Profit ──

    #[test]
    fn totals_and_averages() {
        let tree = sample_tree();
        let roi = tree.get("roi").unwrap();
        assert!((roi.total_profit - 20.0).abs() < 1e-12);
        assert!((roi.avg_profit - 10.0).abs() < 1e-12);
        let sl = tree.get("stop_loss").unwrap();
        assert!((sl.total_profit - (-14.0)).abs() < 1e-12);
        assert!((sl.avg_profit - (-7.0)).abs() < 1e-12);
    }

    #[test]
    fn percentages_use_level_local_absolute_total() {
        let tree = sample_tree();
        // Root: |20| + |-14| = 34
        let roi = tree.get("roi").unwrap();
        assert!((roi.total_profit_pct - 20.0 / 34.0 * 100.0).abs() < 1e-9);
        let sl = tree.get("stop_loss").unwrap();
        assert!((sl.total_profit_pct - (-14.0 / 34.0 * 100.0)).abs() < 1e-9);

        // Children of roi: |15| + |5| = 20
        let tier = roi.children.get("roi 0:0.100").unwrap();
        assert!((tier.total_profit_pct - 75.0).abs() < 1e-9);
        let tier = roi.children.get("roi 60:0.020").unwrap();
        assert!((tier.total_profit_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn zero_absolute_total_gives_zero_percent() {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(0.0, 10), &path(&["exit_signal"]));
        tree.add_trade(&trade(0.0, 10), &path(&["stop_loss"]));
        tree.finalize();
        for node in tree.nodes() {
            assert_eq!(node.total_profit_pct, 0.0);
        }
    }

    #[test]
    fn empty_node_is_all_zero() {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(1.0, 10), &path(&["x"]));
        tree.nodes_mut()[0].profits.clear();
        tree.nodes_mut()[0].durations.clear();
        tree.finalize();

        let node = tree.get("x").unwrap();
        assert_eq!(node.avg_profit, 0.0);
        assert_eq!(node.total_profit, 0.0);
        assert_eq!(node.total_profit_pct, 0.0);
        assert_eq!(node.avg_duration, 0);
        assert_eq!(node.std_dev_duration, 0.0);
    }

    // ── Duration ──

    #[test]
    fn duration_average_truncates_to_whole_minutes() {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(1.0, 10), &path(&["roi"]));
        tree.add_trade(&trade(1.0, 15), &path(&["roi"]));
        tree.finalize();
        assert_eq!(tree.get("roi").unwrap().avg_duration, 12);
    }

    #[test]
    fn duration_std_dev_is_population() {
        let tree = sample_tree();
        // stop_loss durations 120 and 40: mean 80, population std 40
        let sl = tree.get("stop_loss").unwrap();
        assert_eq!(sl.avg_duration, 80);
        assert!((sl.std_dev_duration - 40.0).abs() < 1e-12);
    }

    #[test]
    fn zero_durations_excluded_from_duration_stats() {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(1.0, 0), &path(&["roi"]));
        tree.add_trade(&trade(1.0, 30), &path(&["roi"]));
        tree.finalize();
        let roi = tree.get("roi").unwrap();
        assert_eq!(roi.exits, 2);
        assert_eq!(roi.avg_duration, 30);
        assert_eq!(roi.std_dev_duration, 0.0);
        assert!((roi.total_profit - 2.0).abs() < 1e-12);
    }

    #[test]
    fn only_zero_durations_average_zero() {
        let mut tree = ReportTree::new();
        tree.add_trade(&trade(1.0, 0), &path(&["roi"]));
        tree.finalize();
        assert_eq!(tree.get("roi").unwrap().avg_duration, 0);
    }

    // ── Idempotence ──

    #[test]
    fn finalize_twice_is_stable() {
        let once = sample_tree();
        let mut twice = once.clone();
        twice.finalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_tree_finalizes() {
        let mut tree = ReportTree::new();
        tree.finalize();
        assert!(tree.is_empty());
    }

    // ── Helpers ──

    #[test]
    fn std_dev_helpers() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[7.0]), 0.0);
        assert!((population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
        assert_eq!(mean_f64(&[]), 0.0);
    }
}
