//! Report pipeline: classify, aggregate, finalize and score one strategy.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use exitlab_core::{load_backtest_result, BacktestResult, LoadError, RoiTable, Strategy, SummaryMetrics};

use crate::classify::Classifier;
use crate::config::{ConfigError, ReportConfig};
use crate::score::{ScoreCard, ScoreProfile, Verdict};
use crate::tree::ReportTree;

/// Errors from the report pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("strategy '{0}' not found in backtest result")]
    UnknownStrategy(String),
}

/// Finalized exit-reason report for one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub name: String,
    pub tree: ReportTree,
    /// Node samples recorded without a usable duration.
    pub zero_duration: usize,
    pub closed_trades: usize,
    pub roi_table: RoiTable,
    pub metrics: SummaryMetrics,
    pub score: ScoreCard,
}

/// Builds strategy reports with a fixed classifier and score profile.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    classifier: Classifier,
    profile: ScoreProfile,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportBuilder {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            classifier: Classifier::new(&config.classifier),
            profile: config.score,
        }
    }

    /// Classify and aggregate every trade, then finalize and score.
    pub fn build(&self, name: &str, strategy: &Strategy) -> StrategyReport {
        info!(strategy = name, "processing {} trades", strategy.trades.len());

        let roi_table = strategy.roi_table();
        let mut tree = ReportTree::new();
        let mut zero_duration = 0;
        for trade in &strategy.trades {
            let path = self.classifier.classify(trade, &roi_table);
            zero_duration += tree.add_trade(trade, &path);
        }
        tree.finalize();

        if zero_duration > 0 {
            warn!(strategy = name, zero_duration, "trades without duration excluded from duration stats");
        }

        let metrics = strategy.summary_metrics();
        let score = self.profile.evaluate(&metrics);
        if let Verdict::OutOfDomain(metric) = score.verdict {
            warn!(
                strategy = name,
                metric = metric.name(),
                value = metric.extract(&metrics),
                "score input outside log domain, strategy rejected"
            );
        }

        StrategyReport {
            name: name.to_string(),
            closed_trades: tree.total_exits(),
            tree,
            zero_duration,
            roi_table,
            metrics,
            score,
        }
    }

    /// Reports for every strategy, in name order.
    pub fn build_all(&self, result: &BacktestResult) -> Vec<StrategyReport> {
        result
            .strategy
            .iter()
            .map(|(name, strategy)| self.build(name, strategy))
            .collect()
    }

    pub fn build_one(&self, result: &BacktestResult, name: &str) -> Result<StrategyReport, ReportError> {
        let strategy = result
            .get(name)
            .ok_or_else(|| ReportError::UnknownStrategy(name.to_string()))?;
        Ok(self.build(name, strategy))
    }

    /// Every strategy, or only `only` when given.
    pub fn build_selected(
        &self,
        result: &BacktestResult,
        only: Option<&str>,
    ) -> Result<Vec<StrategyReport>, ReportError> {
        match only {
            Some(name) => Ok(vec![self.build_one(result, name)?]),
            None => Ok(self.build_all(result)),
        }
    }
}

/// A loaded backtest file with its reports.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub result: BacktestResult,
    pub reports: Vec<StrategyReport>,
}

impl LoadedReport {
    /// The strategy record a report was built from.
    pub fn strategy(&self, report: &StrategyReport) -> Option<&Strategy> {
        self.result.get(&report.name)
    }
}

/// Load a backtest file and build reports for it.
pub fn load_and_build(
    path: &Path,
    config: &ReportConfig,
    only: Option<&str>,
) -> Result<LoadedReport, ReportError> {
    let result = load_backtest_result(path)?;
    let reports = ReportBuilder::new(config).build_selected(&result, only)?;
    Ok(LoadedReport { result, reports })
}
