//! Composite strategy score.
//!
//! Each metric is mapped through `sensitivity * ln(1 + value / baseline)`,
//! negated for metrics where lower is better, and the results are combined
//! as a weighted sum. The log curve gives diminishing returns above the
//! baseline, so one outstanding metric cannot dominate the score.
//!
//! Strategies that lose money in expectation (profit factor below 1 or
//! negative expectancy) score exactly [`REJECT_SCORE`]. The same value is
//! returned when a metric falls outside the log's domain
//! (`value / baseline <= -1`), so the score is always finite.

use serde::{Deserialize, Serialize};

use exitlab_core::SummaryMetrics;

/// Score assigned to rejected strategies.
pub const REJECT_SCORE: f64 = -1.0;

/// Whether larger values of a metric improve or worsen the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

/// The five scored metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreMetric {
    Expectancy,
    ProfitFactor,
    Drawdown,
    AvgProfit,
    TotalProfit,
}

impl ScoreMetric {
    pub const ALL: [ScoreMetric; 5] = [
        Self::Expectancy,
        Self::ProfitFactor,
        Self::Drawdown,
        Self::AvgProfit,
        Self::TotalProfit,
    ];

    /// Extract the metric value from the summary.
    pub fn extract(&self, metrics: &SummaryMetrics) -> f64 {
        match self {
            Self::Expectancy => metrics.expectancy,
            Self::ProfitFactor => metrics.profit_factor,
            Self::Drawdown => metrics.drawdown_pct,
            Self::AvgProfit => metrics.avg_profit_pct,
            Self::TotalProfit => metrics.total_profit_pct,
        }
    }

    /// Drawdown is the only metric where more is worse.
    pub fn direction(&self) -> Direction {
        match self {
            Self::Drawdown => Direction::Negative,
            _ => Direction::Positive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Expectancy => "expectancy",
            Self::ProfitFactor => "profit_factor",
            Self::Drawdown => "drawdown",
            Self::AvgProfit => "avg_profit",
            Self::TotalProfit => "total_profit",
        }
    }
}

/// Baseline, sensitivity and weight for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricProfile {
    /// Value considered "good"; a metric at its baseline scores `sensitivity * ln 2`.
    pub baseline: f64,
    pub sensitivity: f64,
    pub weight: f64,
}

impl MetricProfile {
    pub const fn new(baseline: f64, sensitivity: f64, weight: f64) -> Self {
        Self {
            baseline,
            sensitivity,
            weight,
        }
    }

    /// Log-scaled, unweighted metric score. `None` outside the log's domain.
    pub fn transform(&self, value: f64, direction: Direction) -> Option<f64> {
        let arg = 1.0 + value / self.baseline;
        if !arg.is_finite() || arg <= 0.0 {
            return None;
        }
        let score = self.sensitivity * arg.ln();
        Some(match direction {
            Direction::Positive => score,
            Direction::Negative => -score,
        })
    }
}

/// One profile per scored metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreProfile {
    pub expectancy: MetricProfile,
    pub profit_factor: MetricProfile,
    pub drawdown: MetricProfile,
    pub avg_profit: MetricProfile,
    pub total_profit: MetricProfile,
}

impl Default for ScoreProfile {
    fn default() -> Self {
        Self {
            expectancy: MetricProfile::new(0.2, 2.0, 0.30),
            profit_factor: MetricProfile::new(2.0, 1.5, 0.25),
            drawdown: MetricProfile::new(2.0, 1.2, 0.20),
            avg_profit: MetricProfile::new(1.0, 1.0, 0.15),
            total_profit: MetricProfile::new(20.0, 1.0, 0.10),
        }
    }
}

/// Why a score has the value it has.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// Weighted sum of all metric transforms.
    Scored,
    /// Profit factor below 1 or negative expectancy.
    Unprofitable,
    /// The metric's value fell outside the log transform's domain.
    OutOfDomain(ScoreMetric),
}

/// A composite score with its per-metric weighted contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: f64,
    pub verdict: Verdict,
    /// Weighted contribution of each metric. Empty unless the verdict is `Scored`.
    pub contributions: Vec<(ScoreMetric, f64)>,
}

impl ScoreCard {
    fn rejected(verdict: Verdict) -> Self {
        Self {
            score: REJECT_SCORE,
            verdict,
            contributions: Vec::new(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.verdict != Verdict::Scored
    }
}

impl ScoreProfile {
    pub fn profile(&self, metric: ScoreMetric) -> &MetricProfile {
        match metric {
            ScoreMetric::Expectancy => &self.expectancy,
            ScoreMetric::ProfitFactor => &self.profit_factor,
            ScoreMetric::Drawdown => &self.drawdown,
            ScoreMetric::AvgProfit => &self.avg_profit,
            ScoreMetric::TotalProfit => &self.total_profit,
        }
    }

    /// Score a strategy, keeping the breakdown.
    ///
    /// The unprofitable check runs first and wins over everything else.
    pub fn evaluate(&self, metrics: &SummaryMetrics) -> ScoreCard {
        if metrics.profit_factor < 1.0 || metrics.expectancy < 0.0 {
            return ScoreCard::rejected(Verdict::Unprofitable);
        }

        let mut contributions = Vec::with_capacity(ScoreMetric::ALL.len());
        for metric in ScoreMetric::ALL {
            let profile = self.profile(metric);
            let Some(transformed) = profile.transform(metric.extract(metrics), metric.direction())
            else {
                return ScoreCard::rejected(Verdict::OutOfDomain(metric));
            };
            contributions.push((metric, profile.weight * transformed));
        }

        ScoreCard {
            score: contributions.iter().map(|(_, c)| c).sum(),
            verdict: Verdict::Scored,
            contributions,
        }
    }

    pub fn score(&self, metrics: &SummaryMetrics) -> f64 {
        self.evaluate(metrics).score
    }
}

/// Score with the default profile. Drawdown and profits are in percent.
pub fn score(
    expectancy: f64,
    profit_factor: f64,
    drawdown_pct: f64,
    avg_profit_pct: f64,
    total_profit_pct: f64,
) -> f64 {
    ScoreProfile::default().score(&SummaryMetrics {
        expectancy,
        profit_factor,
        drawdown_pct,
        avg_profit_pct,
        total_profit_pct,
    })
}
