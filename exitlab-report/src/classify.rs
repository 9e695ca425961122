//! Trade classifier: maps a trade to its exit-reason path.
//!
//! Non-ROI exits keep their recorded reason as a single segment. ROI exits
//! get a second segment naming the ladder rung that fired, found by a
//! first-match scan over the tier table in the order given. The table must
//! already be sorted highest threshold first; the classifier does not sort.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use exitlab_core::domain::ROI_EXIT_REASON;
use exitlab_core::{RoiTable, Trade};

/// Fallback thresholds applied when no configured tier matches, highest first.
pub const DEFAULT_ROI_FALLBACKS: [f64; 2] = [0.02, 0.01];

/// Label for ROI exits below every configured tier and every fallback.
pub const ROI_CATCH_ALL: &str = "roi inf+";

/// Ordered exit-reason labels, general to specific.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReasonPath(Vec<String>);

impl ReasonPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn single(reason: impl Into<String>) -> Self {
        Self(vec![reason.into()])
    }

    pub fn roi(label: impl Into<String>) -> Self {
        Self(vec![ROI_EXIT_REASON.to_string(), label.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Most specific label on the path.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }
}

impl From<Vec<String>> for ReasonPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for ReasonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Thresholds tried in order after the configured tiers, highest first.
    pub roi_fallbacks: Vec<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            roi_fallbacks: DEFAULT_ROI_FALLBACKS.to_vec(),
        }
    }
}

/// Stateless classifier holding the fallback ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    fallbacks: Vec<f64>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            fallbacks: config.roi_fallbacks.clone(),
        }
    }

    pub fn fallbacks(&self) -> &[f64] {
        &self.fallbacks
    }

    /// Classify one trade. Open trades are classified like closed ones.
    pub fn classify(&self, trade: &Trade, tiers: &RoiTable) -> ReasonPath {
        if !trade.is_roi_exit() {
            return ReasonPath::single(trade.exit_reason.clone());
        }

        if let Some(tier) = tiers
            .tiers()
            .iter()
            .find(|tier| trade.profit_ratio >= tier.threshold)
        {
            return ReasonPath::roi(tier.reason_label());
        }

        if let Some(threshold) = self
            .fallbacks
            .iter()
            .find(|&&threshold| trade.profit_ratio >= threshold)
        {
            return ReasonPath::roi(format!("roi art:{threshold}"));
        }

        debug!(
            profit_abs = trade.profit_abs,
            profit_ratio = trade.profit_ratio,
            "roi exit below every tier"
        );
        ReasonPath::roi(ROI_CATCH_ALL)
    }
}

/// Classify with the default fallback ladder.
pub fn classify(trade: &Trade, tiers: &RoiTable) -> ReasonPath {
    Classifier::default().classify(trade, tiers)
}
