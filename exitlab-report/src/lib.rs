//! ExitLab Report: exit-reason analysis and strategy scoring.
//!
//! This crate builds on `exitlab-core` to provide:
//! - The trade classifier (exit reason plus ROI tier path)
//! - The hierarchical report tree and its aggregator
//! - The statistics finalizer with level-local percentages
//! - The log-scaled composite score
//! - TOML configuration and the per-strategy report pipeline

pub mod classify;
pub mod config;
pub mod finalize;
pub mod report;
pub mod score;
pub mod tree;

pub use classify::{classify, Classifier, ClassifierConfig, ReasonPath, ROI_CATCH_ALL};
pub use config::{ConfigError, ReportConfig};
pub use report::{load_and_build, LoadedReport, ReportBuilder, ReportError, StrategyReport};
pub use score::{score, Direction, MetricProfile, ScoreCard, ScoreMetric, ScoreProfile, Verdict, REJECT_SCORE};
pub use tree::{ReportNode, ReportTree};
