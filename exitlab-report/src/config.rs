//! Report configuration loaded from TOML.
//!
//! Every section is optional and falls back to the built-in defaults, so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classify::ClassifierConfig;
use crate::score::{ScoreMetric, ScoreProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Classifier and score settings for one report run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub classifier: ClassifierConfig,
    pub score: ScoreProfile,
}

impl ReportConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the log transform and classifier rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fallbacks = &self.classifier.roi_fallbacks;
        if let Some(bad) = fallbacks.iter().find(|f| !f.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "classifier.roi_fallbacks contains non-finite value {bad}"
            )));
        }
        if fallbacks.windows(2).any(|w| w[0] < w[1]) {
            return Err(ConfigError::Invalid(
                "classifier.roi_fallbacks must be sorted highest first".into(),
            ));
        }

        for metric in ScoreMetric::ALL {
            let profile = self.score.profile(metric);
            let name = metric.name();
            if !profile.baseline.is_finite() || profile.baseline <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "score.{name}.baseline must be positive, got {}",
                    profile.baseline
                )));
            }
            if !profile.sensitivity.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "score.{name}.sensitivity must be finite, got {}",
                    profile.sensitivity
                )));
            }
            if !profile.weight.is_finite() || profile.weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "score.{name}.weight must be non-negative, got {}",
                    profile.weight
                )));
            }
        }
        Ok(())
    }
}
