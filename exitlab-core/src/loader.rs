//! Backtest-result loading.
//!
//! Reads the JSON document the backtester writes and decodes it into a
//! [`BacktestResult`]. Nothing is validated beyond what decoding requires.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::BacktestResult;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode backtest result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Load a backtest result from a JSON file.
pub fn load_backtest_result(path: &Path) -> Result<BacktestResult, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = content.len(), "read backtest result");

    let result = parse_backtest_result(&content)?;
    info!(strategies = result.strategy.len(), "loaded backtest result");
    Ok(result)
}

/// Decode a backtest result from an in-memory JSON string.
pub fn parse_backtest_result(content: &str) -> Result<BacktestResult, LoadError> {
    Ok(serde_json::from_str(content)?)
}
