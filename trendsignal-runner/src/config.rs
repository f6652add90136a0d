//! Serializable run configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use trendsignal_core::{EngineConfig, IndicatorConfig};

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("failed to hash config: {0}")]
    Hash(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] trendsignal_core::ConfigError),
}

/// Everything needed to reproduce a replay.
///
/// ```toml
/// symbols = ["BTC_USD"]
///
/// [engine]
/// min_volatility = 0.05
/// thresholds = { up = 0.4, down = -0.3 }
///
/// [indicators]
/// ma_type = "ema"
/// short = 7
/// long = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Symbols to replay. Empty means every symbol in the data file.
    #[serde(default)]
    pub symbols: Vec<String>,
    pub engine: EngineConfig,
    pub indicators: IndicatorConfig,
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.indicators.validate()?;
        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, so their artifacts
    /// overwrite rather than accumulate.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex().to_string())
    }

    /// True when `symbol` is selected by this config.
    pub fn includes(&self, symbol: &str) -> bool {
        self.symbols.is_empty() || self.symbols.iter().any(|s| s == symbol)
    }
}
