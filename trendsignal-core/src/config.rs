//! Engine and indicator configuration.
//!
//! Static per engine instance. Deserialized from the `[engine]` and
//! `[indicators]` tables of a run file; `validate()` is the only place
//! parameter errors surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::{Aroon, Bollinger, LineDiff, MaType};

/// Errors from configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("thresholds.up ({up}) must be >= thresholds.down ({down})")]
    InvertedThresholds { up: f64, down: f64 },
    #[error("min_volatility must be >= 0, got {0}")]
    NegativeVolatility(f64),
    #[error("default_weight must be within [0, 1], got {0}")]
    WeightOutOfRange(f64),
    #[error("{0} must be >= 1")]
    ZeroPeriod(&'static str),
    #[error("short period ({short}) must be < long period ({long})")]
    InvertedPeriods { short: usize, long: usize },
    #[error("bollinger_multiplier must be positive and finite, got {0}")]
    InvalidMultiplier(f64),
}

/// Line-diff band edges. `down` is normally negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub up: f64,
    pub down: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            up: 1.0,
            down: -1.0,
        }
    }
}

/// Decision parameters of a `TrendSignalEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bollinger bandwidth below which the crossover branch stays silent.
    #[serde(default = "default_min_volatility")]
    pub min_volatility: f64,
    pub thresholds: Thresholds,
    #[serde(default = "default_weight")]
    pub default_weight: f64,
    /// Carried onto every intent as an execution hint.
    #[serde(default = "default_make_only")]
    pub make_only: bool,
}

fn default_min_volatility() -> f64 {
    0.05
}

fn default_weight() -> f64 {
    1.0
}

fn default_make_only() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_volatility: default_min_volatility(),
            thresholds: Thresholds::default(),
            default_weight: default_weight(),
            make_only: default_make_only(),
        }
    }
}

impl EngineConfig {
    pub fn with_thresholds(up: f64, down: f64) -> Self {
        Self {
            thresholds: Thresholds { up, down },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Thresholds { up, down } = self.thresholds;
        finite("thresholds.up", up)?;
        finite("thresholds.down", down)?;
        finite("min_volatility", self.min_volatility)?;
        finite("default_weight", self.default_weight)?;

        if up < down {
            return Err(ConfigError::InvertedThresholds { up, down });
        }
        if self.min_volatility < 0.0 {
            return Err(ConfigError::NegativeVolatility(self.min_volatility));
        }
        if !(0.0..=1.0).contains(&self.default_weight) {
            return Err(ConfigError::WeightOutOfRange(self.default_weight));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

/// Which indicators feed the engine and with what parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Moving average used for the crossover pair.
    #[serde(default)]
    pub ma_type: MaType,
    pub short: usize,
    pub long: usize,
    /// Aroon lookback in candles.
    #[serde(default = "default_interval")]
    pub interval: usize,
    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,
    #[serde(default = "default_bollinger_multiplier")]
    pub bollinger_multiplier: f64,
}

fn default_interval() -> usize {
    30
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_multiplier() -> f64 {
    2.0
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_type: MaType::default(),
            short: 2,
            long: 7,
            interval: default_interval(),
            bollinger_period: default_bollinger_period(),
            bollinger_multiplier: default_bollinger_multiplier(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short == 0 {
            return Err(ConfigError::ZeroPeriod("short"));
        }
        if self.long == 0 {
            return Err(ConfigError::ZeroPeriod("long"));
        }
        if self.short >= self.long {
            return Err(ConfigError::InvertedPeriods {
                short: self.short,
                long: self.long,
            });
        }
        if self.interval == 0 {
            return Err(ConfigError::ZeroPeriod("interval"));
        }
        if self.bollinger_period == 0 {
            return Err(ConfigError::ZeroPeriod("bollinger_period"));
        }
        if !(self.bollinger_multiplier > 0.0 && self.bollinger_multiplier.is_finite()) {
            return Err(ConfigError::InvalidMultiplier(self.bollinger_multiplier));
        }
        Ok(())
    }

    pub fn short_key(&self) -> String {
        self.ma_type.key(self.short)
    }

    pub fn long_key(&self) -> String {
        self.ma_type.key(self.long)
    }

    /// The full indicator set the engine reads, in a fixed order:
    /// short MA, long MA, line diff, Aroon up, Aroon down, Bollinger bandwidth.
    ///
    /// Panics on invalid periods; call `validate()` first.
    pub fn indicators(&self) -> Vec<Box<dyn crate::components::Indicator>> {
        vec![
            self.ma_type.build(self.short),
            self.ma_type.build(self.long),
            Box::new(LineDiff::new(self.ma_type, self.short, self.long)),
            Box::new(Aroon::up(self.interval)),
            Box::new(Aroon::down(self.interval)),
            Box::new(Bollinger::bandwidth(
                self.bollinger_period,
                self.bollinger_multiplier,
            )),
        ]
    }

    /// Bars needed before every indicator in the set is valid.
    pub fn warmup_bars(&self) -> usize {
        self.indicators()
            .iter()
            .map(|ind| ind.lookback())
            .max()
            .unwrap_or(0)
    }
}
