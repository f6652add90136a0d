//! TrendSignal Core: domain types, indicators, the trend signal engine and its configuration.
//!
//! This crate contains the decision core:
//! - Domain types (bars, trend direction, strategy position)
//! - Indicator trait and the indicators the engine reads (SMA/EMA/DEMA, Aroon, Bollinger, line diff)
//! - Capability traits at the engine's seams (indicator source, signal sink, position tracker)
//! - `TrendSignalEngine`: Aroon breakout confirmation, volatility gate, crossover decision
//! - Engine and indicator configuration with validation

pub mod components;
pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;

pub use config::{ConfigError, EngineConfig, IndicatorConfig, Thresholds};
pub use engine::TrendSignalEngine;
