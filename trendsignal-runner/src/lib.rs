//! TrendSignal Runner: run configuration, bar loading, replay harness, result artifacts.
//!
//! This crate builds on `trendsignal-core` to provide:
//! - TOML run configuration with a deterministic BLAKE3 run id
//! - CSV bar loading grouped per symbol
//! - Indicator precompute and a bar-replay `IndicatorSource`
//! - Per-symbol replay, parallel across symbols with rayon
//! - JSON result artifacts

pub mod config;
pub mod data_loader;
pub mod feed;
pub mod replay;
pub mod result;

pub use config::{ConfigError, RunConfig, RunId};
pub use data_loader::{load_bars_csv, read_bars_csv, BarsBySymbol, LoadError};
pub use feed::{precompute, BarFeed, SeriesKeys};
pub use replay::{replay, replay_universe, ReplayPosition, RunError};
pub use result::{load_result, save_result, IntentRecord, ReplayResult, SCHEMA_VERSION};
