//! Replay harness: drives one `TrendSignalEngine` per symbol over historical bars.
//!
//! The harness plays the host's role: it refreshes indicators each tick,
//! forwards intents to a sink and applies the exit rule the engine leaves to
//! external logic (an intent against an open position flattens it).

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};
use trendsignal_core::components::{IndicatorSource, IntentDirection, PositionTracker, TradeIntent};
use trendsignal_core::domain::{Bar, StrategyPosition};
use trendsignal_core::TrendSignalEngine;

use crate::config::{ConfigError, RunConfig, RunId};
use crate::data_loader::{BarsBySymbol, LoadError};
use crate::feed::{precompute, BarFeed, SeriesKeys};
use crate::result::{IntentRecord, ReplayResult, SCHEMA_VERSION};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("symbol '{0}' not found in loaded data")]
    SymbolNotFound(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Position tracker for replay: the engine's entries plus the exit rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayPosition(StrategyPosition);

impl ReplayPosition {
    /// Flatten when `intent` opposes the open position. Returns true if it did.
    pub fn apply_exit(&mut self, intent: &TradeIntent) -> bool {
        let opposed = matches!(
            (self.0, intent.direction),
            (StrategyPosition::Long, IntentDirection::Sell)
                | (StrategyPosition::Short, IntentDirection::Buy)
        );
        if opposed {
            self.0 = StrategyPosition::None;
        }
        opposed
    }
}

impl PositionTracker for ReplayPosition {
    fn get(&self) -> StrategyPosition {
        self.0
    }

    fn set(&mut self, position: StrategyPosition) {
        self.0 = position;
    }
}

/// Replay one symbol's bars through a fresh engine.
pub fn replay(symbol: &str, bars: &[Bar], config: &RunConfig) -> Result<ReplayResult, RunError> {
    config.validate()?;
    let run_id = config.run_id()?;
    Ok(replay_with_id(symbol, bars, config, &run_id))
}

/// Replay every selected symbol in parallel, one independent engine each.
///
/// Results come back in symbol order.
pub fn replay_universe(
    data: &BarsBySymbol,
    config: &RunConfig,
) -> Result<Vec<ReplayResult>, RunError> {
    config.validate()?;
    let run_id = config.run_id()?;

    if let Some(missing) = config.symbols.iter().find(|s| !data.contains_key(*s)) {
        return Err(RunError::SymbolNotFound(missing.clone()));
    }

    let selected: Vec<(&String, &Vec<Bar>)> =
        data.iter().filter(|(s, _)| config.includes(s)).collect();
    info!(symbols = selected.len(), run_id = %run_id, "starting replay");

    let results: Vec<ReplayResult> = selected
        .par_iter()
        .map(|(symbol, bars)| replay_with_id(symbol, bars, config, &run_id))
        .collect();
    Ok(results)
}

fn replay_with_id(symbol: &str, bars: &[Bar], config: &RunConfig, run_id: &RunId) -> ReplayResult {
    let values = precompute(bars, &config.indicators);
    let keys = SeriesKeys::from_config(&config.indicators);
    let warmup = config.indicators.warmup_bars();

    let mut engine =
        TrendSignalEngine::new(config.engine.clone()).with_interval(config.indicators.interval);
    let mut position = ReplayPosition::default();
    let mut intents = Vec::new();
    let mut feed = BarFeed::new(bars, &values, &keys);

    // tick i reads closed bar i - 1, which must be past warmup
    for index in (warmup + 1)..bars.len() {
        if !feed.seek(index) {
            break;
        }
        let before = position.get();
        let Some(intent) = engine.evaluate(&feed.snapshot(), &mut position) else {
            continue;
        };
        if position.apply_exit(&intent) {
            debug!(symbol, bar = index, "position flattened by opposing intent");
        }
        let bar = feed.current_bar();
        intents.push(IntentRecord {
            bar_index: index,
            date: bar.date,
            price: bar.open,
            intent,
            position_before: before,
            position_after: position.get(),
        });
    }

    info!(
        symbol,
        bars = bars.len(),
        intents = intents.len(),
        "replay complete"
    );

    ReplayResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id.clone(),
        symbol: symbol.to_string(),
        bar_count: bars.len(),
        warmup_bars: warmup.min(bars.len()),
        ticks: engine.ticks(),
        intents,
        final_position: position.get(),
        final_trend: engine.trend_state(),
        final_edge: engine.edge_state(),
        // JSON has no NaN; warmup readings are dropped
        info: engine
            .info()
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(direction: IntentDirection) -> TradeIntent {
        use trendsignal_core::components::IntentTrigger;
        match direction {
            IntentDirection::Buy => TradeIntent::buy(1.0, "t", IntentTrigger::Crossover),
            IntentDirection::Sell => TradeIntent::sell(1.0, "t", IntentTrigger::Crossover),
        }
    }

    #[test]
    fn opposing_intent_flattens() {
        let mut pos = ReplayPosition::default();
        pos.set(StrategyPosition::Long);
        assert!(!pos.apply_exit(&intent(IntentDirection::Buy)));
        assert_eq!(pos.get(), StrategyPosition::Long);
        assert!(pos.apply_exit(&intent(IntentDirection::Sell)));
        assert_eq!(pos.get(), StrategyPosition::None);

        pos.set(StrategyPosition::Short);
        assert!(pos.apply_exit(&intent(IntentDirection::Buy)));
        assert!(pos.get().is_flat());
    }

    #[test]
    fn flat_position_is_untouched() {
        let mut pos = ReplayPosition::default();
        assert!(!pos.apply_exit(&intent(IntentDirection::Sell)));
        assert_eq!(pos.get(), StrategyPosition::None);
    }
}
