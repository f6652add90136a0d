//! Replay result and its JSON artifact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use trendsignal_core::components::{IntentDirection, TradeIntent};
use trendsignal_core::domain::{StrategyPosition, Symbol};
use trendsignal_core::engine::{CrossoverEdgeState, TrendState};

use crate::config::RunId;
use crate::replay::RunError;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// One emitted intent and the position around it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentRecord {
    /// Bar trading when the intent was emitted.
    pub bar_index: usize,
    pub date: NaiveDate,
    /// Open of the trading bar, the price an execution layer would see.
    pub price: f64,
    #[serde(flatten)]
    pub intent: TradeIntent,
    pub position_before: StrategyPosition,
    pub position_after: StrategyPosition,
}

/// Complete result of replaying one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub schema_version: u32,
    pub run_id: RunId,
    pub symbol: Symbol,
    pub bar_count: usize,
    /// Bars skipped before every indicator was valid.
    pub warmup_bars: usize,
    /// Ticks evaluated by the engine.
    pub ticks: u64,
    pub intents: Vec<IntentRecord>,
    pub final_position: StrategyPosition,
    pub final_trend: TrendState,
    pub final_edge: CrossoverEdgeState,
    /// Engine diagnostics after the last tick.
    pub info: BTreeMap<String, f64>,
}

impl ReplayResult {
    pub fn buy_count(&self) -> usize {
        self.count(IntentDirection::Buy)
    }

    pub fn sell_count(&self) -> usize {
        self.count(IntentDirection::Sell)
    }

    fn count(&self, direction: IntentDirection) -> usize {
        self.intents
            .iter()
            .filter(|r| r.intent.direction == direction)
            .count()
    }

    /// Artifact file name: symbol plus the first 12 hex chars of the run id.
    ///
    /// The symbol is flattened to `[A-Za-z0-9_.-]` so the name never leaves
    /// the output directory.
    pub fn file_name(&self) -> String {
        let short_id = self.run_id.get(..12).unwrap_or(&self.run_id);
        format!("{}_{}.json", file_safe(&self.symbol), short_id)
    }
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`. Dots are
/// kept but a name made only of dots becomes underscores.
fn file_safe(symbol: &str) -> String {
    let mapped: String = symbol
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if mapped.is_empty() || mapped.chars().all(|c| c == '.') {
        "_".repeat(mapped.len().max(1))
    } else {
        mapped
    }
}

/// Write `result` as pretty JSON under `dir`, creating it if needed.
pub fn save_result(result: &ReplayResult, dir: &Path) -> Result<PathBuf, RunError> {
    std::fs::create_dir_all(dir).map_err(|source| RunError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(result.file_name());
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json).map_err(|source| RunError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

/// Read a previously saved artifact.
pub fn load_result(path: &Path) -> Result<ReplayResult, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_safe_keeps_plain_symbols() {
        assert_eq!(file_safe("BTC_USD"), "BTC_USD");
        assert_eq!(file_safe("BRK.B"), "BRK.B");
        assert_eq!(file_safe("ES-2024"), "ES-2024");
    }

    #[test]
    fn file_safe_flattens_separators() {
        assert_eq!(file_safe("BTC/USD"), "BTC_USD");
        assert_eq!(file_safe("../x"), ".._x");
        assert_eq!(file_safe("a\\b c"), "a_b_c");
        assert_eq!(file_safe(".."), "__");
        assert_eq!(file_safe(""), "_");
    }
}
