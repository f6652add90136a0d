//! Directional vocabulary shared by the engine and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market direction as seen by one detector (Aroon breakout, MA crossover, candle body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    #[default]
    None,
    Up,
    Down,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::None => "none",
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
        };
        f.write_str(s)
    }
}

/// Simplified directional stance of a strategy.
///
/// Distinct from filled quantity: it only gates new entries versus forced exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPosition {
    #[default]
    None,
    Long,
    Short,
}

impl StrategyPosition {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for StrategyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyPosition::None => "none",
            StrategyPosition::Long => "long",
            StrategyPosition::Short => "short",
        };
        f.write_str(s)
    }
}
