//! Bar: the closed candle the engine's confirmation rule looks at.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TrendDirection;

/// OHLCV bar for a single symbol and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Direction of the candle body: up if it closed above its open,
    /// down if below, none for a doji or a void bar.
    pub fn candle_trend(&self) -> TrendDirection {
        if self.close > self.open {
            TrendDirection::Up
        } else if self.close < self.open {
            TrendDirection::Down
        } else {
            TrendDirection::None
        }
    }
}
