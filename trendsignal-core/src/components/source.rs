//! Indicator source: the engine's only view of market data.
//!
//! The host refreshes its indicators once per tick, then the engine reads the
//! values through this narrow interface. The engine never computes indicators
//! itself and never mutates a snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::TrendDirection;

/// The last closed candle and the price traded since, used to confirm an
/// up-crossover before buying into it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleContext {
    /// Body direction of the last closed candle.
    pub candle_trend: TrendDirection,
    pub last_close: f64,
    /// Average price trading now, after `last_close` was printed.
    pub avg_market_price: f64,
}

impl CandleContext {
    pub fn new(candle_trend: TrendDirection, last_close: f64, avg_market_price: f64) -> Self {
        Self {
            candle_trend,
            last_close,
            avg_market_price,
        }
    }

    /// True when the candle closed up and the market is still trading above its close.
    pub fn confirms_up(&self) -> bool {
        self.candle_trend == TrendDirection::Up && self.avg_market_price > self.last_close
    }
}

/// Indicator readings for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub short_ma: f64,
    pub long_ma: f64,
    /// Signed percentage gap: `(short_ma - long_ma) / long_ma * 100`.
    pub line_diff_percent: f64,
    pub aroon_up: f64,
    pub aroon_down: f64,
    pub bollinger_bandwidth: f64,
    pub candle: CandleContext,
}

/// `(short - long) / long * 100`, `NaN` when `long` is zero or either side is not finite.
pub fn line_diff_percent(short_ma: f64, long_ma: f64) -> f64 {
    if long_ma == 0.0 || !short_ma.is_finite() || !long_ma.is_finite() {
        return f64::NAN;
    }
    (short_ma - long_ma) / long_ma * 100.0
}

/// Capability interface over whatever computes the indicators.
pub trait IndicatorSource {
    fn short_ma(&self) -> f64;
    fn long_ma(&self) -> f64;
    fn line_diff_percent(&self) -> f64;
    fn aroon_up(&self) -> f64;
    fn aroon_down(&self) -> f64;
    fn bollinger_bandwidth(&self) -> f64;
    fn candle(&self) -> CandleContext;

    fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            short_ma: self.short_ma(),
            long_ma: self.long_ma(),
            line_diff_percent: self.line_diff_percent(),
            aroon_up: self.aroon_up(),
            aroon_down: self.aroon_down(),
            bollinger_bandwidth: self.bollinger_bandwidth(),
            candle: self.candle(),
        }
    }
}

impl IndicatorSource for IndicatorSnapshot {
    fn short_ma(&self) -> f64 {
        self.short_ma
    }

    fn long_ma(&self) -> f64 {
        self.long_ma
    }

    fn line_diff_percent(&self) -> f64 {
        self.line_diff_percent
    }

    fn aroon_up(&self) -> f64 {
        self.aroon_up
    }

    fn aroon_down(&self) -> f64 {
        self.aroon_down
    }

    fn bollinger_bandwidth(&self) -> f64 {
        self.bollinger_bandwidth
    }

    fn candle(&self) -> CandleContext {
        self.candle
    }

    fn snapshot(&self) -> IndicatorSnapshot {
        *self
    }
}
