//! Concrete indicator implementations.
//!
//! These are the reference `IndicatorSource` inputs for the engine: the
//! crossover moving-average pair (SMA, EMA or DEMA), the line diff between
//! them, the Aroon oscillator and the Bollinger bandwidth. Multi-series
//! indicators are exposed as separate named instances per line, keeping the
//! single-series `Indicator` trait unchanged.

pub mod aroon;
pub mod bollinger;
pub mod ema;
pub mod line_diff;
pub mod sma;

pub use aroon::{Aroon, AroonLine};
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{Dema, Ema};
pub use line_diff::LineDiff;
pub use sma::Sma;

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;

/// Moving average used for the crossover pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
    Dema,
}

impl MaType {
    pub fn prefix(&self) -> &'static str {
        match self {
            MaType::Sma => "sma",
            MaType::Ema => "ema",
            MaType::Dema => "dema",
        }
    }

    /// Series key of this average for `period` (e.g. `ema_7`).
    pub fn key(&self, period: usize) -> String {
        format!("{}_{period}", self.prefix())
    }

    pub fn build(&self, period: usize) -> Box<dyn Indicator> {
        match self {
            MaType::Sma => Box::new(Sma::new(period)),
            MaType::Ema => Box::new(Ema::new(period)),
            MaType::Dema => Box::new(Dema::new(period)),
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            symbol: "TEST".to_string(),
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
