//! Exponential and double-exponential moving averages.
//!
//! EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1),
//! seeded with the SMA of the first `period` closes. Lookback: period - 1.
//!
//! DEMA = 2 * EMA - EMA(EMA). Lookback: 2 * (period - 1).

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

#[derive(Debug, Clone)]
pub struct Dema {
    period: usize,
    name: String,
}

impl Dema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "DEMA period must be >= 1");
        Self {
            period,
            name: format!("dema_{period}"),
        }
    }
}

impl Indicator for Dema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * (self.period - 1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ema = ema_of_series(&closes, self.period);

        // The inner EMA starts where the outer one becomes valid.
        let start = self.period - 1;
        let mut result = vec![f64::NAN; bars.len()];
        if ema.len() <= start {
            return result;
        }
        let ema_of_ema = ema_of_series(&ema[start..], self.period);
        for (offset, &ee) in ema_of_ema.iter().enumerate() {
            let i = start + offset;
            result[i] = 2.0 * ema[i] - ee;
        }
        result
    }
}

/// EMA over an arbitrary series. A `NaN` in the seed window yields an all-`NaN`
/// result; a later `NaN` taints every value from that point on.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let seed_window = &values[..period];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = seed_window.iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            break;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}
