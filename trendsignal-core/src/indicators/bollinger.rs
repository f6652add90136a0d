//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Four series (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - Bandwidth: (upper - lower) / middle, a price-independent volatility gauge
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Bandwidth,
}

impl BollingerBand {
    fn key(&self) -> &'static str {
        match self {
            BollingerBand::Upper => "bollinger_upper",
            BollingerBand::Middle => "bollinger_middle",
            BollingerBand::Lower => "bollinger_lower",
            BollingerBand::Bandwidth => "bollinger_bandwidth",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(
            multiplier > 0.0 && multiplier.is_finite(),
            "Bollinger multiplier must be positive and finite"
        );
        Self {
            period,
            multiplier,
            band,
            name: format!("{}_{period}_{multiplier}", band.key()),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    pub fn bandwidth(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Bandwidth)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period.saturating_sub(1)..n {
            let window = &bars[i + 1 - self.period..=i];
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|b| {
                    let d = b.close - mean;
                    d * d
                })
                .sum::<f64>()
                / self.period as f64;
            let half_width = self.multiplier * variance.sqrt();

            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper => mean + half_width,
                BollingerBand::Lower => mean - half_width,
                BollingerBand::Bandwidth => {
                    if mean == 0.0 {
                        f64::NAN
                    } else {
                        2.0 * half_width / mean
                    }
                }
            };
        }

        result
    }
}
