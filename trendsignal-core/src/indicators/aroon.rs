//! Aroon: how recently the window's extreme high and low were printed.
//!
//! Aroon Up = 100 * (period - bars_since_highest_high) / period
//! Aroon Down = 100 * (period - bars_since_lowest_low) / period
//!
//! The window spans `period + 1` bars, so a fresh extreme scores 100 and one
//! `period` bars old scores 0. Ties resolve to the most recent bar.
//! Lookback: period.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Which line of the Aroon oscillator to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AroonLine {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Aroon {
    period: usize,
    line: AroonLine,
    name: String,
}

impl Aroon {
    pub fn up(period: usize) -> Self {
        Self::new(period, AroonLine::Up)
    }

    pub fn down(period: usize) -> Self {
        Self::new(period, AroonLine::Down)
    }

    fn new(period: usize, line: AroonLine) -> Self {
        assert!(period >= 1, "Aroon period must be >= 1");
        let prefix = match line {
            AroonLine::Up => "aroon_up",
            AroonLine::Down => "aroon_down",
        };
        Self {
            period,
            line,
            name: format!("{prefix}_{period}"),
        }
    }

    /// Offset within `window` of the extreme this line tracks, or `None` if
    /// the window contains a `NaN`.
    fn extreme_offset(&self, window: &[Bar]) -> Option<usize> {
        let mut best = None::<(usize, f64)>;
        for (j, bar) in window.iter().enumerate() {
            let v = match self.line {
                AroonLine::Up => bar.high,
                AroonLine::Down => bar.low,
            };
            if v.is_nan() {
                return None;
            }
            let better = match (best, self.line) {
                (None, _) => true,
                (Some((_, b)), AroonLine::Up) => v >= b,
                (Some((_, b)), AroonLine::Down) => v <= b,
            };
            if better {
                best = Some((j, v));
            }
        }
        best.map(|(j, _)| j)
    }
}

impl Indicator for Aroon {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let window = &bars[i - self.period..=i];
            if let Some(offset) = self.extreme_offset(window) {
                // offset == period means the extreme is on the current bar
                result[i] = 100.0 * offset as f64 / self.period as f64;
            }
        }

        result
    }
}
