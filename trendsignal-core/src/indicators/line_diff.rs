//! Moving-average line diff: signed percentage gap between a short and a long MA.
//!
//! line_diff[t] = (short[t] - long[t]) / long[t] * 100
//! Lookback: the long MA's lookback.

use crate::components::indicator::Indicator;
use crate::components::source::line_diff_percent;
use crate::domain::Bar;

use super::MaType;

#[derive(Debug, Clone)]
pub struct LineDiff {
    ma_type: MaType,
    short: usize,
    long: usize,
    name: String,
}

impl LineDiff {
    pub fn new(ma_type: MaType, short: usize, long: usize) -> Self {
        assert!(short >= 1, "short period must be >= 1");
        assert!(long > short, "long period must be > short period");
        Self {
            ma_type,
            short,
            long,
            name: format!("{}_line_diff_{short}_{long}", ma_type.prefix()),
        }
    }
}

impl Indicator for LineDiff {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.ma_type.build(self.long).lookback()
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let short = self.ma_type.build(self.short).compute(bars);
        let long = self.ma_type.build(self.long).compute(bars);
        short
            .iter()
            .zip(long.iter())
            .map(|(&s, &l)| line_diff_percent(s, l))
            .collect()
    }
}
