//! Indicator precompute and the bar-replay indicator source.
//!
//! All indicators are computed once before replay begins. `BarFeed` then
//! serves the engine one tick at a time: the tick at bar `i` sees the
//! indicators and candle of the last closed bar `i - 1`, and the market is
//! trading at bar `i`'s open.

use trendsignal_core::components::{CandleContext, Indicator, IndicatorSource, IndicatorValues};
use trendsignal_core::domain::Bar;
use trendsignal_core::indicators::{Aroon, Bollinger, LineDiff};
use trendsignal_core::IndicatorConfig;

/// Compute every indicator the engine reads for one symbol's bars.
pub fn precompute(bars: &[Bar], config: &IndicatorConfig) -> IndicatorValues {
    let mut iv = IndicatorValues::new();
    for indicator in config.indicators() {
        let series = indicator.compute(bars);
        debug_assert_eq!(
            series.len(),
            bars.len(),
            "indicator '{}' produced {} values for {} bars",
            indicator.name(),
            series.len(),
            bars.len()
        );
        iv.insert(indicator.name(), series);
    }
    iv
}

/// Series names the feed reads, resolved once from the indicator config.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesKeys {
    pub short_ma: String,
    pub long_ma: String,
    pub line_diff: String,
    pub aroon_up: String,
    pub aroon_down: String,
    pub bandwidth: String,
}

impl SeriesKeys {
    pub fn from_config(config: &IndicatorConfig) -> Self {
        Self {
            short_ma: config.short_key(),
            long_ma: config.long_key(),
            line_diff: LineDiff::new(config.ma_type, config.short, config.long)
                .name()
                .to_string(),
            aroon_up: Aroon::up(config.interval).name().to_string(),
            aroon_down: Aroon::down(config.interval).name().to_string(),
            bandwidth: Bollinger::bandwidth(config.bollinger_period, config.bollinger_multiplier)
                .name()
                .to_string(),
        }
    }
}

/// `IndicatorSource` over precomputed series, positioned at one tick.
pub struct BarFeed<'a> {
    bars: &'a [Bar],
    values: &'a IndicatorValues,
    keys: &'a SeriesKeys,
    index: usize,
}

impl<'a> BarFeed<'a> {
    pub fn new(bars: &'a [Bar], values: &'a IndicatorValues, keys: &'a SeriesKeys) -> Self {
        Self {
            bars,
            values,
            keys,
            index: 1,
        }
    }

    /// Move to the tick at bar `index`. Returns false when `index` has no
    /// closed bar before it or runs past the series.
    pub fn seek(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.bars.len() {
            return false;
        }
        self.index = index;
        true
    }

    /// The bar currently trading.
    pub fn current_bar(&self) -> &Bar {
        &self.bars[self.index]
    }

    fn closed(&self) -> usize {
        self.index - 1
    }

    fn read(&self, key: &str) -> f64 {
        self.values.get_or_nan(key, self.closed())
    }
}

impl IndicatorSource for BarFeed<'_> {
    fn short_ma(&self) -> f64 {
        self.read(&self.keys.short_ma)
    }

    fn long_ma(&self) -> f64 {
        self.read(&self.keys.long_ma)
    }

    fn line_diff_percent(&self) -> f64 {
        self.read(&self.keys.line_diff)
    }

    fn aroon_up(&self) -> f64 {
        self.read(&self.keys.aroon_up)
    }

    fn aroon_down(&self) -> f64 {
        self.read(&self.keys.aroon_down)
    }

    fn bollinger_bandwidth(&self) -> f64 {
        self.read(&self.keys.bandwidth)
    }

    fn candle(&self) -> CandleContext {
        let closed = &self.bars[self.closed()];
        CandleContext::new(
            closed.candle_trend(),
            closed.close,
            self.current_bar().open,
        )
    }
}
