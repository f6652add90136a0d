//! Component traits: the engine's capability interfaces.
//!
//! The decision core talks to the outside world through three narrow seams:
//! - Indicator source: latest indicator readings, refreshed once per tick
//! - Signal sink: receives emitted trade intents
//! - Position tracker: shared none/long/short stance
//!
//! Plus the indicator trait for precomputed numeric series.

pub mod indicator;
pub mod position;
pub mod signal;
pub mod source;

pub use indicator::{Indicator, IndicatorValues};
pub use position::PositionTracker;
pub use signal::{IntentDirection, IntentTrigger, SignalSink, TradeIntent};
pub use source::{line_diff_percent, CandleContext, IndicatorSnapshot, IndicatorSource};
