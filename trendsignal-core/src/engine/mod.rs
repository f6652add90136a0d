//! Trend signal engine and its persistent state.

pub mod state;
pub mod trend_engine;

pub use state::{breakout_candidate, CrossoverEdgeState, TrendState, AROON_HIGH, AROON_LOW_BOUND};
pub use trend_engine::TrendSignalEngine;
