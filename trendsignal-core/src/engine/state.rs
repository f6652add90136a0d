//! Persistent per-engine state: the Aroon breakout machine and the crossover
//! edge detector.

use serde::{Deserialize, Serialize};

use crate::domain::TrendDirection;

/// Aroon reading at or above which a line counts as breaking out.
pub const AROON_HIGH: f64 = 96.0;

/// The opposite line must stay strictly below this for a breakout to count.
pub const AROON_LOW_BOUND: f64 = 50.0;

/// Classify one tick's Aroon pair as a breakout candidate.
///
/// Non-finite readings fail both comparisons and yield `None`.
pub fn breakout_candidate(aroon_up: f64, aroon_down: f64) -> TrendDirection {
    if aroon_up >= AROON_HIGH && aroon_down < AROON_LOW_BOUND {
        TrendDirection::Up
    } else if aroon_down >= AROON_HIGH && aroon_up < AROON_LOW_BOUND {
        TrendDirection::Down
    } else {
        TrendDirection::None
    }
}

/// Trend-confirmation state machine.
///
/// `breakout_count` is the number of consecutive ticks the current non-none
/// trend has held, including the tick it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendState {
    pub last_trend: TrendDirection,
    pub breakout_count: u32,
}

impl TrendState {
    /// Record this tick's candidate.
    pub fn set_trend(&mut self, candidate: TrendDirection) {
        if candidate != self.last_trend {
            self.breakout_count = 0;
        }
        self.last_trend = candidate;
        if candidate != TrendDirection::None {
            self.breakout_count = self.breakout_count.saturating_add(1);
        }
    }

    pub fn is_aroon_high(&self, min_count: u32) -> bool {
        self.last_trend == TrendDirection::Up && self.breakout_count >= min_count
    }

    pub fn is_aroon_low(&self, min_count: u32) -> bool {
        self.last_trend == TrendDirection::Down && self.breakout_count >= min_count
    }
}

/// Trend recorded the last time a crossover was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossoverEdgeState {
    pub last_ema_trend: TrendDirection,
}

impl CrossoverEdgeState {
    /// True when `trend` differs from the last confirmed crossover, i.e. the
    /// crossover is a new edge worth emitting.
    pub fn is_new_edge(&self, trend: TrendDirection) -> bool {
        self.last_ema_trend != trend
    }

    pub fn confirm(&mut self, trend: TrendDirection) {
        self.last_ema_trend = trend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_classification() {
        assert_eq!(breakout_candidate(97.0, 10.0), TrendDirection::Up);
        assert_eq!(breakout_candidate(96.0, 49.9), TrendDirection::Up);
        assert_eq!(breakout_candidate(96.0, 50.0), TrendDirection::None);
        assert_eq!(breakout_candidate(10.0, 100.0), TrendDirection::Down);
        assert_eq!(breakout_candidate(95.9, 0.0), TrendDirection::None);
        assert_eq!(breakout_candidate(100.0, 100.0), TrendDirection::None);
        assert_eq!(breakout_candidate(f64::NAN, 0.0), TrendDirection::None);
        assert_eq!(breakout_candidate(0.0, f64::NAN), TrendDirection::None);
    }

    #[test]
    fn count_increments_while_trend_holds() {
        let mut state = TrendState::default();
        for expected in 1..=3 {
            state.set_trend(TrendDirection::Up);
            assert_eq!(state.breakout_count, expected);
        }
        assert_eq!(state.last_trend, TrendDirection::Up);
        assert!(state.is_aroon_high(3));
        assert!(!state.is_aroon_high(4));
        assert!(!state.is_aroon_low(1));
    }

    #[test]
    fn flip_rearms_count_to_one() {
        let mut state = TrendState::default();
        state.set_trend(TrendDirection::Up);
        state.set_trend(TrendDirection::Up);
        state.set_trend(TrendDirection::Down);
        assert_eq!(state.last_trend, TrendDirection::Down);
        assert_eq!(state.breakout_count, 1);
        assert!(state.is_aroon_low(1));
    }

    #[test]
    fn none_clears_count() {
        let mut state = TrendState::default();
        state.set_trend(TrendDirection::Down);
        state.set_trend(TrendDirection::None);
        assert_eq!(state, TrendState::default());
        state.set_trend(TrendDirection::None);
        assert_eq!(state.breakout_count, 0);
    }

    #[test]
    fn edge_detects_changes_only() {
        let mut edge = CrossoverEdgeState::default();
        assert!(edge.is_new_edge(TrendDirection::Up));
        edge.confirm(TrendDirection::Up);
        assert!(!edge.is_new_edge(TrendDirection::Up));
        assert!(edge.is_new_edge(TrendDirection::Down));
    }
}
