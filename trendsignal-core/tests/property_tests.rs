//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over arbitrary tick sequences:
//! 1. Breakout count bookkeeping: resets on transitions, +1 while the trend holds
//! 2. Volatility gate: nothing is emitted below min_volatility
//! 3. Position writes: only none→long and none→short
//! 4. Reset preservation: reset_transient never touches trend or edge state

use proptest::prelude::*;
use trendsignal_core::components::{CandleContext, IndicatorSnapshot};
use trendsignal_core::domain::{StrategyPosition, TrendDirection};
use trendsignal_core::engine::breakout_candidate;
use trendsignal_core::{EngineConfig, TrendSignalEngine};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_aroon() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(49.9),
        Just(50.0),
        Just(96.0),
        Just(100.0),
        0.0..=100.0_f64,
    ]
}

fn arb_candle() -> impl Strategy<Value = CandleContext> {
    (
        prop_oneof![
            Just(TrendDirection::None),
            Just(TrendDirection::Up),
            Just(TrendDirection::Down),
        ],
        90.0..110.0_f64,
        90.0..110.0_f64,
    )
        .prop_map(|(trend, close, price)| CandleContext::new(trend, close, price))
}

fn arb_snapshot(bandwidth: impl Strategy<Value = f64>) -> impl Strategy<Value = IndicatorSnapshot> {
    (-5.0..5.0_f64, arb_aroon(), arb_aroon(), bandwidth, arb_candle()).prop_map(
        |(diff, up, down, bw, candle)| IndicatorSnapshot {
            short_ma: 100.0 + diff,
            long_ma: 100.0,
            line_diff_percent: diff,
            aroon_up: up,
            aroon_down: down,
            bollinger_bandwidth: bw,
            candle,
        },
    )
}

fn arb_position() -> impl Strategy<Value = StrategyPosition> {
    prop_oneof![
        Just(StrategyPosition::None),
        Just(StrategyPosition::Long),
        Just(StrategyPosition::Short),
    ]
}

fn engine() -> TrendSignalEngine {
    TrendSignalEngine::new(EngineConfig::with_thresholds(1.0, -1.0))
}

// ── 1. Breakout count ────────────────────────────────────────────────

proptest! {
    /// Count resets to 1 (or 0 for none) on a transition and increments by one otherwise.
    #[test]
    fn breakout_count_tracks_runs(ticks in prop::collection::vec(arb_snapshot(0.0..0.5_f64), 1..60)) {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        let mut prev = eng.trend_state();

        for tick in &ticks {
            eng.evaluate(tick, &mut pos);
            let state = eng.trend_state();
            let candidate = breakout_candidate(tick.aroon_up, tick.aroon_down);
            prop_assert_eq!(state.last_trend, candidate);

            let expected = match candidate {
                TrendDirection::None => 0,
                c if c == prev.last_trend => prev.breakout_count + 1,
                _ => 1,
            };
            prop_assert_eq!(state.breakout_count, expected);
            prev = state;
        }
    }
}

// ── 2. Volatility gate ───────────────────────────────────────────────

proptest! {
    /// Bandwidth under min_volatility means no intent and no position change.
    #[test]
    fn gated_ticks_never_emit(
        ticks in prop::collection::vec(arb_snapshot(0.0..0.0499_f64), 1..40),
        start in arb_position(),
    ) {
        let mut eng = engine();
        let mut pos = start;
        for tick in &ticks {
            prop_assert!(eng.evaluate(tick, &mut pos).is_none());
        }
        prop_assert_eq!(pos, start);
        prop_assert_eq!(eng.edge_state().last_ema_trend, TrendDirection::None);
    }
}

// ── 3. Position writes ───────────────────────────────────────────────

proptest! {
    /// The engine only ever moves a flat position to long or short.
    #[test]
    fn engine_only_enters_from_flat(
        ticks in prop::collection::vec((arb_snapshot(0.0..0.5_f64), any::<bool>()), 1..60),
    ) {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        for (tick, host_exits) in &ticks {
            let before = pos;
            let intent = eng.evaluate(tick, &mut pos);
            if before != pos {
                prop_assert_eq!(before, StrategyPosition::None);
                prop_assert!(intent.is_some());
            }
            if *host_exits {
                pos = StrategyPosition::None;
            }
        }
    }

    /// Two identical consecutive ticks never produce two crossover intents.
    #[test]
    fn repeated_tick_is_suppressed(tick in arb_snapshot(0.05..0.5_f64), start in arb_position()) {
        prop_assume!(tick.line_diff_percent.abs() > 1.0);
        let mut eng = engine();
        let mut pos = start;
        eng.evaluate(&tick, &mut pos);
        let second = eng.evaluate(&tick, &mut pos);
        if let Some(intent) = second {
            prop_assert_ne!(intent.trigger, trendsignal_core::components::IntentTrigger::Crossover);
        }
    }
}

// ── 4. Reset preservation ────────────────────────────────────────────

proptest! {
    #[test]
    fn reset_transient_preserves_state(
        ticks in prop::collection::vec(arb_snapshot(0.0..0.5_f64), 0..40),
    ) {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        for tick in &ticks {
            eng.evaluate(tick, &mut pos);
        }
        let trend = eng.trend_state();
        let edge = eng.edge_state();
        eng.reset_transient();
        prop_assert_eq!(eng.trend_state(), trend);
        prop_assert_eq!(eng.edge_state(), edge);
    }
}
