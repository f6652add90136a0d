//! The trend signal engine: Aroon breakout confirmation, volatility gate and
//! the crossover decision, evaluated once per tick.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::components::{
    IndicatorSnapshot, IndicatorSource, IntentTrigger, PositionTracker, SignalSink, TradeIntent,
};
use crate::config::EngineConfig;
use crate::domain::{StrategyPosition, TrendDirection};

use super::state::{breakout_candidate, CrossoverEdgeState, TrendState};

/// Streaming trend classifier.
///
/// Owns its trend and edge state; one instance per instrument. The engine
/// never computes indicators and never closes positions: it reads a snapshot,
/// updates its state and proposes at most one intent.
#[derive(Debug, Clone)]
pub struct TrendSignalEngine {
    config: EngineConfig,
    /// Aroon lookback, reported through `info()` when known.
    interval: Option<usize>,
    trend: TrendState,
    edge: CrossoverEdgeState,
    // per-run bookkeeping, cleared by reset_transient()
    last_snapshot: Option<IndicatorSnapshot>,
    ticks: u64,
    intents_emitted: u64,
}

impl TrendSignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            interval: None,
            trend: TrendState::default(),
            edge: CrossoverEdgeState::default(),
            last_snapshot: None,
            ticks: 0,
            intents_emitted: 0,
        }
    }

    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn trend_state(&self) -> TrendState {
        self.trend
    }

    pub fn edge_state(&self) -> CrossoverEdgeState {
        self.edge
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn intents_emitted(&self) -> u64 {
        self.intents_emitted
    }

    pub fn is_aroon_high(&self, min_count: u32) -> bool {
        self.trend.is_aroon_high(min_count)
    }

    pub fn is_aroon_low(&self, min_count: u32) -> bool {
        self.trend.is_aroon_low(min_count)
    }

    /// Evaluate one tick. Returns the intent to emit, if any.
    ///
    /// The Aroon state machine advances on every call, gated or not. The
    /// position is written only on entries from a flat stance.
    pub fn evaluate<P>(
        &mut self,
        snapshot: &IndicatorSnapshot,
        position: &mut P,
    ) -> Option<TradeIntent>
    where
        P: PositionTracker + ?Sized,
    {
        self.ticks += 1;
        self.last_snapshot = Some(*snapshot);

        let previous = self.trend.last_trend;
        self.trend
            .set_trend(breakout_candidate(snapshot.aroon_up, snapshot.aroon_down));
        if self.trend.last_trend != previous {
            debug!(
                from = %previous,
                to = %self.trend.last_trend,
                aroon_up = snapshot.aroon_up,
                aroon_down = snapshot.aroon_down,
                "aroon trend changed"
            );
        }

        let bandwidth = snapshot.bollinger_bandwidth;
        if bandwidth.is_nan() || bandwidth < self.config.min_volatility {
            debug!(
                bandwidth,
                min_volatility = self.config.min_volatility,
                "volatility gate closed"
            );
            return None;
        }

        let diff = snapshot.line_diff_percent;
        if !diff.is_finite() {
            return None;
        }

        let intent = self.decide(diff, snapshot, position)?;
        self.intents_emitted += 1;
        info!(
            direction = %intent.direction,
            trigger = ?intent.trigger,
            reason = %intent.reason,
            position = %position.get(),
            "trade intent"
        );
        Some(intent)
    }

    /// Evaluate the source's current snapshot and forward any intent to `sink`.
    pub fn tick<S, P, K>(&mut self, source: &S, position: &mut P, sink: &mut K) -> bool
    where
        S: IndicatorSource + ?Sized,
        P: PositionTracker + ?Sized,
        K: SignalSink + ?Sized,
    {
        match self.evaluate(&source.snapshot(), position) {
            Some(intent) => {
                sink.emit(intent);
                true
            }
            None => false,
        }
    }

    fn decide<P>(
        &mut self,
        diff: f64,
        snapshot: &IndicatorSnapshot,
        position: &mut P,
    ) -> Option<TradeIntent>
    where
        P: PositionTracker + ?Sized,
    {
        let thresholds = self.config.thresholds;
        let weight = self.config.default_weight;

        if diff > thresholds.up {
            debug!(
                diff,
                confirmed = snapshot.candle.confirms_up(),
                "up trend detected"
            );
            // TODO: decide whether the up path should also require is_aroon_high(1),
            // mirroring the Aroon gate on the down path.
            if !snapshot.candle.confirms_up() {
                return None;
            }
            let emit = self.edge.is_new_edge(TrendDirection::Up);
            self.edge.confirm(TrendDirection::Up);
            if !emit {
                return None;
            }
            enter_if_flat(position, StrategyPosition::Long);
            return Some(self.intent_buy(weight, crossover_reason(diff), IntentTrigger::Crossover));
        }

        if diff < thresholds.down {
            let gate = self.trend.is_aroon_low(1) || position.get() == StrategyPosition::Long;
            debug!(
                diff,
                aroon_low = self.trend.is_aroon_low(1),
                position = %position.get(),
                "down trend detected"
            );
            if !gate {
                return None;
            }
            let emit = self.edge.is_new_edge(TrendDirection::Down);
            self.edge.confirm(TrendDirection::Down);
            if !emit {
                return None;
            }
            enter_if_flat(position, StrategyPosition::Short);
            return Some(self.intent_sell(weight, crossover_reason(diff), IntentTrigger::Crossover));
        }

        // neutral band: flat positions may still follow a confirmed breakout
        if !position.get().is_flat() {
            return None;
        }
        if self.trend.is_aroon_high(1) {
            position.set(StrategyPosition::Long);
            Some(self.intent_buy(weight, "Aroon HIGH", IntentTrigger::AroonFallback))
        } else if self.trend.is_aroon_low(1) {
            position.set(StrategyPosition::Short);
            Some(self.intent_sell(weight, "Aroon LOW", IntentTrigger::AroonFallback))
        } else {
            None
        }
    }

    fn intent_buy(&self, weight: f64, reason: impl Into<String>, trigger: IntentTrigger) -> TradeIntent {
        TradeIntent::buy(weight, reason, trigger).with_make_only(self.config.make_only)
    }

    fn intent_sell(&self, weight: f64, reason: impl Into<String>, trigger: IntentTrigger) -> TradeIntent {
        TradeIntent::sell(weight, reason, trigger).with_make_only(self.config.make_only)
    }

    /// Clear per-run bookkeeping (tick counters, last snapshot).
    ///
    /// Trend and edge state survive: a restarted run continues from the
    /// breakout count and crossover edge it had reached.
    pub fn reset_transient(&mut self) {
        self.last_snapshot = None;
        self.ticks = 0;
        self.intents_emitted = 0;
    }

    /// Return trend and edge state to their initial values.
    pub fn reset_trend_state(&mut self) {
        self.trend = TrendState::default();
        self.edge = CrossoverEdgeState::default();
    }

    /// Named diagnostic values from the last evaluated tick.
    pub fn info(&self) -> BTreeMap<&'static str, f64> {
        let mut out = BTreeMap::new();
        out.insert("breakoutCount", f64::from(self.trend.breakout_count));
        if let Some(interval) = self.interval {
            out.insert("interval", interval as f64);
        }
        if let Some(snap) = &self.last_snapshot {
            out.insert("AroonUp", snap.aroon_up);
            out.insert("AroonDown", snap.aroon_down);
            out.insert("EMA line diff %", snap.line_diff_percent);
            out.insert("Bandwidth", snap.bollinger_bandwidth);
        }
        out
    }
}

fn enter_if_flat<P>(position: &mut P, target: StrategyPosition)
where
    P: PositionTracker + ?Sized,
{
    if position.get().is_flat() {
        position.set(target);
    }
}

fn crossover_reason(diff: f64) -> String {
    format!("EMA line diff %: {diff}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CandleContext;
    use std::sync::{Arc, Mutex};

    fn snapshot(diff: f64, aroon_up: f64, aroon_down: f64, bandwidth: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            short_ma: 100.0 + diff,
            long_ma: 100.0,
            line_diff_percent: diff,
            aroon_up,
            aroon_down,
            bollinger_bandwidth: bandwidth,
            candle: CandleContext::new(TrendDirection::Up, 100.0, 101.0),
        }
    }

    fn engine() -> TrendSignalEngine {
        TrendSignalEngine::new(EngineConfig::with_thresholds(1.0, -1.0))
    }

    #[test]
    fn intents_carry_make_only_hint() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        let intent = eng
            .evaluate(&snapshot(2.0, 0.0, 0.0, 0.2), &mut pos)
            .unwrap();
        assert!(intent.make_only);
        assert_eq!(intent.reason, "EMA line diff %: 2");

        let mut eng = TrendSignalEngine::new(EngineConfig {
            make_only: false,
            ..EngineConfig::with_thresholds(1.0, -1.0)
        });
        let mut pos = StrategyPosition::None;
        let intent = eng
            .evaluate(&snapshot(2.0, 0.0, 0.0, 0.2), &mut pos)
            .unwrap();
        assert!(!intent.make_only);
    }

    #[test]
    fn unconfirmed_up_candle_leaves_edge_alone() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        let mut snap = snapshot(2.0, 0.0, 0.0, 0.2);
        snap.candle = CandleContext::new(TrendDirection::Down, 100.0, 101.0);
        assert!(eng.evaluate(&snap, &mut pos).is_none());
        assert_eq!(eng.edge_state().last_ema_trend, TrendDirection::None);
        assert_eq!(pos, StrategyPosition::None);
    }

    #[test]
    fn down_path_without_gate_is_silent() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        assert!(eng
            .evaluate(&snapshot(-2.0, 0.0, 0.0, 0.2), &mut pos)
            .is_none());
        assert_eq!(eng.edge_state().last_ema_trend, TrendDirection::None);
    }

    #[test]
    fn nan_bandwidth_counts_as_gated() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        assert!(eng
            .evaluate(&snapshot(2.0, 97.0, 10.0, f64::NAN), &mut pos)
            .is_none());
        // breakout still tracked
        assert_eq!(eng.trend_state().breakout_count, 1);
    }

    #[test]
    fn nan_diff_holds_without_fallback() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        assert!(eng
            .evaluate(&snapshot(f64::NAN, 97.0, 10.0, 0.2), &mut pos)
            .is_none());
        assert!(eng.is_aroon_high(1));
        assert_eq!(pos, StrategyPosition::None);
    }

    #[test]
    fn info_reports_last_tick() {
        let mut eng = engine().with_interval(30);
        let before = eng.info();
        assert_eq!(before.get("breakoutCount"), Some(&0.0));
        assert_eq!(before.get("interval"), Some(&30.0));
        assert!(!before.contains_key("AroonUp"));

        let mut pos = StrategyPosition::None;
        eng.evaluate(&snapshot(0.5, 97.0, 10.0, 0.2), &mut pos);
        let after = eng.info();
        assert_eq!(after.get("breakoutCount"), Some(&1.0));
        assert_eq!(after.get("AroonUp"), Some(&97.0));
        assert_eq!(after.get("AroonDown"), Some(&10.0));
        assert_eq!(after.get("EMA line diff %"), Some(&0.5));
        assert_eq!(after.get("Bandwidth"), Some(&0.2));
    }

    /// Shared buffer the test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_debug_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.text()
    }

    #[test]
    fn silent_branches_still_log_direction() {
        let out = with_debug_logs(|| {
            let mut eng = engine();
            let mut pos = StrategyPosition::None;
            let mut unconfirmed = snapshot(2.0, 0.0, 0.0, 0.2);
            unconfirmed.candle = CandleContext::new(TrendDirection::Down, 100.0, 101.0);
            assert!(eng.evaluate(&unconfirmed, &mut pos).is_none());
            // down without Aroon corroboration or a long to unwind
            assert!(eng
                .evaluate(&snapshot(-2.0, 0.0, 0.0, 0.2), &mut pos)
                .is_none());
        });
        assert!(out.contains("up trend detected"), "{out}");
        assert!(out.contains("confirmed=false"), "{out}");
        assert!(out.contains("down trend detected"), "{out}");
        assert!(out.contains("aroon_low=false"), "{out}");
    }

    #[test]
    fn neutral_band_logs_no_direction() {
        let out = with_debug_logs(|| {
            let mut eng = engine();
            let mut pos = StrategyPosition::None;
            eng.evaluate(&snapshot(0.5, 0.0, 0.0, 0.2), &mut pos);
        });
        assert!(!out.contains("trend detected"), "{out}");
    }

    #[test]
    fn tick_forwards_to_sink() {
        let mut eng = engine();
        let mut pos = StrategyPosition::None;
        let mut sink: Vec<TradeIntent> = Vec::new();
        let snap = snapshot(2.0, 0.0, 0.0, 0.2);
        assert!(eng.tick(&snap, &mut pos, &mut sink));
        assert!(!eng.tick(&snap, &mut pos, &mut sink));
        assert_eq!(sink.len(), 1);
        assert_eq!(eng.ticks(), 2);
        assert_eq!(eng.intents_emitted(), 1);
    }
}
