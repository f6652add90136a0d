//! Trade intents and the sink that receives them.
//!
//! An intent is a proposal, not an order: the host decides whether and how to
//! execute it. Intents are immutable once emitted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a trade intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentDirection {
    Buy,
    Sell,
}

impl fmt::Display for IntentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentDirection::Buy => f.write_str("buy"),
            IntentDirection::Sell => f.write_str("sell"),
        }
    }
}

/// Which decision path produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTrigger {
    /// Moving-average line diff left the neutral band.
    Crossover,
    /// Flat position, neutral band, confirmed Aroon breakout.
    AroonFallback,
}

/// A buy or sell proposal emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub direction: IntentDirection,
    /// Strategy-relative sizing hint, normally in [0, 1].
    pub weight: f64,
    /// Human-readable explanation (e.g. "EMA line diff %: 1.25").
    pub reason: String,
    pub trigger: IntentTrigger,
    /// Execution hint: place as maker-only (post-only) orders.
    pub make_only: bool,
}

impl TradeIntent {
    pub fn buy(weight: f64, reason: impl Into<String>, trigger: IntentTrigger) -> Self {
        Self {
            direction: IntentDirection::Buy,
            weight,
            reason: reason.into(),
            trigger,
            make_only: false,
        }
    }

    pub fn sell(weight: f64, reason: impl Into<String>, trigger: IntentTrigger) -> Self {
        Self {
            direction: IntentDirection::Sell,
            weight,
            reason: reason.into(),
            trigger,
            make_only: false,
        }
    }

    pub fn with_make_only(mut self, make_only: bool) -> Self {
        self.make_only = make_only;
        self
    }

    pub fn is_buy(&self) -> bool {
        self.direction == IntentDirection::Buy
    }
}

/// Receiver of emitted intents.
pub trait SignalSink {
    fn emit(&mut self, intent: TradeIntent);
}

/// Collecting sink, handy for tests and replays.
impl SignalSink for Vec<TradeIntent> {
    fn emit(&mut self, intent: TradeIntent) {
        self.push(intent);
    }
}
