//! Position tracker: shared stance between the engine and exit logic.
//!
//! The engine reads the stance to decide entry eligibility and records its own
//! entries (none→long, none→short). Returning to none belongs to whoever
//! handles fills, exits and stops.

use crate::domain::StrategyPosition;

pub trait PositionTracker {
    fn get(&self) -> StrategyPosition;
    fn set(&mut self, position: StrategyPosition);
}

/// A bare stance is the simplest tracker: the host owns the value and the
/// engine mutates it in place.
impl PositionTracker for StrategyPosition {
    fn get(&self) -> StrategyPosition {
        *self
    }

    fn set(&mut self, position: StrategyPosition) {
        *self = position;
    }
}
