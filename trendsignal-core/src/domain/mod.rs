//! Domain types for TrendSignal

pub mod bar;
pub mod trend;

pub use bar::Bar;
pub use trend::{StrategyPosition, TrendDirection};

/// Symbol type alias
pub type Symbol = String;
