//! Bar loading for the runner.
//!
//! Reads OHLCV bars from a CSV file with the header
//! `symbol,date,open,high,low,close,volume` and groups them per symbol in
//! date order. Malformed rows and duplicate dates are errors; bars that fail
//! the OHLC sanity check are kept and logged.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::warn;
use trendsignal_core::domain::{Bar, Symbol};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate bar for '{symbol}' on {date}")]
    DuplicateDate { symbol: Symbol, date: NaiveDate },
    #[error("no bars found")]
    Empty,
}

/// Bars per symbol, each series sorted by date.
pub type BarsBySymbol = BTreeMap<Symbol, Vec<Bar>>;

/// Load bars from a CSV file on disk.
pub fn load_bars_csv(path: &Path) -> Result<BarsBySymbol, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_bars_csv(file)
}

/// Parse bars from any CSV reader.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<BarsBySymbol, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut by_symbol = BarsBySymbol::new();
    for row in rdr.deserialize() {
        let bar: Bar = row?;
        by_symbol.entry(bar.symbol.clone()).or_default().push(bar);
    }
    if by_symbol.is_empty() {
        return Err(LoadError::Empty);
    }

    for (symbol, bars) in by_symbol.iter_mut() {
        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(LoadError::DuplicateDate {
                symbol: symbol.clone(),
                date: pair[1].date,
            });
        }
        let insane = bars.iter().filter(|b| !b.is_sane()).count();
        if insane > 0 {
            warn!(symbol = %symbol, bars = insane, "bars failed OHLC sanity check");
        }
    }

    Ok(by_symbol)
}
