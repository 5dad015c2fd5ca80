//! Argus Market Scanner
//!
//! Discovers the tradable universe from venue tickers and scans it for
//! volume anomalies: symbols whose latest 1-minute candle volume stands
//! far above their own recent average.

mod scan;
mod universe;

pub use scan::{MAX_CANDLES_PER_FETCH, MarketScanner, ScannerConfig};
pub use universe::UniverseFilter;
