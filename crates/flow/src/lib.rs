//! Argus Order Flow
//!
//! Reads the tape for one symbol: cumulative volume delta, bullish
//! divergence between price and delta, aggressor buy/sell ratio, and
//! outsized resting levels (iceberg candidates) from a depth snapshot.

mod analyzer;
mod delta;
mod iceberg;

pub use analyzer::{FlowConfig, OrderFlowAnalyzer};
pub use delta::{bullish_divergence, buy_sell_ratio, cumulative_delta};
pub use iceberg::detect_icebergs;
