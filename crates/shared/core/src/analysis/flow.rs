use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::BookSide;
use crate::values::{Price, Symbol, Timestamp, Volume};

/// A resting level large enough to stand out from the rest of its side
/// (snapshot heuristic, not a refill tracker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcebergLevel {
    pub side: BookSide,
    pub price: Price,
    pub size: Volume,
    /// Level size over the mean size of its side
    pub ratio_vs_mean: f64,
}

/// Qualitative read of the flow sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStrength {
    /// Bullish divergence with buyers clearly dominating the tape
    Strong,
    Neutral,
}

impl FlowStrength {
    pub fn is_strong(&self) -> bool {
        matches!(self, FlowStrength::Strong)
    }
}

impl fmt::Display for FlowStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStrength::Strong => f.write_str("strong"),
            FlowStrength::Neutral => f.write_str("neutral"),
        }
    }
}

/// Completed order-flow analysis for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFlowReport {
    pub symbol: Symbol,
    /// Final value of the cumulative volume delta over the sample
    pub cvd_last: f64,
    pub bullish_divergence: bool,
    /// Total buy size over total sell size; 0 when the sample has no sells
    pub buy_sell_ratio: f64,
    /// Full count of iceberg candidates across both sides
    pub iceberg_count: usize,
    /// The largest candidates, size descending, at most three
    pub icebergs: Vec<IcebergLevel>,
    pub strength: FlowStrength,
    pub observed_at: Timestamp,
}

/// Outcome of analyzing one symbol. Fetch problems become variants here,
/// never errors propagated to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderFlowAnalysis {
    Complete(OrderFlowReport),
    /// The venue returned an empty trade sample
    NoData { symbol: Symbol },
    /// A fetch failed; the reason is kept for the logs
    Failed { symbol: Symbol, reason: String },
}

impl OrderFlowAnalysis {
    pub fn symbol(&self) -> &str {
        match self {
            OrderFlowAnalysis::Complete(report) => &report.symbol,
            OrderFlowAnalysis::NoData { symbol } => symbol,
            OrderFlowAnalysis::Failed { symbol, .. } => symbol,
        }
    }

    /// The report, when analysis completed
    pub fn report(&self) -> Option<&OrderFlowReport> {
        match self {
            OrderFlowAnalysis::Complete(report) => Some(report),
            _ => None,
        }
    }
}
