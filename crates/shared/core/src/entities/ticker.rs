use serde::{Deserialize, Serialize};

/// Rolling 24h statistics for one market, as reported by the venue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerStats {
    /// Quote-currency turnover over the trailing 24h
    pub quote_volume: f64,
}

impl TickerStats {
    pub fn new(quote_volume: f64) -> Self {
        Self { quote_volume }
    }
}
