use std::fmt;

use serde::{Deserialize, Serialize};

use super::ImbalanceReport;
use crate::values::{Price, Symbol, Timestamp};

/// Conviction tier derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalTier {
    /// Score 80+: everything lined up at once
    SniperShot,
    /// Score 60-79: worth watching closely
    CloseWatch,
    /// Score 40-59: early accumulation pattern
    QuietAccumulation,
    /// Below 40
    Noise,
}

impl SignalTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalTier::SniperShot => "sniper-shot",
            SignalTier::CloseWatch => "close-watch",
            SignalTier::QuietAccumulation => "quiet-accumulation",
            SignalTier::Noise => "noise",
        }
    }
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The component readings a score was built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalIndicators {
    pub rvol: f64,
    pub cvd_divergence: bool,
    pub buy_sell_ratio: f64,
    pub iceberg_count: usize,
    pub bb_squeeze: bool,
}

/// The one type that crosses the core boundary outward: a fully scored,
/// classified observation for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: Symbol,
    pub observed_at: Timestamp,
    /// Additive composite in [0, 100]
    pub score: u8,
    pub tier: SignalTier,
    pub price: Price,
    pub indicators: SignalIndicators,
    pub imbalance: Option<ImbalanceReport>,
    pub recommended_action: String,
}

impl Signal {
    /// Signals at close-watch or above are worth surfacing immediately
    pub fn is_actionable(&self) -> bool {
        self.score >= 60
    }
}
