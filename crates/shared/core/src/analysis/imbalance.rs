use std::fmt;

use serde::{Deserialize, Serialize};

use crate::values::{Price, Symbol, Timestamp, Volume};

/// A single level concentrating an outsized share of its side's near-touch
/// depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub price: Price,
    pub size: Volume,
    /// Share of the scanned window held by this level, in percent
    pub share_pct: f64,
}

/// Directional read of the depth imbalance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookPressure {
    StrongBuy,
    ModerateBuy,
    Neutral,
    ModerateSell,
    StrongSell,
}

impl BookPressure {
    /// Maps an imbalance percentage onto its pressure band.
    /// Bands are exact: above +30 and below -30 are strong, above +10 and
    /// below -10 are moderate, everything else is neutral.
    pub fn from_imbalance(imbalance_pct: f64) -> Self {
        if imbalance_pct > 30.0 {
            BookPressure::StrongBuy
        } else if imbalance_pct > 10.0 {
            BookPressure::ModerateBuy
        } else if imbalance_pct < -30.0 {
            BookPressure::StrongSell
        } else if imbalance_pct < -10.0 {
            BookPressure::ModerateSell
        } else {
            BookPressure::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookPressure::StrongBuy => "strong_buy",
            BookPressure::ModerateBuy => "moderate_buy",
            BookPressure::Neutral => "neutral",
            BookPressure::ModerateSell => "moderate_sell",
            BookPressure::StrongSell => "strong_sell",
        }
    }
}

impl fmt::Display for BookPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth imbalance around the mid for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImbalanceReport {
    pub symbol: Symbol,
    pub mid_price: Price,
    /// (bid - ask) / (bid + ask) over the price band, in [-100, 100]
    pub imbalance_pct: f64,
    /// Touch spread relative to mid, in percent
    pub spread_pct: f64,
    /// Bid size summed over the band below mid
    pub bid_volume: Volume,
    /// Ask size summed over the band above mid
    pub ask_volume: Volume,
    pub bid_wall: Option<Wall>,
    pub ask_wall: Option<Wall>,
    pub pressure: BookPressure,
    pub observed_at: Timestamp,
}
