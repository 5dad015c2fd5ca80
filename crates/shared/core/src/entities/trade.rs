use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{Price, Timestamp, Volume};

/// Public trade print with the aggressor side as reported by the venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub time: Timestamp,
    pub price: Price,
    pub size: Volume,
    /// Side of the taker. Trusted as reported, never re-inferred.
    pub side: Side,
}

impl Trade {
    pub fn new(time: Timestamp, price: Price, size: Volume, side: Side) -> Self {
        Self {
            time,
            price,
            size,
            side,
        }
    }

    /// Size signed by aggressor: positive for buys, negative for sells
    pub fn signed_volume(&self) -> f64 {
        match self.side {
            Side::Buy => self.size,
            Side::Sell => -self.size,
        }
    }

    /// Notional value of the trade (price * size)
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }
}
