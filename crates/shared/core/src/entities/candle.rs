use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Timestamp, Volume};

/// Sampling interval of a candle series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    OneMinute,
    OneDay,
}

impl CandleInterval {
    /// Wall-clock span covered by one candle
    pub fn duration(&self) -> Duration {
        match self {
            CandleInterval::OneMinute => Duration::minutes(1),
            CandleInterval::OneDay => Duration::days(1),
        }
    }

    /// Exchange-style interval code
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "1m",
            CandleInterval::OneDay => "1d",
        }
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV candle for a single interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Start of the interval this candle covers
    pub open_time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    /// Traded base-currency volume over the interval
    pub volume: Volume,
}

impl Candle {
    pub fn new(
        open_time: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High-to-low range of the interval
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
