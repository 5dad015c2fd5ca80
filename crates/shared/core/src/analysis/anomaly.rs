use serde::{Deserialize, Serialize};

use crate::values::{Price, Symbol, Timestamp, Volume};

/// A symbol whose latest candle volume stands far above its own recent
/// average. The scanner's unit of output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeAnomaly {
    pub symbol: Symbol,
    /// Relative volume: last candle volume over the mean of the earlier ones
    pub rvol: f64,
    /// Close of the anomalous candle
    pub price: Price,
    pub current_volume: Volume,
    pub average_volume: Volume,
    pub observed_at: Timestamp,
}
