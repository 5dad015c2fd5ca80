use argus_core::Candle;

use crate::stats::mean;

/// Relative volume: the last entry against the mean of everything before
/// it. Exactly 0 with fewer than two points or a zero mean, so a dead
/// series can never rank as an anomaly.
pub fn relative_volume(volumes: &[f64]) -> f64 {
    if volumes.len() < 2 {
        return 0.0;
    }
    let current = volumes[volumes.len() - 1];
    let baseline = mean(&volumes[..volumes.len() - 1]);
    if baseline == 0.0 {
        return 0.0;
    }
    current / baseline
}

/// One price bucket of a volume profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBin {
    pub price_low: f64,
    pub price_high: f64,
    pub volume: f64,
}

/// Volume-at-price profile: closes bucketed into `bins` equal-width price
/// bins across the candle range, occupied bins only, ordered by volume
/// descending. The first entry is the point of control. Empty on a
/// degenerate range (no candles, or high equals low everywhere).
pub fn volume_profile(candles: &[Candle], bins: usize) -> Vec<VolumeBin> {
    if candles.is_empty() || bins == 0 {
        return Vec::new();
    }
    let lo = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let hi = candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if !(range > 0.0) {
        return Vec::new();
    }

    let bin_size = range / bins as f64;
    let mut buckets = vec![0.0f64; bins];
    for candle in candles {
        let idx = (((candle.close - lo) / bin_size) as usize).min(bins - 1);
        buckets[idx] += candle.volume;
    }

    let mut profile: Vec<VolumeBin> = buckets
        .iter()
        .enumerate()
        .filter(|(_, volume)| **volume > 0.0)
        .map(|(idx, volume)| VolumeBin {
            price_low: lo + idx as f64 * bin_size,
            price_high: lo + (idx + 1) as f64 * bin_size,
            volume: *volume,
        })
        .collect();
    profile.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    profile
}
