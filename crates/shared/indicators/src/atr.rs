use argus_core::Candle;

use crate::stats::mean;

/// True range of one candle given the previous close.
/// Without a previous close this is just the high-to-low range.
pub fn true_range(candle: &Candle, prev_close: Option<f64>) -> f64 {
    let range = candle.high - candle.low;
    match prev_close {
        Some(prev) => range
            .max((candle.high - prev).abs())
            .max((candle.low - prev).abs()),
        None => range,
    }
}

/// Average true range: rolling mean of the true-range series, evaluated
/// over the trailing `period` candles. None when the series is too short.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let mut prev_close = None;
    let mut ranges = Vec::with_capacity(candles.len());
    for candle in candles {
        ranges.push(true_range(candle, prev_close));
        prev_close = Some(candle.close);
    }
    Some(mean(&ranges[ranges.len() - period..]))
}
