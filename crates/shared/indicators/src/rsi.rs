use crate::stats::mean;

/// Relative strength index over the trailing `period` price changes.
///
/// Gains and losses are averaged with plain rolling means. Returns None
/// when there are fewer than `period + 1` closes, or when the average
/// loss is zero (the statistic is undefined there; no division by zero,
/// no forced 100).
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let tail = &deltas[deltas.len() - period..];
    let gains: Vec<f64> = tail.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = tail.iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);
    if avg_loss == 0.0 {
        return None;
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
