use argus_core::Trade;

/// Cumulative volume delta: running sum of aggressor-signed sizes.
/// The first element is the first trade's signed volume.
pub fn cumulative_delta(trades: &[Trade]) -> Vec<f64> {
    let mut acc = 0.0;
    trades
        .iter()
        .map(|t| {
            acc += t.signed_volume();
            acc
        })
        .collect()
}

/// Two-point bullish divergence: price lower than `lookback` points ago
/// while the delta is higher. Needs at least `lookback + 1` points in
/// both series, otherwise false. This is a deliberate screening
/// heuristic, not pivot detection.
pub fn bullish_divergence(prices: &[f64], cvd: &[f64], lookback: usize) -> bool {
    let n = prices.len();
    if cvd.len() != n || n < lookback + 1 {
        return false;
    }
    let last = n - 1;
    let past = last - lookback;
    prices[last] < prices[past] && cvd[last] > cvd[past]
}

/// Total buy size over total sell size across the sample.
/// A sample with no sells comes back as 0, never a division by zero.
pub fn buy_sell_ratio(trades: &[Trade]) -> f64 {
    let buys: f64 = trades
        .iter()
        .filter(|t| t.side.is_buy())
        .map(|t| t.size)
        .sum();
    let sells: f64 = trades
        .iter()
        .filter(|t| !t.side.is_buy())
        .map(|t| t.size)
        .sum();
    if sells == 0.0 {
        return 0.0;
    }
    buys / sells
}
