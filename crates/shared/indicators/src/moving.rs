use crate::stats::mean;

/// Simple moving average.
///
/// Emits a value only where the window is fully populated, so the output
/// is `period - 1` entries shorter than the input: `out[i]` covers
/// `values[i..i + period]`. Empty when the input is shorter than the
/// period or the period is zero.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values.windows(period).map(mean).collect()
}

/// Exponential moving average, aligned like [`sma`].
///
/// The first emitted value is the simple average of the first window;
/// from there on `ema = alpha * value + (1 - alpha) * prev` with
/// `alpha = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut current = mean(&values[..period]);
    out.push(current);
    for value in &values[period..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }
    out
}
