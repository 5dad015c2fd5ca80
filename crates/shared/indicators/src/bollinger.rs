use crate::stats::{mean, sample_std_dev};

/// Bollinger bands evaluated at the last fully-populated window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Band width relative to the middle band; 0 when the middle is 0
    pub fn bandwidth(&self) -> f64 {
        if self.middle == 0.0 {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle
    }
}

/// Bands over the trailing `period` closes: middle is the window mean,
/// upper and lower sit `std_mult` sample standard deviations away.
/// None when the window cannot be filled (including period < 2, where the
/// sample deviation is undefined).
pub fn bollinger_bands(closes: &[f64], period: usize, std_mult: f64) -> Option<BollingerBands> {
    if closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    let middle = mean(window);
    let std = sample_std_dev(window)?;
    Some(BollingerBands {
        upper: middle + std_mult * std,
        middle,
        lower: middle - std_mult * std,
    })
}

/// Volatility squeeze: bandwidth below `threshold` at the last full window.
/// Fails closed: short history, a degenerate window, or a non-positive
/// middle band all come back false rather than raising.
pub fn detect_bb_squeeze(closes: &[f64], period: usize, std_mult: f64, threshold: f64) -> bool {
    match bollinger_bands(closes, period, std_mult) {
        Some(bands) => bands.middle > 0.0 && bands.bandwidth() < threshold,
        None => false,
    }
}
