use argus_core::{BookLevel, BookSide, IcebergLevel};
use argus_indicators::{mean, sample_std_dev};

/// Levels this many sample deviations above the side mean are candidates
const OUTLIER_SIGMA: f64 = 3.0;

/// Iceberg candidates on one side of a depth snapshot: levels whose size
/// stands more than three sample deviations above the side's mean size.
///
/// This reads a single snapshot; it does not track refills over time.
/// Fewer than two levels leaves the deviation undefined, so no candidates.
pub fn detect_icebergs(levels: &[BookLevel], side: BookSide) -> Vec<IcebergLevel> {
    let sizes: Vec<f64> = levels.iter().map(|l| l.size).collect();
    let Some(std) = sample_std_dev(&sizes) else {
        return Vec::new();
    };
    let avg = mean(&sizes);
    let threshold = avg + OUTLIER_SIGMA * std;

    levels
        .iter()
        .filter(|l| l.size > threshold)
        .map(|l| IcebergLevel {
            side,
            price: l.price,
            size: l.size,
            ratio_vs_mean: if avg == 0.0 { 0.0 } else { l.size / avg },
        })
        .collect()
}
