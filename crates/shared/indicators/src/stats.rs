/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
/// None with fewer than two points, where the statistic is undefined.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sample_std_dev_basic() {
        // mean 5, squared deviations sum to 32, sample variance 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = sample_std_dev(&values).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev_needs_two_points() {
        assert!(sample_std_dev(&[]).is_none());
        assert!(sample_std_dev(&[42.0]).is_none());
    }

    #[test]
    fn test_sample_std_dev_constant_series_is_zero() {
        assert_eq!(sample_std_dev(&[3.0, 3.0, 3.0]), Some(0.0));
    }
}
