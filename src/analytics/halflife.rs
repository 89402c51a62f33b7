//! Mean-reversion half-life from an AR(1) fit on a spread series.

const MIN_OBSERVATIONS: usize = 10;

/// Fit `spread_t = theta * spread_{t-1} + epsilon` (no intercept) and convert
/// the mean-reversion speed into a half-life: `-ln(2) / ln(theta)`.
///
/// Returns `None` when there are fewer than 10 points, the lagged series has
/// zero variance, or `theta` falls outside `(0, 1)` (no mean reversion).
pub fn half_life(spread: &[f64]) -> Option<f64> {
    if spread.len() < MIN_OBSERVATIONS {
        return None;
    }

    let y = &spread[1..];
    let x = &spread[..spread.len() - 1];

    let x_mean = x.iter().sum::<f64>() / x.len() as f64;
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - x_mean;
        numerator += dx * (y[i] - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        return None;
    }

    let theta = numerator / denominator;
    if theta <= 0.0 || theta >= 1.0 {
        return None;
    }

    let hl = -(2f64.ln()) / theta.ln();
    if hl > 0.0 {
        Some(hl)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_ten_points_is_no_result() {
        assert!(half_life(&[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn non_mean_reverting_series_is_no_result() {
        let series: Vec<f64> = (0..20).map(|v| v as f64).collect();
        assert!(half_life(&series).is_none());
    }

    #[test]
    fn mean_reverting_ou_process_yields_positive_half_life() {
        let theta = 0.9;
        let mut series = vec![10.0];
        for i in 1..50 {
            let prev = series[i - 1];
            series.push(theta * prev);
        }
        let hl = half_life(&series).unwrap();
        let expected = -(2f64.ln()) / theta.ln();
        assert!((hl - expected).abs() < 1e-6);
        assert!(hl > 0.0);
    }

    #[test]
    fn zero_variance_lag_is_no_result() {
        let series = vec![5.0; 15];
        assert!(half_life(&series).is_none());
    }
}
