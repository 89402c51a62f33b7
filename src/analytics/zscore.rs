//! Rolling z-score: standardised deviation of a value from its rolling mean.

/// `min_periods = max(2, window / 2)`, matching the default used throughout
/// the analytics layer for every rolling statistic.
pub fn min_periods(window: usize) -> usize {
    (window / 2).max(2)
}

fn window_mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Rolling z-score over window `w`: `z_t = (s_t - mean_{t-w+1..t}) / std_{t-w+1..t}`.
///
/// `None` where fewer than `min_periods(w)` observations precede the index;
/// `None` where the rolling std is exactly zero (undefined, not infinite).
pub fn rolling_zscore(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let min_p = min_periods(window);
    (0..series.len())
        .map(|i| {
            let available = i + 1;
            if available < min_p {
                return None;
            }
            let start = available.saturating_sub(window);
            let slice = &series[start..=i];
            let (mean, std) = window_mean_std(slice);
            if std == 0.0 {
                None
            } else {
                Some((series[i] - mean) / std)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_constant_series_is_null_throughout() {
        let series = vec![5.0; 25];
        let z = rolling_zscore(&series, 20);
        assert!(z.iter().all(|v| v.is_none()));
    }

    #[test]
    fn early_indices_below_min_periods_are_null() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let window = 10;
        let z = rolling_zscore(&series, window);
        let min_p = min_periods(window);
        for i in 0..min_p.saturating_sub(1).min(series.len()) {
            assert!(z[i].is_none(), "index {i} should be null");
        }
    }

    #[test]
    fn sufficient_varying_data_yields_finite_zscore() {
        let series: Vec<f64> = (0..30).map(|i| (i as f64).sin() + i as f64 * 0.1).collect();
        let z = rolling_zscore(&series, 10);
        assert!(z[29].is_some());
        assert!(z[29].unwrap().is_finite());
    }

    #[test]
    fn min_periods_formula() {
        assert_eq!(min_periods(60), 30);
        assert_eq!(min_periods(2), 2);
        assert_eq!(min_periods(1), 2);
    }
}
