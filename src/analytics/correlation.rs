//! Rolling and cross-sectional Pearson correlation.

use nalgebra::DMatrix;

use super::zscore::min_periods as default_min_periods;

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 {
        return None;
    }
    let x_mean = xs.iter().sum::<f64>() / n as f64;
    let y_mean = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - x_mean;
        let dy = ys[i] - y_mean;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Rolling Pearson correlation between two equal-length series over window `w`.
///
/// `min_periods` defaults to `max(2, w/2)`. Requires matched (already
/// null-free, aligned) input; callers drop nulls before calling.
pub fn rolling_correlation(x: &[f64], y: &[f64], window: usize) -> Vec<Option<f64>> {
    assert_eq!(x.len(), y.len());
    let min_p = default_min_periods(window);
    (0..x.len())
        .map(|i| {
            let available = i + 1;
            if available < min_p {
                return None;
            }
            let start = available.saturating_sub(window);
            pearson(&x[start..=i], &y[start..=i])
        })
        .collect()
}

/// Rolling correlation of log returns, removing the impact of trending levels.
pub fn returns_correlation(x_prices: &[f64], y_prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let x_returns = super::stats::log_returns(x_prices);
    let y_returns = super::stats::log_returns(y_prices);
    rolling_correlation(&x_returns, &y_returns, window)
}

/// Full pairwise correlation matrix across `symbols`, in the given order.
/// Returns `None` if fewer than two symbols or fewer than two observations.
pub fn correlation_matrix(series: &[(&str, &[f64])]) -> Option<DMatrix<f64>> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let len = series[0].1.len();
    if len < 2 || series.iter().any(|(_, s)| s.len() != len) {
        return None;
    }

    let mut matrix = DMatrix::<f64>::identity(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let rho = pearson(series[i].1, series[j].1).unwrap_or(0.0);
            matrix[(i, j)] = rho;
            matrix[(j, i)] = rho;
        }
    }
    Some(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_correlated_series_is_one() {
        let x: Vec<f64> = (1..=30).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        let corr = rolling_correlation(&x, &y, 10);
        assert!((corr[29].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inversely_correlated_series_is_minus_one() {
        let x: Vec<f64> = (1..=30).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| -v).collect();
        let corr = rolling_correlation(&x, &y, 10);
        assert!((corr[29].unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_series_has_no_correlation() {
        let x = vec![5.0; 20];
        let y: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let corr = rolling_correlation(&x, &y, 10);
        assert!(corr[19].is_none());
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let a: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| v * 1.5).collect();
        let c: Vec<f64> = a.iter().map(|v| -v + 2.0).collect();
        let m = correlation_matrix(&[("A", &a), ("B", &b), ("C", &c)]).unwrap();
        assert_eq!(m.nrows(), 3);
        for i in 0..3 {
            assert!((m[(i, i)] - 1.0).abs() < 1e-12);
        }
        assert!((m[(0, 1)] - 1.0).abs() < 1e-9);
        assert!((m[(0, 2)] + 1.0).abs() < 1e-9);
        assert!((m[(0, 1)] - m[(1, 0)]).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_symbols_is_no_result() {
        let a = vec![1.0, 2.0, 3.0];
        assert!(correlation_matrix(&[("A", &a)]).is_none());
    }
}
