//! Hedge ratio via ordinary least squares: `y = alpha + beta * x + epsilon`.

use super::error::AnalyticsError;

const MIN_OBSERVATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HedgeRatioResult {
    pub beta: f64,
    pub alpha: f64,
    pub r_squared: f64,
    pub std_error: f64,
}

/// Fit `y = alpha + beta * x` by OLS over the paired, null-free sample.
///
/// `beta = Σ(x-x̄)(y-ȳ) / Σ(x-x̄)²`, `alpha = ȳ - beta·x̄`. Requires `n >= 10`
/// (`InsufficientData` otherwise) and non-zero design variance
/// (`SingularDesign` if `Σ(x-x̄)² == 0`). Degenerate `SST == 0` yields `R² = 0`.
pub fn calculate_hedge_ratio(y: &[f64], x: &[f64]) -> Result<HedgeRatioResult, AnalyticsError> {
    assert_eq!(y.len(), x.len(), "y and x must already be aligned");
    let n = y.len();
    if n < MIN_OBSERVATIONS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_OBSERVATIONS,
            have: n,
        });
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        let dx = x[i] - x_mean;
        numerator += dx * (y[i] - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        return Err(AnalyticsError::SingularDesign);
    }

    let beta = numerator / denominator;
    let alpha = y_mean - beta * x_mean;

    let mut ssr = 0.0;
    let mut sst = 0.0;
    for i in 0..n {
        let pred = alpha + beta * x[i];
        ssr += (y[i] - pred).powi(2);
        sst += (y[i] - y_mean).powi(2);
    }

    let r_squared = if sst == 0.0 { 0.0 } else { 1.0 - ssr / sst };

    let std_error = if n > 2 {
        ((ssr / (n - 2) as f64) / denominator).sqrt()
    } else {
        0.0
    };

    Ok(HedgeRatioResult {
        beta,
        alpha,
        r_squared,
        std_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_scenario_perfect_fit() {
        let y: Vec<f64> = (10..20).map(|v| v as f64).collect();
        let x: Vec<f64> = (1..11).map(|v| v as f64).collect();
        let result = calculate_hedge_ratio(&y, &x).unwrap();
        assert!((result.beta - 1.0).abs() < 1e-9);
        assert!((result.alpha - 9.0).abs() < 1e-9);
        assert!((result.r_squared - 1.0).abs() < 1e-9);
        assert!(result.std_error.abs() < 1e-9);
    }

    #[test]
    fn fewer_than_ten_observations_is_insufficient() {
        let y = vec![1.0; 5];
        let x = vec![1.0; 5];
        assert_eq!(
            calculate_hedge_ratio(&y, &x),
            Err(AnalyticsError::InsufficientData { required: 10, have: 5 })
        );
    }

    #[test]
    fn zero_design_variance_is_singular() {
        let y: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let x = vec![5.0; 10];
        assert_eq!(calculate_hedge_ratio(&y, &x), Err(AnalyticsError::SingularDesign));
    }

    #[test]
    fn affine_transform_of_y_scales_beta_and_alpha_linearly() {
        // property 5: OLS on (y, x) and (c1*y + c0, x) gives beta' = c1*beta, alpha' = c1*alpha + c0
        let x: Vec<f64> = (1..16).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 2.3 + 1.0 + (*v % 3.0)).collect();
        let base = calculate_hedge_ratio(&y, &x).unwrap();

        let c1 = 4.0;
        let c0 = 7.0;
        let y2: Vec<f64> = y.iter().map(|v| c1 * v + c0).collect();
        let scaled = calculate_hedge_ratio(&y2, &x).unwrap();

        assert!((scaled.beta - c1 * base.beta).abs() / base.beta.abs() < 1e-9);
        assert!((scaled.alpha - (c1 * base.alpha + c0)).abs() / base.alpha.abs() < 1e-9);
    }
}
