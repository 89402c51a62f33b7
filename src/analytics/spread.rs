//! Spread construction for pairs trading: linear combinations of two price series.

use super::stats::{calculate_statistics};

/// `spread_t = y_t - beta * x_t`.
pub fn spread(y: &[f64], x: &[f64], beta: f64) -> Vec<f64> {
    assert_eq!(y.len(), x.len());
    y.iter().zip(x).map(|(yv, xv)| yv - beta * xv).collect()
}

/// Spread standardised to zero mean, unit variance (subtracts mean, divides by std).
pub fn standardized_spread(y: &[f64], x: &[f64], beta: f64) -> Vec<f64> {
    let raw = spread(y, x, beta);
    match calculate_statistics(&raw) {
        Some(stats) if stats.std > 0.0 => {
            raw.iter().map(|v| (v - stats.mean) / stats.std).collect()
        }
        _ => raw,
    }
}

/// Log-price spread: `ln(y) - beta * ln(x)`.
pub fn log_spread(y: &[f64], x: &[f64], beta: f64) -> Vec<f64> {
    assert_eq!(y.len(), x.len());
    y.iter()
        .zip(x)
        .map(|(yv, xv)| yv.ln() - beta * xv.ln())
        .collect()
}

/// Simple ratio spread `y / x`, optionally normalized by its own rolling mean.
pub fn ratio_spread(y: &[f64], x: &[f64], window: Option<usize>) -> Vec<f64> {
    assert_eq!(y.len(), x.len());
    let ratio: Vec<f64> = y.iter().zip(x).map(|(yv, xv)| yv / xv).collect();

    let Some(w) = window else { return ratio };
    if w == 0 || ratio.len() < w {
        return ratio;
    }

    ratio
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i + 1 < w {
                v
            } else {
                let window_slice = &ratio[i + 1 - w..=i];
                let mean = window_slice.iter().sum::<f64>() / w as f64;
                if mean != 0.0 {
                    v / mean
                } else {
                    v
                }
            }
        })
        .collect()
}
