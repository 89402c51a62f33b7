//! Descriptive statistics over a single price series.

/// Comprehensive price statistics, mirroring the original implementation's
/// `PriceStatistics` container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub last: f64,
    pub returns_mean: f64,
    pub returns_std: f64,
    pub cumulative_return: f64,
    pub count: usize,
}

fn sample_mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sample_std(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Log returns `r_i = ln(p_i / p_{i-1})` for `i = 1..n`.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect()
}

/// Compute [`Statistics`] over `prices` (after removing nulls upstream).
/// Returns `None` if fewer than 2 observations remain.
pub fn calculate_statistics(prices: &[f64]) -> Option<Statistics> {
    if prices.len() < 2 {
        return None;
    }

    let mean = sample_mean(prices);
    let std = sample_std(prices, mean);
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let last = *prices.last().unwrap();

    let returns = log_returns(prices);
    let (returns_mean, returns_std, cumulative_return) = if returns.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let r_mean = sample_mean(&returns);
        let r_std = sample_std(&returns, r_mean);
        let cumulative = returns.iter().sum::<f64>().exp() - 1.0;
        (r_mean, r_std, cumulative)
    };

    Some(Statistics {
        mean,
        std,
        min,
        max,
        last,
        returns_mean,
        returns_std,
        cumulative_return,
        count: prices.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_points_is_no_result() {
        assert!(calculate_statistics(&[]).is_none());
        assert!(calculate_statistics(&[1.0]).is_none());
    }

    #[test]
    fn constant_series_has_zero_std_and_zero_returns() {
        let stats = calculate_statistics(&[10.0, 10.0, 10.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.returns_mean, 0.0);
        assert!((stats.cumulative_return).abs() < 1e-12);
        assert_eq!(stats.last, 10.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn basic_stats_match_hand_computation() {
        let stats = calculate_statistics(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.last, 3.0);
    }
}
