//! Risk metrics derived from equity curves.
//!
//! Both functions are pure and total: any input slice produces a finite
//! answer (degenerate inputs map to 0.0), so callers never need to guard.

/// Annualized Sharpe-like ratio over an equity series.
///
/// Computes simple period-over-period returns, then mean / population
/// standard deviation, annualized with sqrt(252). This is a relative
/// risk-adjusted-return proxy; no risk-free rate is subtracted.
pub fn sharpe_ratio(equity: &[f64]) -> f64 {
    if equity.len() < 3 {
        return 0.0;
    }

    let returns: Vec<f64> = equity
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>() / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }

    // Annualized assuming 252 trading periods per year
    mean / std_dev * (252.0_f64).sqrt()
}

/// Maximum drawdown over an equity series, as a percentage (0..=100).
///
/// Tracks a running peak and reports the largest fractional decline from
/// that peak. Non-decreasing series yield exactly 0.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }

    let mut peak = equity[0];
    let mut max_dd = 0.0;
    for &value in &equity[1..] {
        if value > peak {
            peak = value;
        }
        let dd = (peak - value) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharpe_is_zero_below_three_points() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[100.0]), 0.0);
        assert_eq!(sharpe_ratio(&[100.0, 110.0]), 0.0);
    }

    #[test]
    fn sharpe_is_zero_for_constant_series() {
        assert_eq!(sharpe_ratio(&[100.0, 100.0, 100.0, 100.0]), 0.0);
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        // Uneven gains so the return variance is non-zero
        let sharpe = sharpe_ratio(&[100.0, 101.0, 103.0, 104.0, 107.0]);
        assert!(sharpe > 0.0);
        assert!(sharpe.is_finite());
    }

    #[test]
    fn drawdown_is_zero_below_two_points() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[100.0]), 0.0);
    }

    #[test]
    fn drawdown_is_zero_for_non_decreasing_series() {
        assert_eq!(max_drawdown(&[100.0, 100.0, 105.0, 110.0]), 0.0);
    }

    #[test]
    fn drawdown_measures_peak_to_trough() {
        // Peak 120, trough 90: (120 - 90) / 120 = 25%
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 130.0]);
        assert!((dd - 25.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_stays_within_percentage_bounds() {
        let series = [100.0, 40.0, 160.0, 20.0, 25.0];
        let dd = max_drawdown(&series);
        assert!(dd >= 0.0);
        assert!(dd <= 100.0);
    }
}
