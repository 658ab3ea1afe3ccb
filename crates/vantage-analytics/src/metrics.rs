//! Scalar risk and return metrics.

use ndarray::ArrayView1;

/// Trading sessions per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Base value of a normalized series.
pub(crate) const NORMALIZED_BASE: f64 = 100.0;

/// Annualized volatility of a daily return series.
///
/// Sample standard deviation (`n - 1` denominator) scaled by
/// `sqrt(252)`. Fewer than two observations give `NaN`; non-finite
/// returns propagate.
pub fn annualized_volatility(returns: ArrayView1<'_, f64>) -> f64 {
    let n = returns.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean = returns.sum() / n as f64;
    let var = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    var.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Fractional change over the window, from a series normalized to 100.
pub fn total_return(normalized: ArrayView1<'_, f64>) -> f64 {
    normalized
        .last()
        .map_or(f64::NAN, |last| (last - NORMALIZED_BASE) / NORMALIZED_BASE)
}

/// Total return per unit of annualized volatility.
///
/// No risk-free rate is subtracted and nothing is guarded: a flat series
/// gives `0 / 0 = NaN`.
pub fn sharpe_like(total_return: f64, volatility: f64) -> f64 {
    total_return / volatility
}
