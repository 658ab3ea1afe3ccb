//! Portfolio weights.

use ndarray::Array1;

use crate::error::{AnalyticsError, Result};

/// Equal weights `1/n` for `n` assets.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptySelection`] when `n` is zero.
///
/// # Examples
///
/// ```
/// use vantage_analytics::equal_weights;
///
/// let w = equal_weights(4).unwrap();
/// assert_eq!(w.len(), 4);
/// assert!((w.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn equal_weights(n: usize) -> Result<Array1<f64>> {
    if n == 0 {
        return Err(AnalyticsError::EmptySelection);
    }
    Ok(Array1::from_elem(n, 1.0 / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(49)]
    #[case(500)]
    fn test_weights_sum_to_one(#[case] n: usize) {
        let w = equal_weights(n).unwrap();
        assert_eq!(w.len(), n);
        assert!((w.sum() - 1.0).abs() < 1e-9);
        assert!(w.iter().all(|&x| x == w[0]));
    }

    #[test]
    fn test_zero_assets() {
        assert!(matches!(equal_weights(0), Err(AnalyticsError::EmptySelection)));
    }
}
