//! Column-wise transforms over price matrices.
//!
//! Matrices are laid out with one row per trading date and one column per
//! series. None of these functions guard against zero prices: a zero base
//! or a zero predecessor yields `inf`/`NaN` in that column only.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Slice};

use crate::error::{AnalyticsError, Result};

/// Per-row dot product of `prices` with `weights`.
///
/// # Errors
///
/// Returns [`AnalyticsError::Shape`] when the number of columns differs from
/// the number of weights.
pub fn weighted_series(prices: ArrayView2<'_, f64>, weights: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    if prices.ncols() != weights.len() {
        return Err(AnalyticsError::Shape(ndarray::ShapeError::from_kind(
            ndarray::ErrorKind::IncompatibleShape,
        )));
    }
    Ok(prices.dot(&weights))
}

/// Rebase every column so its first row equals 100.
///
/// The division happens before the scaling so the first row is exactly
/// `100.0` for any non-zero finite base.
pub fn normalize(prices: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut out = prices.to_owned();
    for mut column in out.columns_mut() {
        if let Some(&base) = column.first() {
            column.mapv_inplace(|v| v / base * 100.0);
        }
    }
    out
}

/// Simple returns `p[t] / p[t-1] - 1`, one row shorter than the input.
pub fn pct_change(prices: ArrayView2<'_, f64>) -> Array2<f64> {
    if prices.nrows() < 2 {
        return Array2::zeros((0, prices.ncols()));
    }
    let current = prices.slice_axis(Axis(0), Slice::from(1..));
    let previous = prices.slice_axis(Axis(0), Slice::from(..-1));
    &current / &previous - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_weighted_series() {
        let prices = array![[10.0, 20.0], [11.0, 22.0], [9.0, 18.0]];
        let weights = array![0.5, 0.5];

        let series = weighted_series(prices.view(), weights.view()).unwrap();
        assert_relative_eq!(series[0], 15.0);
        assert_relative_eq!(series[1], 16.5);
        assert_relative_eq!(series[2], 13.5);
    }

    #[test]
    fn test_weighted_series_shape_mismatch() {
        let prices = array![[10.0, 20.0]];
        let weights = array![1.0];
        assert!(matches!(
            weighted_series(prices.view(), weights.view()),
            Err(AnalyticsError::Shape(_))
        ));
    }

    #[test]
    fn test_normalize_first_row_is_exactly_100() {
        let prices = array![[3.7, 0.013, 12_345.678], [4.1, 0.012, 12_000.0]];
        let normalized = normalize(prices.view());

        for j in 0..3 {
            assert_eq!(normalized[[0, j]], 100.0);
        }
        assert_relative_eq!(normalized[[1, 0]], 4.1 / 3.7 * 100.0);
    }

    #[test]
    fn test_normalize_zero_base_passes_through() {
        let prices = array![[0.0, 1.0], [1.0, 2.0]];
        let normalized = normalize(prices.view());

        assert!(normalized[[0, 0]].is_nan());
        assert!(normalized[[1, 0]].is_infinite());
        assert_relative_eq!(normalized[[1, 1]], 200.0);
    }

    #[test]
    fn test_pct_change() {
        let prices = array![[10.0, 5.0], [11.0, 5.0], [9.9, 5.0]];
        let returns = pct_change(prices.view());

        assert_eq!(returns.dim(), (2, 2));
        assert_relative_eq!(returns[[0, 0]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[[1, 0]], -0.1, epsilon = 1e-12);
        assert_eq!(returns[[0, 1]], 0.0);
        assert_eq!(returns[[1, 1]], 0.0);
    }

    #[test]
    fn test_pct_change_on_strided_view() {
        // Every other row of a wider matrix, as a non-contiguous view
        let prices = array![[10.0, 0.0], [99.0, 1.0], [12.0, 2.0], [99.0, 3.0], [9.0, 4.0]];
        let view = prices.slice_axis(Axis(0), Slice::new(0, None, 2));
        let returns = pct_change(view);

        assert_eq!(returns.dim(), (2, 2));
        assert_relative_eq!(returns[[0, 0]], 0.2, epsilon = 1e-12);
        assert_relative_eq!(returns[[1, 0]], -0.25, epsilon = 1e-12);
        assert!(returns[[0, 1]].is_infinite());
        assert_relative_eq!(returns[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pct_change_single_row() {
        let prices = array![[10.0, 5.0]];
        assert_eq!(pct_change(prices.view()).dim(), (0, 2));
    }
}
