//! Portfolio analytics over a price table.
//!
//! [`analyze`] runs the full pipeline:
//!
//! 1. weight the selected assets equally and append a `Portfolio` column,
//! 2. rebase every column (benchmark and portfolio included) to 100,
//! 3. compute daily simple returns,
//! 4. annualize the sample volatility of those returns with `sqrt(252)`,
//! 5. read the total return off the last normalized value.
//!
//! The benchmark, and any other column that is not a selected asset, is
//! carried along as a reference series but never weighted.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, concatenate};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vantage_data::table::frame_from_matrix;
use vantage_data::{PriceTable, Ticker};

use crate::error::{AnalyticsError, Result};
use crate::metrics::{annualized_volatility, sharpe_like, total_return};
use crate::transform::{normalize, pct_change, weighted_series};
use crate::weights::equal_weights;

/// Label of the synthetic equal-weighted column.
pub const PORTFOLIO_LABEL: &str = "Portfolio";

/// Identifies one series of the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ticker", rename_all = "snake_case")]
pub enum SeriesKey {
    /// A selected asset.
    Asset(Ticker),
    /// A reference column that is not part of the portfolio.
    Benchmark(Ticker),
    /// The equal-weighted portfolio.
    Portfolio,
}

impl SeriesKey {
    /// Ticker behind the series, `None` for the portfolio.
    pub const fn ticker(&self) -> Option<&Ticker> {
        match self {
            Self::Asset(t) | Self::Benchmark(t) => Some(t),
            Self::Portfolio => None,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Asset(t) | Self::Benchmark(t) => t.as_str(),
            Self::Portfolio => PORTFOLIO_LABEL,
        }
    }

    /// Whether this is the portfolio series.
    pub const fn is_portfolio(&self) -> bool {
        matches!(self, Self::Portfolio)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annualized volatility and total return of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturn {
    /// Series this pair belongs to.
    pub key: SeriesKey,
    /// Annualized volatility (fraction, 0.25 = 25%).
    pub volatility: f64,
    /// Total return over the window (fraction).
    pub total_return: f64,
}

impl RiskReturn {
    /// Total return divided by volatility, unguarded.
    pub fn sharpe_like(&self) -> f64 {
        sharpe_like(self.total_return, self.volatility)
    }
}

/// Everything derived from one price table.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    dates: Vec<NaiveDate>,
    keys: Vec<SeriesKey>,
    weights: Vec<(Ticker, f64)>,
    prices: Array2<f64>,
    normalized: Array2<f64>,
    returns: Array2<f64>,
    metrics: Vec<RiskReturn>,
}

/// Run the analytics pipeline on `table` for the selected `assets`.
///
/// Output columns follow the table's column order with `Portfolio` last.
///
/// # Errors
///
/// Fails when `assets` is empty, repeats a ticker, or names a ticker that
/// is not a column of `table`. Numeric degeneracies (flat or zero prices)
/// are not errors.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vantage_analytics::{SeriesKey, analyze};
/// use vantage_data::{PriceTable, Ticker};
///
/// let dates = (2..5)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
///     .collect();
/// let x = Ticker::parse("X").unwrap();
/// let table = PriceTable::new(
///     dates,
///     vec![
///         (x.clone(), vec![10.0, 11.0, 9.0]),
///         (Ticker::benchmark(), vec![100.0, 110.0, 90.0]),
///     ],
/// )
/// .unwrap();
///
/// let report = analyze(&table, &[x]).unwrap();
/// let portfolio = report.metric(&SeriesKey::Portfolio).unwrap();
/// assert!((portfolio.total_return + 0.10).abs() < 1e-12);
/// ```
pub fn analyze(table: &PriceTable, assets: &[Ticker]) -> Result<AnalyticsReport> {
    let mut seen = HashSet::with_capacity(assets.len());
    for asset in assets {
        if !seen.insert(asset) {
            return Err(AnalyticsError::DuplicateAsset(asset.to_string()));
        }
        if table.position(asset).is_none() {
            return Err(AnalyticsError::UnknownAsset(asset.to_string()));
        }
    }

    let weights = equal_weights(assets.len())?;
    let asset_prices = table.select(assets)?;
    let portfolio = weighted_series(asset_prices.view(), weights.view())?;

    let prices = concatenate(
        Axis(1),
        &[table.prices(), portfolio.view().insert_axis(Axis(1))],
    )?;

    let mut keys: Vec<SeriesKey> = table
        .columns()
        .iter()
        .map(|t| {
            if seen.contains(t) {
                SeriesKey::Asset(t.clone())
            } else {
                SeriesKey::Benchmark(t.clone())
            }
        })
        .collect();
    keys.push(SeriesKey::Portfolio);

    let normalized = normalize(prices.view());
    let returns = pct_change(prices.view());

    let metrics: Vec<RiskReturn> = keys
        .iter()
        .enumerate()
        .map(|(j, key)| RiskReturn {
            key: key.clone(),
            volatility: annualized_volatility(returns.column(j)),
            total_return: total_return(normalized.column(j)),
        })
        .collect();

    debug!(
        rows = table.height(),
        assets = assets.len(),
        series = keys.len(),
        "computed portfolio analytics"
    );

    Ok(AnalyticsReport {
        dates: table.dates().to_vec(),
        keys,
        weights: assets.iter().cloned().zip(weights.iter().copied()).collect(),
        prices,
        normalized,
        returns,
        metrics,
    })
}

impl AnalyticsReport {
    /// Trading dates of the price and normalized series.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Dates of the return series (the first date is dropped).
    pub fn return_dates(&self) -> &[NaiveDate] {
        self.dates.get(1..).unwrap_or_default()
    }

    /// Series keys in column order, `Portfolio` last.
    pub fn keys(&self) -> &[SeriesKey] {
        &self.keys
    }

    /// Portfolio weights by asset.
    pub fn weights(&self) -> &[(Ticker, f64)] {
        &self.weights
    }

    /// Raw prices including the portfolio column.
    pub fn prices(&self) -> ArrayView2<'_, f64> {
        self.prices.view()
    }

    /// Prices rebased to 100.
    pub fn normalized(&self) -> ArrayView2<'_, f64> {
        self.normalized.view()
    }

    /// Daily simple returns, one row fewer than [`Self::prices`].
    pub fn returns(&self) -> ArrayView2<'_, f64> {
        self.returns.view()
    }

    /// Volatility and total return for every series, in column order.
    pub fn metrics(&self) -> &[RiskReturn] {
        &self.metrics
    }

    /// Metrics for one series.
    pub fn metric(&self, key: &SeriesKey) -> Option<&RiskReturn> {
        self.metrics.iter().find(|m| &m.key == key)
    }

    /// Column index of a series.
    pub fn position(&self, key: &SeriesKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Normalized values of one series.
    pub fn normalized_series(&self, key: &SeriesKey) -> Option<ArrayView1<'_, f64>> {
        self.position(key).map(|j| self.normalized.column(j))
    }

    /// Return series of one series.
    pub fn return_series(&self, key: &SeriesKey) -> Option<ArrayView1<'_, f64>> {
        self.position(key).map(|j| self.returns.column(j))
    }

    /// Normalized table as a Polars DataFrame (`date` plus one column per series).
    pub fn normalized_frame(&self) -> Result<DataFrame> {
        let names: Vec<String> = self.keys.iter().map(ToString::to_string).collect();
        Ok(frame_from_matrix(&self.dates, &names, self.normalized.view())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    fn table() -> PriceTable {
        let dates = (2..5)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        PriceTable::new(
            dates,
            vec![
                (ticker("X"), vec![10.0, 11.0, 9.0]),
                (ticker("Y"), vec![20.0, 22.0, 18.0]),
                (Ticker::benchmark(), vec![100.0, 110.0, 90.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_keys_and_weights() {
        let report = analyze(&table(), &[ticker("X"), ticker("Y")]).unwrap();

        assert_eq!(
            report.keys(),
            &[
                SeriesKey::Asset(ticker("X")),
                SeriesKey::Asset(ticker("Y")),
                SeriesKey::Benchmark(Ticker::benchmark()),
                SeriesKey::Portfolio,
            ]
        );
        assert_eq!(report.weights().len(), 2);
        assert_relative_eq!(report.weights()[0].1, 0.5);
        assert_eq!(report.prices().dim(), (3, 4));
        assert_eq!(report.returns().dim(), (2, 4));
        assert_eq!(report.return_dates().len(), 2);
    }

    #[test]
    fn test_benchmark_excluded_from_portfolio() {
        let report = analyze(&table(), &[ticker("X")]).unwrap();
        let j = report.position(&SeriesKey::Portfolio).unwrap();

        assert_relative_eq!(report.prices()[[0, j]], 10.0);
        assert_relative_eq!(report.prices()[[1, j]], 11.0);
    }

    #[test]
    fn test_rejects_bad_selection() {
        assert!(matches!(
            analyze(&table(), &[]),
            Err(AnalyticsError::EmptySelection)
        ));
        assert!(matches!(
            analyze(&table(), &[ticker("X"), ticker("X")]),
            Err(AnalyticsError::DuplicateAsset(_))
        ));
        assert!(matches!(
            analyze(&table(), &[ticker("Z")]),
            Err(AnalyticsError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_series_key_labels() {
        assert_eq!(SeriesKey::Portfolio.to_string(), PORTFOLIO_LABEL);
        assert_eq!(SeriesKey::Asset(ticker("petr4")).label(), "PETR4");
        assert!(SeriesKey::Portfolio.ticker().is_none());
        assert!(SeriesKey::Portfolio.is_portfolio());
    }

    #[test]
    fn test_normalized_frame() {
        let report = analyze(&table(), &[ticker("X"), ticker("Y")]).unwrap();
        let frame = report.normalized_frame().unwrap();

        assert_eq!(frame.height(), 3);
        assert_eq!(frame.width(), 5);
        assert_eq!(
            frame.get_column_names(),
            vec!["date", "X", "Y", "BRAX11", "Portfolio"]
        );
    }
}
