//! Date-indexed table of adjusted close prices.
//!
//! A [`PriceTable`] has one row per trading date (strictly ascending) and one
//! column per [`Ticker`]. Every cell holds a value: gaps are resolved once,
//! when the table is built from provider quotes, so downstream analytics can
//! treat the table as a dense matrix.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use polars::prelude::*;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::ticker::Ticker;

/// Days from 0001-01-01 (CE) to the Unix epoch, for Polars `Date` values.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Adjusted close prices keyed by trading date and ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Ticker>,
    prices: Array2<f64>,
}

impl PriceTable {
    /// Build a table from per-ticker price vectors aligned with `dates`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Schema`] when the table has no rows or columns,
    /// the dates are not strictly ascending, a ticker repeats, or a column
    /// length differs from the number of dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use vantage_data::{PriceTable, Ticker};
    ///
    /// let dates = vec![
    ///     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    /// ];
    /// let table = PriceTable::new(
    ///     dates,
    ///     vec![(Ticker::parse("PETR4").unwrap(), vec![37.1, 37.5])],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.height(), 2);
    /// assert_eq!(table.width(), 1);
    /// ```
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(Ticker, Vec<f64>)>) -> Result<Self> {
        if dates.is_empty() {
            return Err(DataError::Schema("table has no rows".to_string()));
        }
        if columns.is_empty() {
            return Err(DataError::Schema("table has no columns".to_string()));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DataError::Schema(format!(
                "dates must be strictly ascending ({} then {})",
                pair[0], pair[1]
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        let mut prices = Array2::<f64>::zeros((dates.len(), columns.len()));
        let mut tickers = Vec::with_capacity(columns.len());

        for (j, (ticker, values)) in columns.into_iter().enumerate() {
            if !seen.insert(ticker.clone()) {
                return Err(DataError::Schema(format!("duplicate column {ticker}")));
            }
            if values.len() != dates.len() {
                return Err(DataError::Schema(format!(
                    "column {ticker} has {} values for {} dates",
                    values.len(),
                    dates.len()
                )));
            }
            for (i, value) in values.into_iter().enumerate() {
                prices[[i, j]] = value;
            }
            tickers.push(ticker);
        }

        Ok(Self {
            dates,
            columns: tickers,
            prices,
        })
    }

    /// Build a table from long-format provider quotes.
    ///
    /// `quotes` must carry `symbol` (string), `date` (date) and
    /// `adjusted_close` (float) columns. Symbols are matched against
    /// `symbols` after removing `suffix`, and the table columns follow the
    /// order of `symbols`.
    ///
    /// Rows span the union of all returned dates. Leading rows where some
    /// column has not started trading yet are dropped, as are trailing rows
    /// after some column's last price. Interior gaps are forward-filled from
    /// the previous session, and non-finite prices count as gaps.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingData`] when a requested symbol has no
    /// quotes or no date has a price for every symbol.
    pub fn from_quotes(quotes: &DataFrame, symbols: &[Ticker], suffix: &str) -> Result<Self> {
        let index: HashMap<&Ticker, usize> =
            symbols.iter().enumerate().map(|(j, t)| (t, j)).collect();

        let symbol_col = quotes.column("symbol")?.as_materialized_series().clone();
        let day_col = quotes
            .column("date")?
            .as_materialized_series()
            .cast(&DataType::Int32)?;
        let close_col = quotes
            .column("adjusted_close")?
            .as_materialized_series()
            .cast(&DataType::Float64)?;

        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        let mut last_seen: Vec<Option<NaiveDate>> = vec![None; symbols.len()];

        for ((symbol, day), close) in symbol_col
            .str()?
            .into_iter()
            .zip(day_col.i32()?)
            .zip(close_col.f64()?)
        {
            let (Some(symbol), Some(day)) = (symbol, day) else {
                continue;
            };
            let ticker = Ticker::from_provider_symbol(symbol, suffix)?;
            let Some(&j) = index.get(&ticker) else {
                continue;
            };
            let date = NaiveDate::from_num_days_from_ce_opt(day + UNIX_EPOCH_DAYS_FROM_CE)
                .ok_or_else(|| DataError::TimeConversion(format!("day {day} out of range")))?;

            let row = rows
                .entry(date)
                .or_insert_with(|| vec![None; symbols.len()]);
            if let Some(price) = close.filter(|p| p.is_finite()) {
                row[j] = Some(price);
                last_seen[j] = last_seen[j].max(Some(date));
            }
        }

        if let Some(j) = last_seen.iter().position(Option::is_none) {
            return Err(DataError::MissingData {
                symbol: symbols[j].to_string(),
                reason: "No prices returned for the requested window".to_string(),
            });
        }
        let cutoff = last_seen.iter().flatten().min().copied();

        let mut last: Vec<Option<f64>> = vec![None; symbols.len()];
        let mut dates = Vec::with_capacity(rows.len());
        let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); symbols.len()];
        let mut filled = 0usize;
        let mut skipped = 0usize;

        for (date, row) in rows {
            if cutoff.is_some_and(|c| date > c) {
                skipped += 1;
                continue;
            }
            for (j, cell) in row.into_iter().enumerate() {
                match cell {
                    Some(price) => last[j] = Some(price),
                    None if last[j].is_some() => filled += 1,
                    None => {}
                }
            }
            if last.iter().all(Option::is_some) {
                dates.push(date);
                for (column, price) in values.iter_mut().zip(&last) {
                    column.push(price.unwrap_or(f64::NAN));
                }
            } else {
                skipped += 1;
            }
        }

        if dates.is_empty() {
            return Err(DataError::MissingData {
                symbol: "batch".to_string(),
                reason: "No date has prices for every symbol".to_string(),
            });
        }

        debug!(
            rows = dates.len(),
            columns = symbols.len(),
            skipped,
            filled,
            "built price table from quotes"
        );

        Self::new(dates, symbols.iter().cloned().zip(values).collect())
    }

    /// Trading dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column tickers in table order.
    pub fn columns(&self) -> &[Ticker] {
        &self.columns
    }

    /// Price matrix, rows are dates and columns follow [`Self::columns`].
    pub fn prices(&self) -> ArrayView2<'_, f64> {
        self.prices.view()
    }

    /// Number of rows (trading dates).
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns (tickers).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// First trading date.
    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last trading date.
    pub fn end(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Position of a ticker among the columns.
    pub fn position(&self, ticker: &Ticker) -> Option<usize> {
        self.columns.iter().position(|c| c == ticker)
    }

    /// Price series of one ticker.
    pub fn column(&self, ticker: &Ticker) -> Option<ArrayView1<'_, f64>> {
        self.position(ticker).map(|j| self.prices.column(j))
    }

    /// Copy the named columns, in the given order, into a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingData`] when a ticker is not in the table.
    pub fn select(&self, tickers: &[Ticker]) -> Result<Array2<f64>> {
        let positions = tickers
            .iter()
            .map(|t| {
                self.position(t).ok_or_else(|| DataError::MissingData {
                    symbol: t.to_string(),
                    reason: "Not a column of the price table".to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.prices.select(Axis(1), &positions))
    }

    /// Convert to a Polars DataFrame with a `date` column followed by one
    /// column per ticker.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let names: Vec<String> = self.columns.iter().map(ToString::to_string).collect();
        frame_from_matrix(&self.dates, &names, self.prices.view())
    }
}

/// Assemble a wide DataFrame from a date index, column names and a value
/// matrix with one column per name.
pub fn frame_from_matrix(
    dates: &[NaiveDate],
    names: &[String],
    values: ArrayView2<'_, f64>,
) -> Result<DataFrame> {
    if values.nrows() != dates.len() || values.ncols() != names.len() {
        return Err(DataError::Schema(format!(
            "matrix is {}x{} for {} dates and {} names",
            values.nrows(),
            values.ncols(),
            dates.len(),
            names.len()
        )));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(names.len() + 1);
    columns.push(Series::new("date".into(), dates.to_vec()).into());
    for (name, column) in names.iter().zip(values.columns()) {
        columns.push(Series::new(name.as_str().into(), column.to_vec()).into());
    }

    Ok(DataFrame::new(columns)?)
}
