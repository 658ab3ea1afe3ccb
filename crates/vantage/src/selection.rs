//! Selection Collector: validated input and the single price fetch.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use vantage_data::{PriceSource, PriceTable, Ticker};

use crate::error::{Result, SelectionError};
use crate::universe::Universe;

/// Chosen assets and the date window to analyze.
///
/// Assets are unique, in the order they were first given, and never
/// include the benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    assets: Vec<Ticker>,
    start: NaiveDate,
    end: NaiveDate,
}

impl Selection {
    /// Validate raw tickers and a date window.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] for a malformed ticker, the benchmark
    /// given as an asset, or `start > end`.
    pub fn new<I, S>(
        tickers: I,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if start > end {
            return Err(SelectionError::InvalidDateRange { start, end });
        }

        let mut assets: Vec<Ticker> = Vec::new();
        for raw in tickers {
            let ticker =
                Ticker::parse(raw.as_ref()).map_err(SelectionError::InvalidTicker)?;
            if ticker.is_benchmark() {
                return Err(SelectionError::BenchmarkSelected(ticker.into()));
            }
            if !assets.contains(&ticker) {
                assets.push(ticker);
            }
        }

        Ok(Self { assets, start, end })
    }

    /// Selected assets, benchmark excluded.
    pub fn assets(&self) -> &[Ticker] {
        &self.assets
    }

    /// First date of the window.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the window.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Symbols sent to the price source: the assets then the benchmark.
    pub fn request_symbols(&self) -> Vec<Ticker> {
        let mut symbols = Vec::with_capacity(self.assets.len() + 1);
        symbols.extend(self.assets.iter().cloned());
        symbols.push(Ticker::benchmark());
        symbols
    }

    /// Assets that are not part of `universe`.
    pub fn unknown_in<U: Universe>(&self, universe: &U) -> Vec<&Ticker> {
        self.assets
            .iter()
            .filter(|t| !universe.contains(t))
            .collect()
    }
}

/// Fetch the price table for a selection.
///
/// An empty selection yields `Ok(None)` without touching `source`.
/// Otherwise the benchmark is appended and exactly one fetch is issued;
/// its failure is returned unchanged.
///
/// # Errors
///
/// Returns [`crate::SessionError::Data`] when the source fails.
pub async fn collect<S>(source: &S, selection: &Selection) -> Result<Option<PriceTable>>
where
    S: PriceSource + Sync,
{
    if selection.is_empty() {
        debug!("Empty selection, skipping fetch");
        return Ok(None);
    }

    let symbols = selection.request_symbols();
    info!(
        symbols = symbols.len(),
        start = %selection.start(),
        end = %selection.end(),
        "Collecting prices"
    );

    let table = source
        .fetch_prices(&symbols, selection.start(), selection.end())
        .await?;
    debug!(rows = table.height(), columns = table.width(), "Price table ready");

    Ok(Some(table))
}
