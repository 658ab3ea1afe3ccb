//! Offline price source backed by a wide CSV file.
//!
//! The file has a `date` header followed by one column per ticker:
//!
//! ```text
//! date,PETR4,VALE3,BRAX11
//! 2024-01-02,37.10,74.20,112.40
//! ```

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{DataError, Result};
use crate::source::PriceSource;
use crate::table::PriceTable;
use crate::ticker::Ticker;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serves prices from a table loaded once from CSV.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    table: PriceTable,
}

impl CsvPriceSource {
    /// Load prices from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let source = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            rows = source.table.height(),
            columns = source.table.width(),
            "loaded price file"
        );
        Ok(source)
    }

    /// Load prices from any CSV reader. Rows may be in any order; column
    /// names may carry a provider suffix such as `.SA`, which is removed.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.get(0).map(str::to_lowercase).as_deref() != Some("date") {
            return Err(DataError::Parse(
                "first column of the price file must be `date`".to_string(),
            ));
        }
        let tickers = headers
            .iter()
            .skip(1)
            .map(|h| Ticker::from_provider_symbol(h, crate::ticker::B3_SUFFIX))
            .collect::<Result<Vec<_>>>()?;

        let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let raw_date = record.get(0).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
                .map_err(|e| DataError::Parse(format!("date {raw_date:?}: {e}")))?;
            let values = record
                .iter()
                .skip(1)
                .map(|cell| {
                    cell.parse::<f64>()
                        .map_err(|e| DataError::Parse(format!("{date}: {cell:?}: {e}")))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push((date, values));
        }
        rows.sort_by_key(|(date, _)| *date);

        let dates = rows.iter().map(|(date, _)| *date).collect();
        let columns = tickers
            .into_iter()
            .enumerate()
            .map(|(j, ticker)| {
                let series = rows.iter().map(|(_, values)| values[j]).collect();
                (ticker, series)
            })
            .collect();

        Ok(Self {
            table: PriceTable::new(dates, columns)?,
        })
    }

    /// The full table as loaded.
    pub const fn table(&self) -> &PriceTable {
        &self.table
    }

    fn window(&self, symbols: &[Ticker], start: NaiveDate, end: NaiveDate) -> Result<PriceTable> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let rows: Vec<usize> = self
            .table
            .dates()
            .iter()
            .enumerate()
            .filter(|(_, d)| (start..end).contains(*d))
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            return Err(DataError::MissingData {
                symbol: "batch".to_string(),
                reason: format!("No prices between {start} and {end}"),
            });
        }

        let selected = self.table.select(symbols)?;
        let dates = rows.iter().map(|&i| self.table.dates()[i]).collect();
        let columns = symbols
            .iter()
            .enumerate()
            .map(|(j, ticker)| {
                let series = rows.iter().map(|&i| selected[[i, j]]).collect();
                (ticker.clone(), series)
            })
            .collect();

        PriceTable::new(dates, columns)
    }
}

impl PriceSource for CsvPriceSource {
    async fn fetch_prices(
        &self,
        symbols: &[Ticker],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        self.window(symbols, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PRICES: &str = "\
date,PETR4.SA,VALE3,BRAX11
2024-01-03,37.5,73.0,113.0
2024-01-02,37.1,74.2,112.4
2024-01-04,38.0,72.5,114.1
";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_reader_sorts_and_strips() {
        let source = CsvPriceSource::from_reader(PRICES.as_bytes()).unwrap();
        let table = source.table();

        assert_eq!(table.dates(), &[day(2), day(3), day(4)]);
        assert_eq!(table.columns()[0].as_str(), "PETR4");
        assert_relative_eq!(table.prices()[[0, 0]], 37.1);
    }

    #[test]
    fn test_rejects_missing_date_header() {
        let result = CsvPriceSource::from_reader("day,PETR4\n2024-01-02,1.0\n".as_bytes());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_rejects_bad_price() {
        let result = CsvPriceSource::from_reader("date,PETR4\n2024-01-02,abc\n".as_bytes());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_prices_window() {
        let source = CsvPriceSource::from_reader(PRICES.as_bytes()).unwrap();
        let symbols = [Ticker::parse("VALE3").unwrap(), Ticker::benchmark()];

        let table = source.fetch_prices(&symbols, day(3), day(10)).await.unwrap();
        assert_eq!(table.dates(), &[day(3), day(4)]);
        assert_eq!(table.columns(), &symbols);
        assert_relative_eq!(table.prices()[[1, 1]], 114.1);
    }

    #[tokio::test]
    async fn test_fetch_prices_excludes_end_date() {
        let source = CsvPriceSource::from_reader(PRICES.as_bytes()).unwrap();
        let symbols = [Ticker::benchmark()];

        let table = source.fetch_prices(&symbols, day(2), day(4)).await.unwrap();
        assert_eq!(table.dates(), &[day(2), day(3)]);

        assert!(matches!(
            source.fetch_prices(&symbols, day(3), day(3)).await,
            Err(DataError::MissingData { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_prices_errors() {
        let source = CsvPriceSource::from_reader(PRICES.as_bytes()).unwrap();
        let unknown = [Ticker::parse("ITUB4").unwrap()];
        assert!(matches!(
            source.fetch_prices(&unknown, day(2), day(5)).await,
            Err(DataError::MissingData { .. })
        ));

        let benchmark = [Ticker::benchmark()];
        assert!(matches!(
            source.fetch_prices(&benchmark, day(20), day(25)).await,
            Err(DataError::MissingData { .. })
        ));
        assert!(matches!(
            source.fetch_prices(&benchmark, day(4), day(2)).await,
            Err(DataError::InvalidDateRange { .. })
        ));
    }
}
