//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::source::PriceSource;
use crate::table::PriceTable;
use crate::ticker::{B3_SUFFIX, Ticker};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use polars::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

/// Default number of symbols fetched concurrently.
const DEFAULT_CONCURRENCY: usize = 4;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
    suffix: String,
    concurrency: usize,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("suffix", &self.suffix)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider for B3 listings with a 250ms delay between requests.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a provider for B3 listings with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
            suffix: B3_SUFFIX.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    /// Use a different exchange suffix (empty for US listings).
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Limit the number of in-flight requests.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Exchange suffix appended to every symbol.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Fetch daily quotes for a single provider symbol.
    ///
    /// # Arguments
    /// * `symbol` - The provider symbol (e.g., "PETR4.SA")
    /// * `start` - Start of the window
    /// * `end` - End of the window
    ///
    /// # Returns
    /// A Polars DataFrame with columns: symbol, date, close, adjusted_close
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        debug!(symbol, %start, %end, "requesting quote history");
        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let timestamps: Vec<i64> = quotes.iter().map(|q| q.timestamp as i64).collect();
        let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
        let adj_closes: Vec<f64> = quotes.iter().map(|q| q.adjclose).collect();

        let mut df = DataFrame::new(vec![
            Series::new("timestamp".into(), timestamps).into(),
            Series::new("close".into(), closes).into(),
            Series::new("adjusted_close".into(), adj_closes).into(),
        ])?;

        let symbol_col: Column = Series::new("symbol".into(), vec![symbol; df.height()]).into();
        df.with_column(symbol_col)?;

        let df = df
            .lazy()
            .with_column(
                (col("timestamp") * lit(1_000_000_000))
                    .cast(DataType::Datetime(TimeUnit::Nanoseconds, None))
                    .cast(DataType::Date)
                    .alias("date"),
            )
            .select(&[
                col("symbol"),
                col("date"),
                col("close"),
                col("adjusted_close"),
            ])
            .collect()?;

        sleep(self.rate_limit_delay).await;

        Ok(df)
    }

    /// Fetch quotes for several tickers and stack them in long format.
    ///
    /// Up to `concurrency` requests are in flight; each slot pauses for the
    /// rate-limit delay after its request. The first failure aborts the batch.
    pub async fn fetch_quotes_batch(
        &self,
        symbols: &[Ticker],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DataFrame> {
        let provider_symbols: Vec<String> =
            symbols.iter().map(|t| t.with_suffix(&self.suffix)).collect();

        let frames: Vec<LazyFrame> = stream::iter(provider_symbols)
            .map(|symbol| async move {
                self.fetch_quotes(&symbol, start, end)
                    .await
                    .map(DataFrame::lazy)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        if frames.is_empty() {
            return Err(DataError::MissingData {
                symbol: "batch".to_string(),
                reason: "No symbols requested".to_string(),
            });
        }

        Ok(concat(frames, UnionArgs::default())?.collect()?)
    }
}

/// Request bounds for the half-open date window `[start, end)`.
///
/// Both bounds are midnight UTC, so the session dated `end` (including an
/// unfinished one today) is never part of the response.
fn request_window(start: NaiveDate, end: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if start > end {
        return Err(DataError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if start == end {
        return Err(DataError::MissingData {
            symbol: "batch".to_string(),
            reason: format!("Empty window starting and ending on {start}"),
        });
    }
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

impl PriceSource for YahooQuoteProvider {
    async fn fetch_prices(
        &self,
        symbols: &[Ticker],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        let (window_start, window_end) = request_window(start, end)?;

        info!(
            symbols = symbols.len(),
            %start,
            %end,
            "fetching adjusted closes from Yahoo Finance"
        );
        let quotes = self
            .fetch_quotes_batch(symbols, window_start, window_end)
            .await?;

        PriceTable::from_quotes(&quotes, symbols, &self.suffix)
    }
}
