//! Price source abstraction.

use std::future::Future;

use chrono::NaiveDate;

use crate::error::Result;
use crate::table::PriceTable;
use crate::ticker::Ticker;

/// Anything that can produce a [`PriceTable`] of adjusted closes.
///
/// Implementations return one column per requested ticker, keyed by the bare
/// symbol (provider suffixes removed), in the order the tickers were given,
/// with one row per trading date in the half-open window `start..end`. The
/// session dated `end` is excluded, so a window ending today never contains
/// an unfinished bar. A failure for any ticker fails the whole request.
pub trait PriceSource {
    /// Fetch adjusted close prices for `symbols` between `start` and `end`.
    fn fetch_prices(
        &self,
        symbols: &[Ticker],
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<PriceTable>> + Send;
}
