//! Error types for selections and sessions.

use chrono::NaiveDate;
use thiserror::Error;
use vantage_analytics::AnalyticsError;
use vantage_data::DataError;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Input rejected before any fetch happens.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Malformed ticker
    #[error("Invalid ticker: {0}")]
    InvalidTicker(#[source] DataError),

    /// Window ends before it starts
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },

    /// The benchmark was picked as an asset
    #[error("{0} is the benchmark and cannot be selected as an asset")]
    BenchmarkSelected(String),
}

/// Errors that abort a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid selection
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Fetch or table construction failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Analytics failed
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
