//! Error types for analytics.

use thiserror::Error;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while computing portfolio analytics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No assets to weight
    #[error("Cannot build a portfolio from an empty selection")]
    EmptySelection,

    /// Asset listed twice
    #[error("Asset {0} is selected more than once")]
    DuplicateAsset(String),

    /// Asset missing from the price table
    #[error("Asset {0} is not a column of the price table")]
    UnknownAsset(String),

    /// Array shape mismatch
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Data layer error
    #[error(transparent)]
    Data(#[from] vantage_data::DataError),
}
