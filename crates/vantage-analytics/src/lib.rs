#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vantage/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod metrics;
pub mod transform;
pub mod weights;

pub use engine::{AnalyticsReport, PORTFOLIO_LABEL, RiskReturn, SeriesKey, analyze};
pub use error::{AnalyticsError, Result};
pub use metrics::{TRADING_DAYS_PER_YEAR, annualized_volatility, sharpe_like, total_return};
pub use transform::{normalize, pct_change, weighted_series};
pub use weights::equal_weights;
