#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vantage/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod csv_file;
pub mod error;
pub mod source;
pub mod table;
pub mod ticker;
pub mod yahoo;

pub use csv_file::CsvPriceSource;
pub use error::{DataError, Result};
pub use source::PriceSource;
pub use table::PriceTable;
pub use ticker::{B3_SUFFIX, BENCHMARK, Ticker};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
