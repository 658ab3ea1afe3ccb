#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vantage/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod selection;
pub mod session;
pub mod universe;

// Re-export main types from sub-crates
pub use vantage_analytics as analytics;
pub use vantage_data as data;
pub use vantage_output as output;

pub use error::{Result, SelectionError, SessionError};
pub use selection::{Selection, collect};
pub use session::Session;
pub use universe::{B3Universe, Listing, Universe};

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
