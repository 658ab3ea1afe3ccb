//! Universe management for Vantage.
//!
//! This module provides the set of companies a user can pick from,
//! currently the equities listed on B3.

pub mod b3;

pub use b3::{B3Universe, Listing};

use vantage_data::Ticker;

/// Trait for stock universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<Ticker>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &Ticker) -> bool {
        self.symbols().contains(symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Universe for B3Universe {
    fn symbols(&self) -> Vec<Ticker> {
        self.listings().iter().map(|l| l.ticker.clone()).collect()
    }

    fn contains(&self, symbol: &Ticker) -> bool {
        self.get(symbol).is_some()
    }

    fn size(&self) -> usize {
        self.listings().len()
    }
}
