//! Asset identifiers.

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DataError, Result};

/// Benchmark index every selection is compared against (iShares BOVA IBrX-100 ETF).
pub const BENCHMARK: &str = "BRAX11";

/// Suffix Yahoo Finance appends to B3 listings.
pub const B3_SUFFIX: &str = ".SA";

const MAX_LEN: usize = 16;

/// A validated, upper-case ticker symbol without any provider suffix.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse a ticker, trimming whitespace and upper-casing it.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidSymbol`] for empty, overlong or
    /// non-symbol input.
    ///
    /// # Examples
    ///
    /// ```
    /// use vantage_data::Ticker;
    ///
    /// let ticker = Ticker::parse(" petr4 ").unwrap();
    /// assert_eq!(ticker.as_str(), "PETR4");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        if symbol.len() > MAX_LEN {
            return Err(DataError::InvalidSymbol(format!(
                "{symbol} is longer than {MAX_LEN} characters"
            )));
        }
        if !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        {
            return Err(DataError::InvalidSymbol(symbol));
        }

        Ok(Self(symbol))
    }

    /// Parse a provider symbol, removing `suffix` when present.
    ///
    /// Only an exact trailing match is removed, so `"SANB11.SA"` becomes
    /// `"SANB11"` while `"ASAS"` stays intact.
    pub fn from_provider_symbol(raw: &str, suffix: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let bare = if suffix.is_empty() {
            trimmed
        } else {
            trimmed
                .strip_suffix(suffix)
                .or_else(|| trimmed.strip_suffix(suffix.to_lowercase().as_str()))
                .unwrap_or(trimmed)
        };
        Self::parse(bare)
    }

    /// The benchmark ticker.
    pub fn benchmark() -> Self {
        Self(BENCHMARK.to_string())
    }

    /// Whether this is the benchmark ticker.
    pub fn is_benchmark(&self) -> bool {
        self.0 == BENCHMARK
    }

    /// Symbol as sent to the provider.
    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }

    /// The bare symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PETR4", "PETR4")]
    #[case("  vale3 ", "VALE3")]
    #[case("^BVSP", "^BVSP")]
    #[case("BRL=X", "BRL=X")]
    fn test_parse_valid(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Ticker::parse(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("PETR 4")]
    #[case("ABC/DEF")]
    #[case("AVERYLONGTICKERSYMBOL")]
    fn test_parse_invalid(#[case] raw: &str) {
        assert!(matches!(
            Ticker::parse(raw),
            Err(DataError::InvalidSymbol(_))
        ));
    }

    #[rstest]
    #[case("BRAX11.SA", "BRAX11")]
    #[case("SANB11.SA", "SANB11")]
    #[case("itub4.sa", "ITUB4")]
    #[case("ASAS", "ASAS")]
    #[case("AAPL", "AAPL")]
    fn test_from_provider_symbol(#[case] raw: &str, #[case] expected: &str) {
        let ticker = Ticker::from_provider_symbol(raw, B3_SUFFIX).unwrap();
        assert_eq!(ticker.as_str(), expected);
    }

    #[test]
    fn test_suffix_round_trip() {
        let ticker = Ticker::parse("WEGE3").unwrap();
        let provider = ticker.with_suffix(B3_SUFFIX);
        assert_eq!(provider, "WEGE3.SA");
        assert_eq!(
            Ticker::from_provider_symbol(&provider, B3_SUFFIX).unwrap(),
            ticker
        );
    }

    #[test]
    fn test_benchmark() {
        assert!(Ticker::benchmark().is_benchmark());
        assert!(!Ticker::parse("PETR4").unwrap().is_benchmark());
        assert_eq!(Ticker::benchmark().to_string(), BENCHMARK);
    }

    #[test]
    fn test_try_from_string_validates() {
        assert_eq!(
            Ticker::try_from("abev3".to_string()).unwrap().as_str(),
            "ABEV3"
        );
        assert!(Ticker::try_from(String::new()).is_err());
    }
}
