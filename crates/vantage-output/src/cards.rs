//! Per-series summary cards.

use serde::{Deserialize, Serialize};
use std::fmt;
use vantage_analytics::{AnalyticsReport, RiskReturn, SeriesKey};

/// Public repository of B3 company logos, one PNG per ticker.
pub const DEFAULT_ICON_BASE_URL: &str =
    "https://raw.githubusercontent.com/thefintz/icones-b3/main/icones";

/// Local image shown on the portfolio card.
pub const DEFAULT_PORTFOLIO_ICON: &str = "portfolio.png";

/// Where card icons come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    /// Base URL; the icon for `TICKER` is `{base_url}/{TICKER}.png`.
    pub base_url: String,
    /// Icon path for the portfolio card.
    pub portfolio_icon: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ICON_BASE_URL.to_string(),
            portfolio_icon: DEFAULT_PORTFOLIO_ICON.to_string(),
        }
    }
}

impl IconConfig {
    /// Icon for a series.
    pub fn icon_for(&self, key: &SeriesKey) -> IconRef {
        match key.ticker() {
            Some(ticker) => IconRef::Remote(format!(
                "{}/{}.png",
                self.base_url.trim_end_matches('/'),
                ticker
            )),
            None => IconRef::Local(self.portfolio_icon.clone()),
        }
    }
}

/// Reference to a card image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "location", rename_all = "snake_case")]
pub enum IconRef {
    /// Image served over HTTP.
    Remote(String),
    /// Image bundled with the front end.
    Local(String),
}

impl IconRef {
    /// URL or path of the image.
    pub fn location(&self) -> &str {
        match self {
            Self::Remote(s) | Self::Local(s) => s,
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location())
    }
}

/// One dashboard card: identifier, icon, return and volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    /// Series label (ticker or `Portfolio`).
    pub identifier: String,
    /// Card image.
    pub icon: IconRef,
    /// Total return as a fraction.
    pub total_return: f64,
    /// Annualized volatility as a fraction.
    pub volatility: f64,
    /// Total return formatted as a whole percentage.
    pub return_label: String,
    /// Volatility formatted as a whole percentage.
    pub volatility_label: String,
}

impl SummaryCard {
    /// Build the card for one series.
    pub fn new(metric: &RiskReturn, icons: &IconConfig) -> Self {
        Self {
            identifier: metric.key.to_string(),
            icon: icons.icon_for(&metric.key),
            total_return: metric.total_return,
            volatility: metric.volatility,
            return_label: format_percent(metric.total_return),
            volatility_label: format_percent(metric.volatility),
        }
    }
}

/// Cards for every series of the report, in column order.
pub fn summary_cards(report: &AnalyticsReport, icons: &IconConfig) -> Vec<SummaryCard> {
    report
        .metrics()
        .iter()
        .map(|m| SummaryCard::new(m, icons))
        .collect()
}

/// Format a fraction as a whole percentage (`0.1234` becomes `"12%"`).
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}
