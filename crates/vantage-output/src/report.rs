//! Dashboard assembly and text rendering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vantage_analytics::AnalyticsReport;

use crate::cards::{IconConfig, SummaryCard, summary_cards};
use crate::chart::{ColorScale, PerformanceChart, RiskReturnChart};

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything one rendering pass shows: cards, the performance chart and
/// the risk/return scatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Page title.
    pub title: String,

    /// First trading date in the window.
    pub period_start: NaiveDate,

    /// Last trading date in the window.
    pub period_end: NaiveDate,

    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// One card per series, `Portfolio` last.
    pub cards: Vec<SummaryCard>,

    /// Normalized prices.
    pub performance: PerformanceChart,

    /// Volatility against total return.
    pub risk_return: RiskReturnChart,
}

impl Dashboard {
    /// Convert to a JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the cards and scatter values as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&format!(
            "Period: {} to {}\n",
            self.period_start, self.period_end
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<14} {:>12} {:>14} {:>10} {:>18}\n",
            "Series", "Return", "Volatility", "Sharpe", "Color"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for (card, point) in self.cards.iter().zip(&self.risk_return.points) {
            output.push_str(&format!(
                "{:<14} {:>12} {:>14} {:>10.2} {:>18}\n",
                card.identifier,
                card.return_label,
                card.volatility_label,
                point.ratio,
                point
                    .color
                    .map_or_else(|| "-".to_string(), |c| c.to_string())
            ));
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');
        output
    }

    /// Render the cards as a Markdown table with icons.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        output.push_str(&format!(
            "**Period:** {} to {}\n\n",
            self.period_start, self.period_end
        ));
        output.push_str("| | Series | Return | Volatility |\n");
        output.push_str("|---|--------|-------:|-----------:|\n");
        for card in &self.cards {
            output.push_str(&format!(
                "| ![{id}]({icon}) | {id} | {ret} | {vol} |\n",
                id = card.identifier,
                icon = card.icon,
                ret = card.return_label,
                vol = card.volatility_label
            ));
        }
        output
    }
}

/// Builder for creating dashboards.
#[derive(Debug, Default)]
pub struct DashboardBuilder {
    title: Option<String>,
    icons: Option<IconConfig>,
    scale: Option<ColorScale>,
}

impl DashboardBuilder {
    /// Create a new dashboard builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the icon sources.
    pub fn icons(mut self, icons: IconConfig) -> Self {
        self.icons = Some(icons);
        self
    }

    /// Set the scatter color scale.
    pub const fn scale(mut self, scale: ColorScale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Build the dashboard for one analytics report.
    pub fn build(self, report: &AnalyticsReport) -> Dashboard {
        let icons = self.icons.unwrap_or_default();
        let dates = report.dates();

        Dashboard {
            title: self
                .title
                .unwrap_or_else(|| "Python para Investidores".to_string()),
            period_start: dates[0],
            period_end: dates[dates.len() - 1],
            generated_at: Utc::now(),
            cards: summary_cards(report, &icons),
            performance: PerformanceChart::from_report(report),
            risk_return: RiskReturnChart::from_report(report, self.scale.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vantage_analytics::analyze;
    use vantage_data::{PriceTable, Ticker};

    fn dashboard() -> Dashboard {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = (0..3).map(|i| start + chrono::Duration::days(i)).collect();
        let petr = Ticker::parse("PETR4").unwrap();
        let table = PriceTable::new(
            dates,
            vec![
                (petr.clone(), vec![30.0, 33.0, 36.0]),
                (Ticker::benchmark(), vec![100.0, 99.0, 101.0]),
            ],
        )
        .unwrap();
        let report = analyze(&table, &[petr]).unwrap();
        DashboardBuilder::new().build(&report)
    }

    #[test]
    fn test_builder_defaults() {
        let dashboard = dashboard();

        assert_eq!(dashboard.title, "Python para Investidores");
        assert_eq!(dashboard.period_start.to_string(), "2024-03-01");
        assert_eq!(dashboard.period_end.to_string(), "2024-03-03");
        assert_eq!(dashboard.cards.len(), 3);
        assert_eq!(dashboard.cards[2].identifier, "Portfolio");
        assert_eq!(dashboard.risk_return.points.len(), 3);
    }

    #[test]
    fn test_ascii_table() {
        let table = dashboard().to_ascii_table();

        assert!(table.contains("Period: 2024-03-01 to 2024-03-03"));
        assert!(table.contains("Series"));
        assert!(table.contains("PETR4"));
        assert!(table.contains("20%"));
        assert!(table.contains("Portfolio"));
    }

    #[test]
    fn test_markdown_has_icons() {
        let md = dashboard().to_markdown();

        assert!(md.starts_with("# Python para Investidores"));
        assert!(md.contains("![PETR4](https://raw.githubusercontent.com/thefintz/icones-b3/main/icones/PETR4.png)"));
        assert!(md.contains("![Portfolio](portfolio.png)"));
    }

    #[test]
    fn test_json_roundtrip_fields() {
        let json = dashboard().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["performance"]["title"], "Desempenho Relativo");
        assert_eq!(value["risk_return"]["y_title"], "Retorno Total");
        assert_eq!(value["cards"][0]["identifier"], "PETR4");
    }
}
