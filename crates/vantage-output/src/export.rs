//! Export functionality for dashboard data.
//!
//! CSV and JSON export of the normalized performance table, the
//! risk/return points and the summary cards.

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::cards::SummaryCard;
use crate::chart::{PerformanceChart, RiskReturnChart};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

impl Exporter for PerformanceChart {
    /// CSV is wide: a `date` column then one column per series.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = vec!["date".to_string()];
                header.extend(self.series.iter().map(|s| s.label.clone()));
                wtr.write_record(&header)?;

                for (i, date) in self.dates.iter().enumerate() {
                    let mut record = vec![date.to_string()];
                    record.extend(self.series.iter().map(|s| s.values[i].to_string()));
                    wtr.write_record(&record)?;
                }
                finish_csv(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => json(self, format),
        }
    }
}

/// Flattened scatter point for CSV export.
#[derive(Debug, Serialize)]
struct RiskReturnRecord<'a> {
    identifier: &'a str,
    volatility: f64,
    total_return: f64,
    ratio: f64,
    color: String,
}

impl Exporter for RiskReturnChart {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for point in &self.points {
                    wtr.serialize(RiskReturnRecord {
                        identifier: &point.label,
                        volatility: point.volatility,
                        total_return: point.total_return,
                        ratio: point.ratio,
                        color: point.color.map(|c| c.to_string()).unwrap_or_default(),
                    })?;
                }
                finish_csv(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => json(self, format),
        }
    }
}

/// Flattened summary card for CSV export.
#[derive(Debug, Serialize)]
struct CardRecord<'a> {
    identifier: &'a str,
    icon: &'a str,
    total_return: f64,
    volatility: f64,
    return_label: &'a str,
    volatility_label: &'a str,
}

impl Exporter for [SummaryCard] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for card in self {
                    wtr.serialize(CardRecord {
                        identifier: &card.identifier,
                        icon: card.icon.location(),
                        total_return: card.total_return,
                        volatility: card.volatility,
                        return_label: &card.return_label,
                        volatility_label: &card.volatility_label,
                    })?;
                }
                finish_csv(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => json(self, format),
        }
    }
}
