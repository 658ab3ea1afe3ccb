#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vantage/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cards;
pub mod chart;
pub mod export;
pub mod report;

pub use cards::{
    DEFAULT_ICON_BASE_URL, DEFAULT_PORTFOLIO_ICON, IconConfig, IconRef, SummaryCard,
    format_percent, summary_cards,
};
pub use chart::{
    ChartSeries, ColorScale, PerformanceChart, Rgb, RiskReturnChart, ScatterPoint,
};
pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{Dashboard, DashboardBuilder, ReportError};
