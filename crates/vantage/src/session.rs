//! One dashboard query from selection to rendered output.

use tracing::info;
use vantage_analytics::{AnalyticsReport, analyze};
use vantage_data::{PriceSource, PriceTable};
use vantage_output::{Dashboard, DashboardBuilder};

use crate::error::Result;
use crate::selection::{Selection, collect};

/// Context for a single query.
///
/// A session owns its selection, the fetched table and the computed report;
/// nothing is shared between sessions. Both the table and the report are
/// `None` when the selection was empty.
#[derive(Debug, Clone)]
pub struct Session {
    selection: Selection,
    table: Option<PriceTable>,
    report: Option<AnalyticsReport>,
}

impl Session {
    /// Collect prices for `selection` and run the analytics on them.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or the analytics fail.
    pub async fn start<S>(source: &S, selection: Selection) -> Result<Self>
    where
        S: PriceSource + Sync,
    {
        let table = collect(source, &selection).await?;
        let report = table
            .as_ref()
            .map(|t| analyze(t, selection.assets()))
            .transpose()?;

        if let Some(report) = &report {
            info!(
                series = report.keys().len(),
                rows = report.dates().len(),
                "Analytics complete"
            );
        }

        Ok(Self {
            selection,
            table,
            report,
        })
    }

    /// The validated selection.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Fetched prices.
    pub const fn table(&self) -> Option<&PriceTable> {
        self.table.as_ref()
    }

    /// Computed analytics.
    pub const fn report(&self) -> Option<&AnalyticsReport> {
        self.report.as_ref()
    }

    /// Build the dashboard, or `None` for an empty selection.
    pub fn dashboard(&self, builder: DashboardBuilder) -> Option<Dashboard> {
        self.report.as_ref().map(|report| builder.build(report))
    }
}
