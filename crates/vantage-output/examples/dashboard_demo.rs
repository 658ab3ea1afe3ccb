//! Build a dashboard from an in-memory price table and print every rendering.

use chrono::NaiveDate;
use vantage_analytics::analyze;
use vantage_data::{PriceTable, Ticker};
use vantage_output::{DashboardBuilder, ExportFormat, Exporter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Vantage Dashboard Demo ===\n");

    let start = NaiveDate::from_ymd_opt(2024, 1, 2).ok_or("invalid date")?;
    let dates = (0..5).map(|i| start + chrono::Duration::days(i)).collect();

    let petr = Ticker::parse("PETR4")?;
    let vale = Ticker::parse("VALE3")?;
    let table = PriceTable::new(
        dates,
        vec![
            (petr.clone(), vec![36.1, 36.8, 37.2, 36.5, 38.0]),
            (vale.clone(), vec![77.4, 76.0, 75.2, 76.9, 74.8]),
            (Ticker::benchmark(), vec![105.0, 105.6, 104.9, 106.2, 106.8]),
        ],
    )?;

    let report = analyze(&table, &[petr, vale])?;
    let dashboard = DashboardBuilder::new().build(&report);

    println!("{}", dashboard.to_ascii_table());
    println!("{}", dashboard.to_markdown());

    println!("Performance CSV:");
    println!(
        "{}",
        dashboard.performance.export_to_string(ExportFormat::Csv)?
    );

    println!("Risk/Return CSV:");
    println!(
        "{}",
        dashboard.risk_return.export_to_string(ExportFormat::Csv)?
    );

    println!("Cards JSON:");
    println!(
        "{}",
        dashboard.cards.export_to_string(ExportFormat::PrettyJson)?
    );

    Ok(())
}
