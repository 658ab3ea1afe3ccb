//! Integration tests from analytics report to rendered dashboard.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use vantage_analytics::{SeriesKey, analyze};
use vantage_data::{PriceTable, Ticker};
use vantage_output::{
    DashboardBuilder, ExportFormat, Exporter, IconConfig, IconRef, Rgb, summary_cards,
};

fn ticker(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

fn table() -> PriceTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates = (0..4).map(|i| start + chrono::Duration::days(i)).collect();
    PriceTable::new(
        dates,
        vec![
            (ticker("UP"), vec![10.0, 11.0, 12.0, 13.0]),
            (ticker("DOWN"), vec![20.0, 19.0, 18.5, 16.0]),
            (ticker("FLAT"), vec![5.0, 5.0, 5.0, 5.0]),
            (Ticker::benchmark(), vec![100.0, 101.0, 100.5, 102.0]),
        ],
    )
    .unwrap()
}

#[test]
fn test_full_dashboard_workflow() {
    let assets = [ticker("UP"), ticker("DOWN"), ticker("FLAT")];
    let report = analyze(&table(), &assets).unwrap();
    let dashboard = DashboardBuilder::new().title("Carteira").build(&report);

    // assets, benchmark, portfolio
    assert_eq!(dashboard.cards.len(), 5);
    let ids: Vec<&str> = dashboard.cards.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(ids, vec!["UP", "DOWN", "FLAT", "BRAX11", "Portfolio"]);

    let up = &dashboard.cards[0];
    assert_eq!(up.return_label, "30%");
    assert_relative_eq!(up.total_return, 0.3, epsilon = 1e-12);

    let down = &dashboard.cards[1];
    assert_eq!(down.return_label, "-20%");

    // Every performance line starts at 100
    for series in &dashboard.performance.series {
        assert_eq!(series.values[0], 100.0);
        assert_eq!(series.values.len(), 4);
    }

    let ascii = dashboard.to_ascii_table();
    assert!(ascii.contains("Carteira"));
    assert!(ascii.contains("BRAX11"));
}

#[test]
fn test_scatter_colors_follow_ratio() {
    let assets = [ticker("UP"), ticker("DOWN"), ticker("FLAT")];
    let report = analyze(&table(), &assets).unwrap();
    let dashboard = DashboardBuilder::new().build(&report);
    let chart = &dashboard.risk_return;

    assert_eq!(chart.x_title, "Volatilidade (Anualizada)");
    assert_eq!(chart.y_title, "Retorno Total");
    assert_eq!(chart.color_title, "Sharpe");

    // Flat series: zero volatility, NaN ratio, no color
    let flat = chart.point("FLAT").unwrap();
    assert_eq!(flat.volatility, 0.0);
    assert!(flat.ratio.is_nan());
    assert_eq!(flat.color, None);

    // Lowest finite ratio is red, highest is blue
    let finite: Vec<_> = chart.points.iter().filter(|p| p.ratio.is_finite()).collect();
    let lowest = finite
        .iter()
        .min_by(|a, b| a.ratio.total_cmp(&b.ratio))
        .unwrap();
    let highest = finite
        .iter()
        .max_by(|a, b| a.ratio.total_cmp(&b.ratio))
        .unwrap();
    assert_eq!(lowest.label, "DOWN");
    assert_eq!(lowest.color, Some(Rgb::new(255, 0, 0)));
    assert_eq!(highest.color, Some(Rgb::new(0, 0, 255)));
}

#[test]
fn test_custom_icons() {
    let report = analyze(&table(), &[ticker("UP")]).unwrap();
    let icons = IconConfig {
        base_url: "https://cdn.example.com/logos/".to_string(),
        portfolio_icon: "assets/wallet.svg".to_string(),
    };

    let cards = summary_cards(&report, &icons);
    let up = cards.iter().find(|c| c.identifier == "UP").unwrap();
    assert_eq!(
        up.icon,
        IconRef::Remote("https://cdn.example.com/logos/UP.png".to_string())
    );
    let portfolio = cards.iter().find(|c| c.identifier == "Portfolio").unwrap();
    assert_eq!(portfolio.icon, IconRef::Local("assets/wallet.svg".to_string()));
}

#[test]
fn test_exports_cover_every_series() {
    let assets = [ticker("UP"), ticker("DOWN")];
    let report = analyze(&table(), &assets).unwrap();
    let dashboard = DashboardBuilder::new().build(&report);

    let performance = dashboard
        .performance
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    let header = performance.lines().next().unwrap();
    // FLAT is fetched but not selected, so it stays as a context column
    assert!(header.starts_with("date,UP,DOWN"));
    assert!(header.ends_with(",Portfolio"));
    assert_eq!(performance.lines().count(), 5);

    let scatter = dashboard
        .risk_return
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert_eq!(scatter.lines().count(), report.keys().len() + 1);

    assert!(report.position(&SeriesKey::Portfolio).is_some());
}
