//! Vantage CLI binary.
//!
//! Provides a command-line interface for the portfolio risk/return dashboard.

mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use config::VantageConfig;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vantage::data::yahoo::YahooQuoteProvider;
use vantage::data::{CsvPriceSource, PriceSource};
use vantage::output::{Dashboard, DashboardBuilder, ExportFormat, Exporter};
use vantage::{B3Universe, Selection, Session, Universe};

#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "Vantage: equal-weight portfolio risk/return dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config dir>/vantage/vantage.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard for a set of tickers against BRAX11
    Analyze {
        /// Tickers without the exchange suffix (e.g. PETR4 VALE3)
        tickers: Vec<String>,

        /// First date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// End date, exclusive (YYYY-MM-DD or DD/MM/YYYY), defaults to today
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write CSV and JSON exports into this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Also print the normalized price table
        #[arg(long)]
        table: bool,

        /// Read prices from a wide CSV instead of Yahoo Finance
        #[arg(long)]
        prices_csv: Option<PathBuf>,
    },

    /// List the selectable B3 companies
    Universe {
        /// Filter by ticker or company name
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD or DD/MM/YYYY"))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = VantageConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log_filter.as_deref());

    match cli.command {
        Commands::Analyze {
            tickers,
            from,
            to,
            format,
            export,
            table,
            prices_csv,
        } => {
            let start = from.unwrap_or(config.default_start);
            let end = to.unwrap_or_else(|| Utc::now().date_naive());
            let selection = Selection::new(&tickers, start, end)?;

            let universe = load_universe(&config)?;
            for unknown in selection.unknown_in(&universe) {
                warn!(ticker = %unknown, "Ticker is not in the B3 universe");
            }

            let options = AnalyzeOptions {
                format,
                export,
                table,
            };
            match prices_csv {
                Some(path) => {
                    let source = CsvPriceSource::from_path(&path)?;
                    analyze(&source, selection, &config, &options).await?;
                }
                None => {
                    let source = YahooQuoteProvider::with_rate_limit(config.request_delay())?;
                    analyze(&source, selection, &config, &options).await?;
                }
            }
        }
        Commands::Universe { search } => {
            let universe = load_universe(&config)?;
            list_universe(&universe, search.as_deref());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over everything else.
fn init_tracing(verbose: bool, configured: Option<&str>) {
    let fallback = if verbose {
        "vantage=debug"
    } else {
        configured.unwrap_or("vantage=info")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_universe(config: &VantageConfig) -> Result<B3Universe, Box<dyn std::error::Error>> {
    Ok(match &config.universe_csv {
        Some(path) => B3Universe::from_path(path)?,
        None => B3Universe::new(),
    })
}

struct AnalyzeOptions {
    format: OutputFormat,
    export: Option<PathBuf>,
    table: bool,
}

async fn analyze<S>(
    source: &S,
    selection: Selection,
    config: &VantageConfig,
    options: &AnalyzeOptions,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: PriceSource + Sync,
{
    if selection.is_empty() {
        println!("No tickers selected. Pass one or more B3 tickers, e.g. `vantage analyze PETR4 VALE3`.");
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Fetching {} tickers + BRAX11 ({} to {})...",
        selection.assets().len(),
        selection.start(),
        selection.end()
    ));

    let session = match Session::start(source, selection).await {
        Ok(session) => {
            pb.finish_and_clear();
            session
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let Some(dashboard) = session.dashboard(DashboardBuilder::new().icons(config.icons())) else {
        return Ok(());
    };

    match options.format {
        OutputFormat::Text => println!("{}", dashboard.to_ascii_table()),
        OutputFormat::Markdown => println!("{}", dashboard.to_markdown()),
        OutputFormat::Json => println!("{}", dashboard.to_json()?),
    }

    if options.table {
        if let Some(report) = session.report() {
            println!("\nNormalized prices (base 100):");
            println!("{}", report.normalized_frame()?);
        }
    }

    if let Some(dir) = &options.export {
        export_dashboard(&dashboard, dir)?;
    }

    Ok(())
}

fn export_dashboard(dashboard: &Dashboard, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let performance = dir.join("performance.csv");
    dashboard
        .performance
        .export_to_file(&performance, ExportFormat::Csv)?;

    let risk_return = dir.join("risk_return.csv");
    dashboard
        .risk_return
        .export_to_file(&risk_return, ExportFormat::Csv)?;

    let cards = dir.join("cards.csv");
    dashboard
        .cards
        .as_slice()
        .export_to_file(&cards, ExportFormat::Csv)?;

    let json_path = dir.join("dashboard.json");
    fs::write(&json_path, dashboard.to_json()?)?;

    info!(dir = %dir.display(), "Exported dashboard");
    println!("Exported to {}", dir.display());
    Ok(())
}

fn list_universe(universe: &B3Universe, search: Option<&str>) {
    let listings = match search {
        Some(query) => universe.search(query),
        None => universe.listings().iter().collect(),
    };

    println!("B3 Universe ({} of {} companies):", listings.len(), universe.size());
    println!("{}\n", "=".repeat(40));

    for listing in listings {
        println!("{:<8} {}", listing.ticker, listing.name);
    }
}
