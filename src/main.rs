use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ratio_dashboard::api::RatioClient;
use ratio_dashboard::directory::{all_companies, describe_ticker};
use ratio_dashboard::models::{Config, RatioKind};
use ratio_dashboard::search::{filter_companies, MAX_DISPLAYED_RESULTS};
use ratio_dashboard::ui::app::run_app;
use ratio_dashboard::ui::components::statistics_lines;
use ratio_dashboard::ui::menu::resolve_ratio;

/// Terminal dashboard for financial ratios served by the ratio service
#[derive(Parser)]
#[command(name = "ratio-dashboard")]
#[command(version)]
#[command(about = "Search US public companies and chart their financial ratios")]
#[command(long_about = "
Interactive terminal dashboard backed by a local ratio service. Pick a company from the
search bar, then choose a metric from the menu to chart its history and statistics.

The ratio service address comes from RATIO_API_BASE_URL (or a .env file) and defaults to
http://127.0.0.1:5000.

Examples:
  ratio-dashboard                                  # interactive dashboard
  ratio-dashboard search apple                     # list matching companies
  ratio-dashboard ratio AAPL current-ratio --json  # print one series as JSON
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Base URL of the ratio service
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (client default when unset)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Tracing filter, e.g. `debug` or `ratio_dashboard=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive dashboard (default)
    Tui,
    /// List companies whose name or ticker contains the query
    Search { query: String },
    /// Ask the ratio service to prepare data for a ticker
    CompanyInfo { ticker: String },
    /// Fetch one ratio series for a ticker
    Ratio {
        ticker: String,
        /// Endpoint slug, menu label or name, e.g. `current-ratio`
        ratio: String,
        /// Print the raw response envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available ratios and their endpoints
    Ratios,
}

fn init_logging(cli: &Cli, tui: bool) -> Result<()> {
    // The dashboard owns the terminal, so only errors go to stderr unless asked otherwise
    let default_filter = if tui && cli.log_file.is_none() { "ratio_dashboard=error" } else { "ratio_dashboard=info" };
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
    };

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| anyhow!("Cannot open log file {}: {}", path.display(), e))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.api_base_url = base_url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Some(Duration::from_secs(secs));
    }
    config.validate()?;
    Ok(config)
}

fn print_search(query: &str) {
    let matches = filter_companies(all_companies(), query);
    if matches.is_empty() {
        println!("No companies found matching \"{}\"", query);
        return;
    }
    for company in matches.iter().take(MAX_DISPLAYED_RESULTS) {
        println!("{:<8} {}", company.ticker, company.name);
    }
    if matches.len() > MAX_DISPLAYED_RESULTS {
        println!("... and {} more", matches.len() - MAX_DISPLAYED_RESULTS);
    }
}

fn print_ratios() {
    for kind in RatioKind::ALL {
        println!("{:<24} {:<26} /{}/<ticker>", kind.slug(), kind.label(), kind.endpoint());
    }
}

async fn print_company_info(config: &Config, ticker: &str) -> Result<()> {
    let client = RatioClient::new(config)?;
    let info = client.fetch_company_info(ticker).await?;
    println!(
        "{}",
        info.message.unwrap_or_else(|| format!("Company data ready for {}", describe_ticker(ticker)))
    );
    Ok(())
}

async fn print_ratio(config: &Config, ticker: &str, kind: RatioKind, json: bool) -> Result<()> {
    let client = RatioClient::new(config)?;
    let result = client.fetch_ratio(kind, ticker).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let Some(data) = result.success_data() else {
        return Err(anyhow!(
            "{}",
            result.message.clone().unwrap_or_else(|| format!("Failed to load {} data.", kind.label()))
        ));
    };

    println!("{} for {}", kind.label(), describe_ticker(ticker));
    if data.graph_data.is_empty() {
        println!("No {} data available.", kind.label());
    }
    for point in &data.graph_data {
        println!("  {:<12} {}", point.date, point.value);
    }
    for line in statistics_lines(kind, &data.statistics) {
        println!("{}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Command::Tui);
    init_logging(&cli, matches!(command, Command::Tui))?;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    match command {
        Command::Tui => {
            info!("Starting dashboard against {}", config.api_base_url);
            if let Err(e) = run_app(&config).await {
                eprintln!("TUI Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Search { query } => print_search(&query),
        Command::Ratios => print_ratios(),
        Command::CompanyInfo { ticker } => print_company_info(&config, &ticker).await?,
        Command::Ratio { ticker, ratio, json } => print_ratio(&config, &ticker, resolve_ratio(&ratio)?, json).await?,
    }

    Ok(())
}
