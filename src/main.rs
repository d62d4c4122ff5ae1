use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geotally::clock::SystemClock;
use geotally::config::{Config, ConfigOverrides};
use geotally::display::ConsoleDisplay;
use geotally::driver::{load_entries, report_empty_input};
use geotally::{BatchDriver, GeoIpService};

#[derive(Parser, Debug)]
#[command(name = "geotally")]
#[command(version)]
#[command(about = "Tally a list of IP addresses by country with a live console summary", long_about = None)]
struct Cli {
    /// File with one IP address per line
    input: PathBuf,

    /// Path to the MaxMind country or city .mmdb database
    #[arg(long)]
    db: Option<PathBuf>,

    /// Minimum milliseconds between live summary redraws
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Number of countries listed individually
    #[arg(long)]
    top: Option<usize>,

    /// Display width of the country column
    #[arg(long)]
    width: Option<usize>,

    /// Log level used when RUST_LOG is unset (debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            db_path: self.db.clone(),
            refresh_ms: self.refresh_ms,
            top_n: self.top,
            name_width: self.width,
            log_level: self.log_level.clone(),
        }
    }
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let cli = parse_cli();

    let config = Config::from_env(&cli.overrides())?;

    // Logs go to stderr so they stay out of the redrawn display
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input = load_entries(&cli.input)?;
    let mut display = ConsoleDisplay::new();

    if input.is_empty() {
        report_empty_input(&mut display, &input)?;
        info!("No entries processed from {}", input.path().display());
        return Ok(());
    }

    let geoip = GeoIpService::open(&config.database.path)?;
    info!("Using GeoIP database: {}", config.database.path.display());

    let mut driver = BatchDriver::new(geoip, display, SystemClock, config.driver_settings());
    let report = driver.run(&input)?;

    info!(
        "Done: {}/{} entries attributed to {} countries",
        report.resolved,
        report.entries,
        report.tally.len()
    );

    Ok(())
}
