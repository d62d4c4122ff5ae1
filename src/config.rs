use anyhow::{bail, Context};
use std::path::PathBuf;
use std::time::Duration;

use crate::driver::{DriverSettings, DEFAULT_REFRESH_INTERVAL};
use crate::render::summary::{SummaryLayout, DEFAULT_NAME_WIDTH, DEFAULT_TOP_N, MIN_NAME_WIDTH};

/// Default MMDB file, looked up in the working directory
pub const DEFAULT_DB_PATH: &str = "GeoLite2-Country.mmdb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Minimum time between live summary redraws
    pub refresh_interval: Duration,
    pub top_n: usize,
    pub name_width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    pub level: String,
}

/// Values that take precedence over the environment, e.g. from CLI flags
///
/// An overridden variable is never read, so a malformed value in the
/// environment cannot fail the load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub refresh_ms: Option<u64>,
    pub top_n: Option<usize>,
    pub name_width: Option<usize>,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from(DEFAULT_DB_PATH),
            },
            display: DisplayConfig {
                refresh_interval: DEFAULT_REFRESH_INTERVAL,
                top_n: DEFAULT_TOP_N,
                name_width: DEFAULT_NAME_WIDTH,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from the process environment, after reading an optional `.env`
    pub fn from_env(overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(var: F, overrides: &ConfigOverrides) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let db_path = match overrides.db_path {
            Some(ref path) => path.clone(),
            None => var("GEOTALLY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database.path),
        };

        let refresh_ms = match overrides.refresh_ms {
            Some(ms) => Some(ms),
            None => parse_var(&var, "GEOTALLY_REFRESH_MS")?,
        };
        let refresh_interval = refresh_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.display.refresh_interval);

        let top_n = match overrides.top_n {
            Some(n) => n,
            None => parse_var(&var, "GEOTALLY_TOP_N")?.unwrap_or(defaults.display.top_n),
        };

        let name_width = match overrides.name_width {
            Some(width) => width,
            None => {
                parse_var(&var, "GEOTALLY_NAME_WIDTH")?.unwrap_or(defaults.display.name_width)
            }
        };

        let level = match overrides.log_level {
            Some(ref level) => level.clone(),
            None => var("GEOTALLY_LOG_LEVEL").unwrap_or(defaults.logging.level),
        };

        let config = Config {
            database: DatabaseConfig { path: db_path },
            display: DisplayConfig {
                refresh_interval,
                top_n,
                name_width,
            },
            logging: LoggingConfig { level },
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.display.top_n == 0 {
            bail!("top-N must be at least 1");
        }
        if self.display.name_width < MIN_NAME_WIDTH {
            bail!(
                "name width must be at least {MIN_NAME_WIDTH}, got {}",
                self.display.name_width
            );
        }
        Ok(())
    }

    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            refresh_interval: self.display.refresh_interval,
            layout: SummaryLayout {
                top_n: self.display.top_n,
                name_width: self.display.name_width,
            },
        }
    }
}

fn parse_var<F, T>(var: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))
        })
        .transpose()
}
