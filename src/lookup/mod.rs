//! IP to country resolution
//!
//! The driver only sees the [`CountryLookup`] trait. Per-address failures
//! come back as [`LookupError`] values and never abort a batch.

pub mod geoip;

use thiserror::Error;

pub use geoip::{parse_addr, GeoIpService};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("'{0}' is not a valid IP address")]
    InvalidAddress(String),
    #[error("no country found for {0}")]
    NotFound(String),
    #[error("database error for {ip}: {reason}")]
    Database { ip: String, reason: String },
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Resolves an IP address string to a country name
pub trait CountryLookup {
    fn country(&self, ip: &str) -> LookupResult<String>;
}

impl<L: CountryLookup + ?Sized> CountryLookup for &L {
    fn country(&self, ip: &str) -> LookupResult<String> {
        (**self).country(ip)
    }
}
