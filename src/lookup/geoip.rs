//! Country lookup backed by a MaxMind GeoLite2/GeoIP2 MMDB
//!
//! Works with both Country and City databases: the City database is a
//! superset of Country data, so decoding `geoip2::Country` succeeds on either.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::path::Path;

use super::{CountryLookup, LookupError, LookupResult};

pub struct GeoIpService {
    reader: Reader<Mmap>,
}

impl GeoIpService {
    /// Memory-map the database at `path`
    ///
    /// The file is held open for the lifetime of the service.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = unsafe { Reader::open_mmap(path) }
            .with_context(|| format!("Failed to open GeoIP database at {}", path.display()))?;

        Ok(Self { reader })
    }

    /// Lookup the country for an already parsed address
    pub fn lookup(&self, ip: IpAddr) -> LookupResult<String> {
        let result = self.reader.lookup(ip).map_err(|e| database_error(ip, e))?;
        let record = result
            .decode::<geoip2::Country>()
            .map_err(|e| database_error(ip, e))?
            .ok_or_else(|| LookupError::NotFound(ip.to_string()))?;

        // Prefer the English name, fall back to the ISO code
        record
            .country
            .names
            .english
            .or(record.country.iso_code)
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .ok_or_else(|| LookupError::NotFound(ip.to_string()))
    }
}

fn database_error(ip: IpAddr, err: impl std::fmt::Display) -> LookupError {
    LookupError::Database {
        ip: ip.to_string(),
        reason: err.to_string(),
    }
}

/// Parse an IPv4 or IPv6 address string
pub fn parse_addr(ip: &str) -> LookupResult<IpAddr> {
    ip.parse()
        .map_err(|_| LookupError::InvalidAddress(ip.to_string()))
}

impl CountryLookup for GeoIpService {
    fn country(&self, ip: &str) -> LookupResult<String> {
        self.lookup(parse_addr(ip)?)
    }
}
