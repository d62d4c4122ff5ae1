pub mod clock;
pub mod config;
pub mod display;
pub mod driver;
pub mod lookup;
pub mod render;
pub mod tally;

pub use driver::{BatchDriver, DriverError, DriverSettings, DriverState, InputList, RunReport};
pub use lookup::{CountryLookup, GeoIpService, LookupError};
pub use tally::{CountryTally, Leaderboard, RankedEntry};
