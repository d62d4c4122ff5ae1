//! Batch driver: load the input list, resolve every entry, draw the display
//!
//! Runs single-threaded, one blocking lookup at a time. The live summary is
//! redrawn on a wall-clock throttle and the final summary is always drawn
//! once processing finishes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::display::DisplaySurface;
use crate::lookup::CountryLookup;
use crate::render::{render_progress, render_summary, SummaryLayout, SummaryPhase};
use crate::tally::CountryTally;

/// Default minimum time between live summary redraws
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("File {} not found.", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("failed to read {}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write to display")]
    Display(#[from] io::Error),
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Trimmed, non-empty lines of an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputList {
    path: PathBuf,
    entries: Vec<String>,
}

impl InputList {
    /// Build from in-memory text, applying the same trimming as a file load
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            path: path.into(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the input file
///
/// A missing file is reported separately from other read failures.
pub fn load_entries(path: impl AsRef<Path>) -> DriverResult<InputList> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DriverError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => DriverError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let input = InputList::from_text(path, &text);
    debug!("Loaded {} entries from {}", input.len(), path.display());
    Ok(input)
}

fn write_banner<D: DisplaySurface>(display: &mut D, input: &InputList) -> io::Result<()> {
    display.write(&format!("Loaded: {}\n\n", input.path().display()))
}

/// Report an input with nothing to process
pub fn report_empty_input<D: DisplaySurface>(display: &mut D, input: &InputList) -> io::Result<()> {
    write_banner(display, input)?;
    display.write("No entries processed.\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Minimum time between live summary redraws
    pub refresh_interval: Duration,
    pub layout: SummaryLayout,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            layout: SummaryLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Loading,
    Processing { index: usize },
    Finalizing,
    Done,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Entries in the input list
    pub entries: usize,
    /// Entries attributed to a country
    pub resolved: usize,
    /// Entries whose lookup failed
    pub failed: usize,
    /// Live summaries drawn while processing, excluding the final one
    pub live_renders: usize,
    pub tally: CountryTally,
}

pub struct BatchDriver<L, D, C = SystemClock> {
    lookup: L,
    display: D,
    clock: C,
    settings: DriverSettings,
    tally: CountryTally,
    state: DriverState,
}

impl<L, D, C> BatchDriver<L, D, C>
where
    L: CountryLookup,
    D: DisplaySurface,
    C: Clock,
{
    pub fn new(lookup: L, display: D, clock: C, settings: DriverSettings) -> Self {
        Self {
            lookup,
            display,
            clock,
            settings,
            tally: CountryTally::new(),
            state: DriverState::Loading,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn tally(&self) -> &CountryTally {
        &self.tally
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Load `path` and process it
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> DriverResult<RunReport> {
        self.transition(DriverState::Loading);
        let input = load_entries(path)?;
        self.run(&input)
    }

    /// Process an already loaded input list
    pub fn run(&mut self, input: &InputList) -> DriverResult<RunReport> {
        self.tally = CountryTally::new();

        if input.is_empty() {
            report_empty_input(&mut self.display, input)?;
            self.transition(DriverState::Done);
            info!("No entries processed from {}", input.path().display());
            return Ok(RunReport {
                entries: 0,
                resolved: 0,
                failed: 0,
                live_renders: 0,
                tally: self.tally.clone(),
            });
        }

        write_banner(&mut self.display, input)?;

        let total = input.len();
        let mut resolved = 0;
        let mut failed = 0;
        let mut live_renders = 0;
        let mut last_render = self.clock.now();

        for (index, ip) in input.entries().iter().enumerate() {
            self.transition(DriverState::Processing { index });

            match self.lookup.country(ip) {
                Ok(country) if !country.is_empty() => {
                    self.tally.increment(&country);
                    resolved += 1;
                }
                Ok(_) => {
                    warn!("Error retrieving country for IP {}: empty country name", ip);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Error retrieving country for IP {}: {}", ip, e);
                    failed += 1;
                }
            }

            if let Some(line) = render_progress(total, index + 1) {
                self.display.write(&format!("\r{line}"))?;
            }

            let now = self.clock.now();
            if now.duration_since(last_render) >= self.settings.refresh_interval {
                last_render = now;
                self.draw_summary(SummaryPhase::Live)?;
                live_renders += 1;
            }
        }

        self.transition(DriverState::Finalizing);
        self.draw_summary(SummaryPhase::Final)?;
        self.transition(DriverState::Done);

        info!(
            "Processed {} entries: {} resolved, {} failed, {} countries",
            total,
            resolved,
            failed,
            self.tally.len()
        );

        Ok(RunReport {
            entries: total,
            resolved,
            failed,
            live_renders,
            tally: self.tally.clone(),
        })
    }

    fn draw_summary(&mut self, phase: SummaryPhase) -> io::Result<()> {
        self.display.clear()?;
        self.display
            .write(&render_summary(&self.tally, phase, &self.settings.layout))
    }

    fn transition(&mut self, next: DriverState) {
        // Per-entry transitions would flood the debug log
        if !matches!(next, DriverState::Processing { index } if index > 0) {
            debug!("Driver state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::display::MemoryDisplay;
    use crate::lookup::{LookupError, LookupResult};

    /// Resolves every address to the part before the first dot
    struct PrefixLookup;

    impl CountryLookup for PrefixLookup {
        fn country(&self, ip: &str) -> LookupResult<String> {
            match ip.split('.').next() {
                Some(prefix) if prefix.parse::<u8>().is_ok() => Ok(format!("Net {prefix}")),
                _ => Err(LookupError::InvalidAddress(ip.to_string())),
            }
        }
    }

    #[test]
    fn test_input_list_trims_and_drops_blank_lines() {
        let input = InputList::from_text("ips.txt", "  1.1.1.1 \n\n\t\n8.8.8.8\r\n   \n");
        assert_eq!(input.entries(), &["1.1.1.1".to_string(), "8.8.8.8".to_string()]);
        assert_eq!(input.path(), Path::new("ips.txt"));
    }

    #[test]
    fn test_load_entries_missing_file() {
        let err = load_entries("/nonexistent/ips.txt").unwrap_err();
        assert!(matches!(err, DriverError::InputNotFound { .. }));
        assert_eq!(err.to_string(), "File /nonexistent/ips.txt not found.");
    }

    #[test]
    fn test_run_skips_failed_lookups() {
        let clock = ManualClock::new();
        let mut driver = BatchDriver::new(
            PrefixLookup,
            MemoryDisplay::new(),
            &clock,
            DriverSettings::default(),
        );

        let input = InputList::from_text("ips.txt", "10.0.0.1\nbogus\n10.0.0.2\n192.168.1.1\n");
        let report = driver.run(&input).unwrap();

        assert_eq!(report.entries, 4);
        assert_eq!(report.resolved, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.tally.total(), 3);
        assert_eq!(report.tally.count("Net 10"), 2);
        assert_eq!(driver.state(), DriverState::Done);
    }

    #[test]
    fn test_run_empty_input() {
        let clock = ManualClock::new();
        let mut driver = BatchDriver::new(
            PrefixLookup,
            MemoryDisplay::new(),
            &clock,
            DriverSettings::default(),
        );

        let report = driver.run(&InputList::from_text("empty.txt", "\n  \n")).unwrap();

        assert_eq!(report.entries, 0);
        assert!(report.tally.is_empty());
        assert_eq!(driver.state(), DriverState::Done);

        let display = driver.into_display();
        assert_eq!(display.clears(), 0);
        assert_eq!(display.transcript(), "Loaded: empty.txt\n\nNo entries processed.\n");
    }

    #[test]
    fn test_progress_written_every_entry() {
        let clock = ManualClock::new();
        let mut driver = BatchDriver::new(
            PrefixLookup,
            MemoryDisplay::new(),
            &clock,
            DriverSettings::default(),
        );

        driver
            .run(&InputList::from_text("ips.txt", "1.0.0.1\n2.0.0.1\n"))
            .unwrap();

        let transcript = driver.display().transcript();
        assert!(transcript.contains("\rScanned: ("));
        assert!(transcript.contains("50.00% done (1/2)"));
        assert!(transcript.contains("100.00% done (2/2)"));
    }
}
