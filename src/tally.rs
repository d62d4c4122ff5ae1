//! In-memory country frequency tally
//!
//! Counts are kept in first-seen order so that ranking ties resolve the
//! same way on every run with the same input.

use std::collections::HashMap;

/// A (country, count) pair derived from the tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub country: String,
    pub count: u64,
}

/// Top-N ranking plus the aggregated remainder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<RankedEntry>,
    /// Sum of all counts outside `entries`
    pub other: u64,
}

/// Country name to occurrence count
#[derive(Debug, Clone, Default)]
pub struct CountryTally {
    /// Position of each country in `entries`
    index: HashMap<String, usize>,
    /// Countries in the order they were first seen
    entries: Vec<RankedEntry>,
    total: u64,
}

impl CountryTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for a country, starting at 1 if absent
    pub fn increment(&mut self, country: &str) {
        match self.index.get(country) {
            Some(&pos) => self.entries[pos].count += 1,
            None => {
                self.index.insert(country.to_string(), self.entries.len());
                self.entries.push(RankedEntry {
                    country: country.to_string(),
                    count: 1,
                });
            }
        }
        self.total += 1;
    }

    /// Current count for a single country
    pub fn count(&self, country: &str) -> u64 {
        self.index
            .get(country)
            .map(|&pos| self.entries[pos].count)
            .unwrap_or(0)
    }

    /// The `n` highest counts, descending, ties in first-seen order
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<&RankedEntry> = self.entries.iter().collect();
        // sort_by is stable, so equal counts keep insertion order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.into_iter().take(n).cloned().collect()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct countries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `n` entries together with the OTHER bucket
    pub fn leaderboard(&self, n: usize) -> Leaderboard {
        let entries = self.top(n);
        let shown: u64 = entries.iter().map(|e| e.count).sum();

        Leaderboard {
            entries,
            other: self.total - shown,
        }
    }
}
