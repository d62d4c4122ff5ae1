use crate::tally::CountryTally;

/// Default display width of the country column
pub const DEFAULT_NAME_WIDTH: usize = 30;

/// Default number of countries listed individually
pub const DEFAULT_TOP_N: usize = 10;

const TRUNCATION_MARKER: &str = "... ";

/// Narrowest column that still fits the truncation marker
pub const MIN_NAME_WIDTH: usize = TRUNCATION_MARKER.len();

const OTHER_LABEL: &str = "OTHER";

/// Which point of the run a summary is drawn at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPhase {
    Live,
    Final,
}

impl SummaryPhase {
    fn label(self) -> &'static str {
        match self {
            SummaryPhase::Live => "Current",
            SummaryPhase::Final => "Final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLayout {
    pub top_n: usize,
    pub name_width: usize,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }
}

/// Fit a country name to a fixed column width
///
/// Longer names keep `width - 4` characters followed by `"... "`; shorter
/// names are right-padded with spaces. Widths below [`MIN_NAME_WIDTH`]
/// cannot hold the marker and produce a longer string.
pub fn format_country_name(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let kept: String = name
            .chars()
            .take(width.saturating_sub(TRUNCATION_MARKER.len()))
            .collect();
        format!("{kept}{TRUNCATION_MARKER}")
    } else {
        format!("{name:<width$}")
    }
}

/// Render the leaderboard block for the current tally
pub fn render_summary(tally: &CountryTally, phase: SummaryPhase, layout: &SummaryLayout) -> String {
    let board = tally.leaderboard(layout.top_n);
    let width = layout.name_width;

    let mut out = format!(
        "{} Counts (Top {} Countries):\n\n",
        phase.label(),
        layout.top_n
    );

    for entry in &board.entries {
        out.push_str(&format!(
            "{}: {} IPs\n",
            format_country_name(&entry.country, width),
            entry.count
        ));
    }

    if board.other > 0 {
        out.push_str(&format!(
            "{}: {} IPs\n",
            format_country_name(OTHER_LABEL, width),
            board.other
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_long_name_truncated() {
        let name = "A".repeat(35);
        let formatted = format_country_name(&name, 30);

        assert_eq!(formatted.len(), 30);
        assert_eq!(formatted, format!("{}... ", "A".repeat(26)));
    }

    #[test]
    fn test_format_short_name_padded() {
        let formatted = format_country_name("Spain", 30);
        assert_eq!(formatted, format!("Spain{}", " ".repeat(25)));
    }

    #[test]
    fn test_format_min_width_keeps_column() {
        let formatted = format_country_name("Germany", MIN_NAME_WIDTH);
        assert_eq!(formatted, "... ");
        assert_eq!(formatted.chars().count(), MIN_NAME_WIDTH);
        assert_eq!(format_country_name("UK", MIN_NAME_WIDTH), "UK  ");
    }

    #[test]
    fn test_format_exact_width_unchanged() {
        let name = "B".repeat(30);
        assert_eq!(format_country_name(&name, 30), name);
    }

    #[test]
    fn test_format_counts_characters_not_bytes() {
        let name = "Côte d'Ivoire";
        let formatted = format_country_name(name, 30);
        assert_eq!(formatted.chars().count(), 30);

        let long = "Å".repeat(40);
        let truncated = format_country_name(&long, 30);
        assert_eq!(truncated.chars().count(), 30);
        assert!(truncated.ends_with("... "));
    }

    #[test]
    fn test_render_final_summary() {
        let mut tally = CountryTally::new();
        tally.increment("United States");
        tally.increment("United States");
        tally.increment("Australia");

        let text = render_summary(&tally, SummaryPhase::Final, &SummaryLayout::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Final Counts (Top 10 Countries):");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], format!("{}: 2 IPs", format_country_name("United States", 30)));
        assert_eq!(lines[3], format!("{}: 1 IPs", format_country_name("Australia", 30)));
        assert_eq!(lines.len(), 4);
        assert!(!text.contains("OTHER"));
    }

    #[test]
    fn test_render_live_header() {
        let text = render_summary(
            &CountryTally::new(),
            SummaryPhase::Live,
            &SummaryLayout::default(),
        );
        assert_eq!(text, "Current Counts (Top 10 Countries):\n\n");
    }

    #[test]
    fn test_render_other_line() {
        let mut tally = CountryTally::new();
        for i in 1..=15u64 {
            for _ in 0..i {
                tally.increment(&format!("Country {i:02}"));
            }
        }

        let text = render_summary(&tally, SummaryPhase::Final, &SummaryLayout::default());
        let country_lines = text.lines().filter(|l| l.starts_with("Country")).count();

        assert_eq!(country_lines, 10);
        assert!(!text.contains("Country 05"));
        assert!(text.ends_with(&format!("{}: 15 IPs\n", format_country_name("OTHER", 30))));
    }

    #[test]
    fn test_render_respects_layout() {
        let mut tally = CountryTally::new();
        for country in ["Mexico", "Canada", "Canada"] {
            tally.increment(country);
        }

        let layout = SummaryLayout {
            top_n: 1,
            name_width: 8,
        };
        let text = render_summary(&tally, SummaryPhase::Final, &layout);

        assert!(text.starts_with("Final Counts (Top 1 Countries):"));
        assert!(text.contains("Canada  : 2 IPs\n"));
        assert!(text.contains("OTHER   : 1 IPs\n"));
    }
}
