//! Text rendering for the console display

pub mod progress;
pub mod summary;

pub use progress::render_progress;
pub use summary::{format_country_name, render_summary, SummaryLayout, SummaryPhase};
