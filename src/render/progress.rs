/// Number of glyphs in the progress bar
pub const BAR_LENGTH: usize = 50;

const FILLED: char = '#';
const EMPTY: char = '-';

/// Render the scan progress line for `current` of `total` entries
///
/// Returns `None` when `total` is zero. `current` is clamped to `total`.
pub fn render_progress(total: usize, current: usize) -> Option<String> {
    if total == 0 {
        return None;
    }

    let current = current.min(total);
    let percent = current as f64 / total as f64 * 100.0;
    let filled = BAR_LENGTH * current / total;

    let bar: String = std::iter::repeat(FILLED)
        .take(filled)
        .chain(std::iter::repeat(EMPTY).take(BAR_LENGTH - filled))
        .collect();

    Some(format!(
        "Scanned: ({bar}) {percent:.2}% done ({current}/{total})"
    ))
}
