//! Hard cap on the diff size sent to the generator.

/// Appended after a cut diff, on its own line.
pub const TRUNCATION_MARKER: &str = "\n[... diff truncated ...]";

/// Cut `diff` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was dropped.
///
/// The cut is a plain character cut, not line-aware, so the request size is
/// bounded regardless of line lengths. Counting characters rather than bytes
/// keeps the cut on a UTF-8 boundary.
pub fn budget_diff(diff: &str, max_chars: usize) -> String {
    match diff.char_indices().nth(max_chars) {
        None => diff.to_string(),
        Some((cut, _)) => {
            let mut budgeted = String::with_capacity(cut + TRUNCATION_MARKER.len());
            budgeted.push_str(&diff[..cut]);
            budgeted.push_str(TRUNCATION_MARKER);
            budgeted
        }
    }
}
