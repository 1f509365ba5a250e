//! Utility functions for header matching.

/// Normalizes header text for comparison by lowercasing and replacing separators with spaces.
///
/// `R/W`, `R / W` and `r_w` all compare equal; so do `Bms_Ofs` and `BMS OFS`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '/', '\\', '\n'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
