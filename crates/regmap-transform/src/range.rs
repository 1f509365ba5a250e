//! Free-text range extraction.

use std::sync::LazyLock;

use regex::Regex;

/// `<number> <separator> <number> <unit?>` anywhere in the text.
static SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<min>[-+]?\d+(?:[.,]\d+)?)\s*(?:to|a|\.{2,3}|÷|~|-|–|/)\s*(?P<max>[-+]?\d+(?:[.,]\d+)?)\s*(?P<unit>[^\s\d()\[\]].*?)?\s*[)\]]?\s*$",
    )
    .expect("valid range regex")
});

/// Bounds and unit found in a range cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub unit: Option<String>,
}

/// Parses `-10 to 200 °C`, `0..100%`, `(0 ÷ 99 s)`, `-50 - -10`.
///
/// Returns `None` when no numeric span is present; the caller leaves the
/// bounds null.
pub fn parse_range(text: &str) -> Option<RangeSpec> {
    let captures = SPAN.captures(text.trim())?;
    let number = |name: &str| {
        captures
            .name(name)
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
    };
    let min = number("min")?;
    let max = number("max")?;
    let unit = captures
        .name("unit")
        .map(|m| m.as_str().trim().to_string())
        .filter(|unit| !unit.is_empty());
    Some(RangeSpec { min, max, unit })
}
