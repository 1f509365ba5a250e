//! Array templates such as `[1..4]`.

use std::sync::LazyLock;

use regex::Regex;

static SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?\s*(-?\d+)\s*(?:\.{2,3}|-|–)\s*(-?\d+)\s*\]?$").expect("valid dimension regex")
});

/// Largest span expanded into child rows.
pub const MAX_DIMENSION_CHILDREN: usize = 4096;

/// Inclusive index span `[start..end]` of a templated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSpan {
    pub start: i64,
    pub end: i64,
}

impl DimensionSpan {
    /// Number of child rows, `end - start + 1`.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        self.end
            .abs_diff(self.start)
            .checked_add(1)
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child positions in order.
    pub fn positions(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }
}

/// Parses `[a..b]`, `a...b`, `a-b` or `a–b`; reversed spans are rejected.
pub fn parse_dimension(text: &str) -> Option<DimensionSpan> {
    let captures = SPAN.captures(text.trim())?;
    let start = captures.get(1)?.as_str().parse::<i64>().ok()?;
    let end = captures.get(2)?.as_str().parse::<i64>().ok()?;
    (end >= start).then_some(DimensionSpan { start, end })
}
