//! Numeric coercion with explicit null placeholders.

/// Outcome of coercing one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    /// Missing or a null placeholder; never zero.
    Null,
    Value(T),
    /// Text present but not a number. Callers null the value and warn.
    Invalid,
}

impl<T> Coerced<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Coerced::Value(value) => Some(value),
            Coerced::Null | Coerced::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Coerced::Invalid)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
        match self {
            Coerced::Null => Coerced::Null,
            Coerced::Value(value) => Coerced::Value(f(value)),
            Coerced::Invalid => Coerced::Invalid,
        }
    }
}

/// Tokens that stand for "no value" in vendor tables.
const PLACEHOLDERS: [&str; 6] = ["nan", "none", "null", "n/a", "na", "-"];

/// True for blank text, any run of dashes, and the null spellings.
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '-' || c == '–') {
        return true;
    }
    let lower = trimmed.to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

/// Parses a numeric cell.
///
/// A single decimal comma is accepted (`1,5`), as are thousands-free
/// integers and scientific notation. Placeholders give [`Coerced::Null`].
pub fn coerce_number(text: &str) -> Coerced<f64> {
    if is_placeholder(text) {
        return Coerced::Null;
    }
    let trimmed = text.trim();
    let parsed = trimmed.parse::<f64>().ok().or_else(|| {
        (trimmed.matches(',').count() == 1 && !trimmed.contains('.'))
            .then(|| trimmed.replace(',', "."))
            .and_then(|text| text.parse::<f64>().ok())
    });
    match parsed {
        Some(value) if value.is_finite() => Coerced::Value(value),
        _ => Coerced::Invalid,
    }
}
