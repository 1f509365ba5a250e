//! Register address decoding.

use regmap_standards::Radix;

use crate::numeric::{Coerced, is_placeholder};

/// Decodes a register cell.
///
/// `0x1F`, `1Fh` and bare hex digits are read as base 16 under
/// [`Radix::Hex`]. Under [`Radix::Auto`] a token is hex only when it carries
/// a `0x` prefix, an `h` suffix or a hex letter. Spreadsheet cells such as
/// `10.0` decode as decimal integers; fractional or negative addresses are
/// invalid.
pub fn decode_register(text: &str, radix: Radix) -> Coerced<i64> {
    if is_placeholder(text) {
        return Coerced::Null;
    }
    let token = text.trim();
    let (digits, marked_hex) = strip_hex_marks(token);
    let hex = match radix {
        Radix::Hex => true,
        Radix::Decimal => false,
        Radix::Auto => marked_hex || digits.chars().any(|c| c.is_ascii_hexdigit() && c.is_ascii_alphabetic()),
    };
    let parsed = if hex {
        i64::from_str_radix(digits, 16).ok()
    } else {
        parse_decimal(token)
    };
    match parsed {
        Some(value) if value >= 0 => Coerced::Value(value),
        _ => Coerced::Invalid,
    }
}

fn strip_hex_marks(token: &str) -> (&str, bool) {
    if let Some(rest) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return (rest, true);
    }
    if let Some(rest) = token
        .strip_suffix('h')
        .or_else(|| token.strip_suffix('H'))
        && !rest.is_empty()
        && rest.chars().all(|c| c.is_ascii_hexdigit())
    {
        return (rest, true);
    }
    (token, false)
}

fn parse_decimal(token: &str) -> Option<i64> {
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    let value = token.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_tokens() {
        assert_eq!(decode_register("10", Radix::Decimal), Coerced::Value(10));
        assert_eq!(decode_register("10.0", Radix::Decimal), Coerced::Value(10));
        assert_eq!(decode_register("0101", Radix::Decimal), Coerced::Value(101));
        assert_eq!(decode_register("0x10", Radix::Decimal), Coerced::Invalid);
    }

    #[test]
    fn hex_tokens() {
        assert_eq!(decode_register("0x0101", Radix::Hex), Coerced::Value(257));
        assert_eq!(decode_register("0101", Radix::Hex), Coerced::Value(257));
        assert_eq!(decode_register("1Fh", Radix::Hex), Coerced::Value(31));
    }

    #[test]
    fn auto_detects_hex_marks() {
        assert_eq!(decode_register("0x10", Radix::Auto), Coerced::Value(16));
        assert_eq!(decode_register("1A", Radix::Auto), Coerced::Value(26));
        assert_eq!(decode_register("20h", Radix::Auto), Coerced::Value(32));
        assert_eq!(decode_register("20", Radix::Auto), Coerced::Value(20));
    }

    #[test]
    fn placeholders_and_garbage() {
        assert_eq!(decode_register("---", Radix::Auto), Coerced::Null);
        assert_eq!(decode_register("ESCRITURA", Radix::Decimal), Coerced::Invalid);
        assert_eq!(decode_register("-4", Radix::Decimal), Coerced::Invalid);
        assert_eq!(decode_register("1.5", Radix::Decimal), Coerced::Invalid);
    }
}
