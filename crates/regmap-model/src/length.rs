//! Bit width of a parameter value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Supported power-of-two widths for unsigned packed values.
const NORMALIZED_WIDTHS: [u32; 5] = [16, 8, 4, 2, 1];

/// Unit used by a source's length column when it holds a bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Bits,
    /// 16-bit Modbus words.
    Words,
}

/// Width written to the `length` column: `1bit`, `16bit`, `s16`, `f32`...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitLength {
    Bits(u32),
    Signed16,
    Float32,
}

impl BitLength {
    pub const ONE: BitLength = BitLength::Bits(1);
    pub const SIXTEEN: BitLength = BitLength::Bits(16);

    /// Parse a length cell.
    ///
    /// Explicit tokens (`16bit`, `16 bits`, `s16`, `int16`, `f32`, `float`) win;
    /// a bare integer is read in `unit`.
    pub fn parse(text: &str, unit: LengthUnit) -> Option<Self> {
        let compact: String = text
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if compact.is_empty() {
            return None;
        }
        match compact.as_str() {
            "s16" | "int16" | "signed16" | "sint16" => return Some(BitLength::Signed16),
            "f32" | "float" | "float32" | "real" => return Some(BitLength::Float32),
            "u16" | "uint16" | "word" => return Some(BitLength::SIXTEEN),
            "bit" | "bool" | "boolean" => return Some(BitLength::ONE),
            _ => {}
        }
        let digits = compact
            .strip_suffix("bits")
            .or_else(|| compact.strip_suffix("bit"));
        if let Some(digits) = digits {
            return digits
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(BitLength::Bits);
        }
        let n = compact.parse::<u32>().ok().filter(|n| *n > 0)?;
        Some(match unit {
            LengthUnit::Bits => BitLength::Bits(n),
            LengthUnit::Words => BitLength::Bits(n.saturating_mul(16)),
        })
    }

    /// Width for a numeric value: `s16` when the range dips below zero.
    pub fn for_range(min: Option<f64>, max: Option<f64>) -> Self {
        let negative = min.is_some_and(|v| v < 0.0) || max.is_some_and(|v| v < 0.0);
        if negative {
            BitLength::Signed16
        } else {
            BitLength::SIXTEEN
        }
    }

    /// Snap an unsigned width to the largest of 1/2/4/8/16 not above it.
    pub fn normalized(self) -> Self {
        match self {
            BitLength::Bits(n) => {
                let width = NORMALIZED_WIDTHS
                    .into_iter()
                    .find(|w| *w <= n)
                    .unwrap_or(1);
                BitLength::Bits(width)
            }
            other => other,
        }
    }

    pub fn is_single_bit(&self) -> bool {
        matches!(self, BitLength::Bits(1))
    }
}

impl Default for BitLength {
    fn default() -> Self {
        BitLength::SIXTEEN
    }
}

impl fmt::Display for BitLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitLength::Bits(n) => write!(f, "{n}bit"),
            BitLength::Signed16 => f.write_str("s16"),
            BitLength::Float32 => f.write_str("f32"),
        }
    }
}

impl Serialize for BitLength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitLength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        BitLength::parse(&text, LengthUnit::Bits)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid bit length: {text}")))
    }
}
