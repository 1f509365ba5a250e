//! Canonical source fields produced by header resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column meaning recognized in vendor tables.
///
/// Several fields may feed one output column (the register has five
/// sources), and some never reach the output directly (`access`,
/// `dimension`, `range_text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Register,
    ReadRegister,
    WriteRegister,
    HexRegister,
    DecRegister,
    Name,
    Description,
    #[serde(rename = "minvalue")]
    MinValue,
    #[serde(rename = "maxvalue")]
    MaxValue,
    RangeText,
    Unit,
    Offset,
    Category,
    /// Running label given directly by a column (groups, section).
    Label,
    TypeHint,
    Access,
    Dimension,
    Length,
    Value,
}

impl Field {
    /// Register sources in coalescing order.
    pub const REGISTER_SOURCES: [Field; 5] = [
        Field::ReadRegister,
        Field::WriteRegister,
        Field::Register,
        Field::HexRegister,
        Field::DecRegister,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Register => "register",
            Field::ReadRegister => "read_register",
            Field::WriteRegister => "write_register",
            Field::HexRegister => "hex_register",
            Field::DecRegister => "dec_register",
            Field::Name => "name",
            Field::Description => "description",
            Field::MinValue => "minvalue",
            Field::MaxValue => "maxvalue",
            Field::RangeText => "range_text",
            Field::Unit => "unit",
            Field::Offset => "offset",
            Field::Category => "category",
            Field::Label => "label",
            Field::TypeHint => "type_hint",
            Field::Access => "access",
            Field::Dimension => "dimension",
            Field::Length => "length",
            Field::Value => "value",
        }
    }

    pub const ALL: [Field; 19] = [
        Field::Register,
        Field::ReadRegister,
        Field::WriteRegister,
        Field::HexRegister,
        Field::DecRegister,
        Field::Name,
        Field::Description,
        Field::MinValue,
        Field::MaxValue,
        Field::RangeText,
        Field::Unit,
        Field::Offset,
        Field::Category,
        Field::Label,
        Field::TypeHint,
        Field::Access,
        Field::Dimension,
        Field::Length,
        Field::Value,
    ];

    pub fn is_register(&self) -> bool {
        Self::REGISTER_SOURCES.contains(self)
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| format!("Unknown field: {s}"))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
