//! Type-safe enumerations for register map concepts.
//!
//! Vendor documents spell these concepts in many ways; the enums here are
//! the canonical forms every later stage works with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared kind of a source document.
///
/// The kind selects the extractor and the rule profile used for the whole
/// conversion; it is never sniffed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Markup export with one or more `<table>` elements.
    HtmlTable,
    /// Workbook where every sheet is a candidate table.
    SpreadsheetMultitab,
    /// PDF with marker rows and repeated-register group headers.
    PdfDialectA,
    /// PDF with section title tables and two competing column families.
    PdfDialectB,
    /// Ordered sequence of PDFs unified as one logical source.
    PdfMultiDocument,
}

impl SourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::HtmlTable,
        SourceKind::SpreadsheetMultitab,
        SourceKind::PdfDialectA,
        SourceKind::PdfDialectB,
        SourceKind::PdfMultiDocument,
    ];

    /// Returns the kebab-case identifier used on the command line and in profiles.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::HtmlTable => "html-table",
            SourceKind::SpreadsheetMultitab => "spreadsheet-multitab",
            SourceKind::PdfDialectA => "pdf-dialect-a",
            SourceKind::PdfDialectB => "pdf-dialect-b",
            SourceKind::PdfMultiDocument => "pdf-multi-document",
        }
    }

    /// Returns true for kinds whose documents are PDFs.
    pub fn is_pdf(&self) -> bool {
        matches!(
            self,
            SourceKind::PdfDialectA | SourceKind::PdfDialectB | SourceKind::PdfMultiDocument
        )
    }

    /// Returns true if the kind accepts more than one document per conversion.
    pub fn accepts_many(&self) -> bool {
        matches!(self, SourceKind::PdfMultiDocument)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Unknown source kind: {s}"))
    }
}

/// Final semantic classification of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemCategory {
    Alarm,
    SetPoint,
    ConfigParameter,
    Command,
    Status,
    Default,
    System,
    AnalogInput,
    AnalogOutput,
    AnalogInputOutput,
    DigitalInput,
    DigitalOutput,
    InputOutput,
    SerialOutput,
}

impl SystemCategory {
    pub const ALL: [SystemCategory; 14] = [
        SystemCategory::Alarm,
        SystemCategory::SetPoint,
        SystemCategory::ConfigParameter,
        SystemCategory::Command,
        SystemCategory::Status,
        SystemCategory::Default,
        SystemCategory::System,
        SystemCategory::AnalogInput,
        SystemCategory::AnalogOutput,
        SystemCategory::AnalogInputOutput,
        SystemCategory::DigitalInput,
        SystemCategory::DigitalOutput,
        SystemCategory::InputOutput,
        SystemCategory::SerialOutput,
    ];

    /// Returns the canonical upper snake case name written to output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemCategory::Alarm => "ALARM",
            SystemCategory::SetPoint => "SET_POINT",
            SystemCategory::ConfigParameter => "CONFIG_PARAMETER",
            SystemCategory::Command => "COMMAND",
            SystemCategory::Status => "STATUS",
            SystemCategory::Default => "DEFAULT",
            SystemCategory::System => "SYSTEM",
            SystemCategory::AnalogInput => "ANALOG_INPUT",
            SystemCategory::AnalogOutput => "ANALOG_OUTPUT",
            SystemCategory::AnalogInputOutput => "ANALOG_INPUT_OUTPUT",
            SystemCategory::DigitalInput => "DIGITAL_INPUT",
            SystemCategory::DigitalOutput => "DIGITAL_OUTPUT",
            SystemCategory::InputOutput => "INPUT_OUTPUT",
            SystemCategory::SerialOutput => "SERIAL_OUTPUT",
        }
    }

    pub fn is_analog(&self) -> bool {
        matches!(
            self,
            SystemCategory::AnalogInput
                | SystemCategory::AnalogOutput
                | SystemCategory::AnalogInputOutput
        )
    }

    pub fn is_digital(&self) -> bool {
        matches!(
            self,
            SystemCategory::DigitalInput | SystemCategory::DigitalOutput
        )
    }
}

impl fmt::Display for SystemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemCategory {
    type Err = String;

    /// Accepts the canonical names with spaces, hyphens or underscores, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        SystemCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| format!("Unknown system category: {s}"))
    }
}

/// Presentation level of a parameter in the downstream BMS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Basic,
    Simple,
    /// At most one record per batch.
    Primary,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Basic => "basic",
            View::Simple => "simple",
            View::Primary => "primary",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running mode set by marker rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
}

/// Signal type of a parameter as declared by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Analog,
    Integer,
    Digital,
    Alarm,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Analog => "analog",
            DataKind::Integer => "integer",
            DataKind::Digital => "digital",
            DataKind::Alarm => "alarm",
        }
    }

    /// Analog and integer values carry a numeric range.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataKind::Analog | DataKind::Integer)
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analog" => Ok(DataKind::Analog),
            "integer" => Ok(DataKind::Integer),
            "digital" => Ok(DataKind::Digital),
            "alarm" => Ok(DataKind::Alarm),
            _ => Err(format!("Unknown data kind: {s}")),
        }
    }
}

/// Read/write capability parsed from an access cell or a marker mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessFlags {
    pub read: bool,
    pub write: bool,
}

impl AccessFlags {
    pub const READ_WRITE: AccessFlags = AccessFlags {
        read: true,
        write: true,
    };

    /// Parse vendor access notations (`R`, `W`, `RW`, `R/W`, `READ`, `READWRITE`, `Read/Write`...).
    pub fn parse(text: &str) -> Self {
        let upper: String = text
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if upper.is_empty() {
            return Self::default();
        }
        if upper.contains("READWRITE") || upper.contains("READ/WRITE") {
            return Self::READ_WRITE;
        }
        if upper.contains("READ") || upper.contains("WRITE") {
            return Self {
                read: upper.contains("READ"),
                write: upper.contains("WRITE"),
            };
        }
        Self {
            read: upper.contains('R'),
            write: upper.contains('W'),
        }
    }

    pub fn merge(self, other: AccessFlags) -> Self {
        Self {
            read: self.read || other.read,
            write: self.write || other.write,
        }
    }

    pub fn class(&self) -> AccessClass {
        match (self.read, self.write) {
            (false, false) => AccessClass::None,
            (true, false) => AccessClass::ReadOnly,
            (false, true) => AccessClass::WriteOnly,
            (true, true) => AccessClass::ReadWrite,
        }
    }
}

impl From<AccessMode> for AccessFlags {
    fn from(mode: AccessMode) -> Self {
        match mode {
            AccessMode::Read => AccessFlags {
                read: true,
                write: false,
            },
            AccessMode::Write => AccessFlags {
                read: false,
                write: true,
            },
        }
    }
}

/// Coarse access class used by permission overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessClass {
    None,
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!(
            "html-table".parse::<SourceKind>().unwrap(),
            SourceKind::HtmlTable
        );
        assert_eq!(
            "PDF_DIALECT_B".parse::<SourceKind>().unwrap(),
            SourceKind::PdfDialectB
        );
        assert!("docx".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_system_category_round_trip_names() {
        for category in SystemCategory::ALL {
            assert_eq!(category.as_str().parse::<SystemCategory>(), Ok(category));
        }
        assert_eq!(
            "set point".parse::<SystemCategory>(),
            Ok(SystemCategory::SetPoint)
        );
    }

    #[test]
    fn test_access_flags_notations() {
        assert_eq!(AccessFlags::parse("RW"), AccessFlags::READ_WRITE);
        assert_eq!(AccessFlags::parse("R / W"), AccessFlags::READ_WRITE);
        assert_eq!(AccessFlags::parse("READWRITE"), AccessFlags::READ_WRITE);
        assert_eq!(AccessFlags::parse("Read/Write"), AccessFlags::READ_WRITE);
        assert_eq!(AccessFlags::parse("READ").class(), AccessClass::ReadOnly);
        assert_eq!(AccessFlags::parse("WRITE").class(), AccessClass::WriteOnly);
        assert_eq!(AccessFlags::parse("r").class(), AccessClass::ReadOnly);
        assert_eq!(AccessFlags::parse("").class(), AccessClass::None);
    }

    #[test]
    fn test_access_mode_into_flags() {
        let flags: AccessFlags = AccessMode::Write.into();
        assert!(flags.write);
        assert!(!flags.read);
    }
}
