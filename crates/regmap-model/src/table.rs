#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use crate::{Field, SourceKind};

/// An sRGB colour taken from a cell background or a PDF fill operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from unit-interval components as used by PDF colour operators.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Parse `#rgb`, `#rrggbb` or the bare hex digits.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let value = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Self::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ))
    }

    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Presentation attributes kept from the source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fill: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    pub text: Option<String>,
    pub style: Option<CellStyle>,
}

impl RawCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            style: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.style = Some(CellStyle { fill });
        self
    }

    pub fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Where a raw table came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Provenance {
    pub kind: SourceKind,
    /// Position of the blob in the input sequence.
    pub document: usize,
    /// Sheet index for workbooks, page index for PDFs, 0 for HTML.
    pub page: usize,
    /// Table index within the page, sheet or document.
    pub table: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Provenance {
    pub fn new(kind: SourceKind, document: usize, page: usize, table: usize) -> Self {
        Self {
            kind,
            document,
            page,
            table,
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc {} ", self.document)?;
        match &self.sheet {
            Some(sheet) => write!(f, "sheet '{sheet}'")?,
            None => write!(f, "page {}", self.page + 1)?,
        }
        write!(f, " table {}", self.table)
    }
}

/// Rows of cell text exactly as extracted, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub provenance: Provenance,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(provenance: Provenance, rows: Vec<Vec<RawCell>>) -> Self {
        Self { provenance, rows }
    }

    /// Build from plain strings; empty strings become missing cells.
    pub fn from_text_rows<S: AsRef<str>>(provenance: Provenance, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let text = cell.as_ref();
                        if text.is_empty() {
                            RawCell::empty()
                        } else {
                            RawCell::text(text)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { provenance, rows }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(RawCell::is_blank))
    }

    /// Non-blank cell texts of one row, trimmed.
    pub fn row_texts(&self, index: usize) -> Vec<&str> {
        self.rows
            .get(index)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_str().trim())
                    .filter(|text| !text.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A data row after header resolution, keyed by canonical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledRow {
    pub cells: BTreeMap<Field, String>,
    /// Fill of the first styled cell in the row.
    pub style: Option<CellStyle>,
    /// Row index within the raw table.
    pub source_row: usize,
}

impl LabeledRow {
    /// Trimmed cell text, `None` when the cell is missing or blank.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.cells
            .get(&field)
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.cells.insert(field, value.into());
    }
}

/// A raw table whose header was found and whose columns were renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub provenance: Provenance,
    /// Name of the field family that matched the header.
    pub family: String,
    pub columns: Vec<Field>,
    /// Text of the rows above the header, joined; used for section titles.
    pub title: Option<String>,
    pub rows: Vec<LabeledRow>,
}

impl LabeledTable {
    pub fn has_column(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_from_hex_variants() {
        assert_eq!(Rgb::from_hex("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("0f0"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::from_hex("red"), None);
        assert!(Rgb::from_unit(1.0, 1.0, 1.0).is_white());
    }

    #[test]
    fn raw_table_helpers() {
        let table = RawTable::from_text_rows(
            Provenance::new(SourceKind::HtmlTable, 0, 0, 1),
            &[vec!["A", "", " B "], vec!["", "", ""]],
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.row_texts(0), vec!["A", "B"]);
        assert!(!table.is_empty());
        assert_eq!(table.provenance.to_string(), "doc 0 page 1 table 1");
    }

    #[test]
    fn labeled_row_get_skips_blank() {
        let mut row = LabeledRow::default();
        row.set(Field::Name, "  ");
        row.set(Field::Register, " 10 ");
        assert_eq!(row.get(Field::Name), None);
        assert_eq!(row.get(Field::Register), Some("10"));
    }
}
