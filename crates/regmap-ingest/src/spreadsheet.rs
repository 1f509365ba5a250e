use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

use calamine::{DataType, Reader, Xls, Xlsx};
use tracing::debug;

use regmap_model::{Document, ExtractionError, Provenance, RawCell, RawTable, SourceKind};

use crate::Extraction;

/// Compound File header of legacy Excel 97-2003 workbooks.
const XLS_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Every worksheet in workbook order, one raw table per sheet.
///
/// Legacy `.xls` workbooks are recognized by their compound file header;
/// anything else is read as `.xlsx`.
pub fn extract_workbook(
    kind: SourceKind,
    document: Document<'_>,
) -> Result<Extraction, ExtractionError> {
    let fail = |reason: String| ExtractionError::new(document.id(), kind, reason);
    let cursor = Cursor::new(document.bytes);
    if document.bytes.starts_with(&XLS_MAGIC) {
        let workbook =
            Xls::new(cursor).map_err(|e| fail(format!("failed to read xls workbook: {e}")))?;
        read_sheets(kind, document, workbook)
    } else {
        let workbook =
            Xlsx::new(cursor).map_err(|e| fail(format!("failed to read xlsx workbook: {e}")))?;
        read_sheets(kind, document, workbook)
    }
}

fn read_sheets<RS, W>(
    kind: SourceKind,
    document: Document<'_>,
    mut workbook: W,
) -> Result<Extraction, ExtractionError>
where
    RS: Read + Seek,
    W: Reader<RS>,
    W::Error: Display,
{
    let fail = |reason: String| ExtractionError::new(document.id(), kind, reason);
    let mut extraction = Extraction::default();
    for (index, sheet_name) in workbook.sheet_names().clone().into_iter().enumerate() {
        let provenance = Provenance::new(kind, document.index, index, 0).with_sheet(&sheet_name);
        let range = match workbook.worksheet_range(&sheet_name) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(fail(format!("sheet '{sheet_name}': {e}"))),
            None => {
                extraction
                    .warnings
                    .push(regmap_model::Warning::table_skipped(provenance, "sheet not found"));
                continue;
            }
        };
        let rows: Vec<Vec<RawCell>> = range
            .rows()
            .map(|row| row.iter().map(cell_from).collect())
            .collect();
        debug!(sheet = %sheet_name, rows = rows.len(), "worksheet");
        extraction.push(RawTable::new(provenance, rows));
    }
    Ok(extraction)
}

fn cell_from(value: &DataType) -> RawCell {
    match render(value) {
        Some(text) if !text.trim().is_empty() => RawCell::text(text.trim()),
        _ => RawCell::empty(),
    }
}

/// Cell text as a spreadsheet user would read it; integral floats print without a fraction.
pub(crate) fn render(value: &DataType) -> Option<String> {
    match value {
        DataType::String(s) => Some(s.clone()),
        DataType::Float(v) => Some(format_float(*v)),
        DataType::Int(v) => Some(v.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::DateTime(v) | DataType::Duration(v) => Some(format_float(*v)),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => Some(s.clone()),
        DataType::Error(_) | DataType::Empty => None,
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
