//! Data model shared by every stage of register map conversion.
//!
//! Raw tables come out of the extractors, labeled tables out of the header
//! resolver, and [`ParameterRecord`]s out of the core pipeline. Errors and
//! warnings are defined here so every crate reports them the same way.

pub mod document;
pub mod enums;
pub mod error;
pub mod field;
pub mod length;
pub mod record;
pub mod table;
pub mod warning;

pub use document::{Document, DocumentId, sha256_hex};
pub use enums::{AccessClass, AccessFlags, AccessMode, DataKind, SourceKind, SystemCategory, View};
pub use error::{ConvertError, ExtractionError, Result, SchemaError};
pub use field::Field;
pub use length::{BitLength, LengthUnit};
pub use record::{
    AGGREGATE_TAG, AlarmPayload, CANONICAL_COLUMNS, CellValue, DEFAULT_LANG, DEFAULT_PROTOCOL,
    L10n, LIBRARY_IDENTIFIER_TAG, ParameterRecord, format_mask,
};
pub use table::{CellStyle, LabeledRow, LabeledTable, Provenance, RawCell, RawTable, Rgb};
pub use warning::Warning;
