//! Raw Table Extractor.
//!
//! Turns the bytes of one document into an ordered sequence of
//! [`RawTable`]s. Nothing here interprets cell text; header resolution and
//! normalization happen downstream.

pub mod html;
pub mod pdf;
pub mod spreadsheet;

use regmap_model::{RawTable, Warning};

pub use pdf::PdfLayoutOptions;

/// Tables of one document in source order, plus warnings for skipped ones.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub tables: Vec<RawTable>,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    pub(crate) fn push(&mut self, table: RawTable) {
        if table.is_empty() {
            self.warnings
                .push(Warning::table_skipped(table.provenance, "no cell text"));
        } else {
            self.tables.push(table);
        }
    }

    pub fn extend(&mut self, other: Extraction) {
        self.tables.extend(other.tables);
        self.warnings.extend(other.warnings);
    }
}
