//! Source adapters.
//!
//! Each source kind is a small capability set: how raw tables are pulled
//! from the documents, which field families resolve its headers, and which
//! per-category permission overrides apply. Rule data lives in the kind's
//! profile; the adapter decides how it is read.

use tracing::debug;

use regmap_ingest::pdf::{PdfLayoutOptions, extract_pdf};
use regmap_ingest::{Extraction, html, spreadsheet};
use regmap_model::{ConvertError, Document, ExtractionError, SourceKind};
use regmap_standards::{FieldFamily, PermissionOverride, Profile};

/// Per-kind behavior selected by the declared source kind.
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn description(&self) -> &'static str;

    /// Extract one document.
    fn extract_document(&self, document: Document<'_>) -> Result<Extraction, ExtractionError>;

    /// Extract every document in input order.
    ///
    /// Single-document kinds reject any other count.
    fn extract_raw_tables(&self, documents: &[Document<'_>]) -> Result<Extraction, ConvertError> {
        let kind = self.kind();
        let count_ok = if kind.accepts_many() {
            !documents.is_empty()
        } else {
            documents.len() == 1
        };
        if !count_ok {
            return Err(ConvertError::DocumentCount {
                kind,
                count: documents.len(),
            });
        }
        let mut all = Extraction::default();
        for document in documents {
            let extraction = self.extract_document(*document)?;
            debug!(
                kind = %kind,
                document = document.index,
                tables = extraction.tables.len(),
                skipped = extraction.warnings.len(),
                "extracted raw tables"
            );
            all.extend(extraction);
        }
        Ok(all)
    }

    /// Header dictionaries, in scoring order.
    fn field_families<'p>(&self, profile: &'p Profile) -> &'p [FieldFamily] {
        &profile.families
    }

    fn category_overrides<'p>(&self, profile: &'p Profile) -> &'p [PermissionOverride] {
        &profile.permissions.overrides
    }
}

#[derive(Debug, Default)]
pub struct HtmlTableAdapter;

impl SourceAdapter for HtmlTableAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::HtmlTable
    }

    fn description(&self) -> &'static str {
        "Every <table> of a vendor BMS export"
    }

    fn extract_document(&self, document: Document<'_>) -> Result<Extraction, ExtractionError> {
        html::extract_html(self.kind(), document)
    }
}

#[derive(Debug, Default)]
pub struct SpreadsheetAdapter;

impl SourceAdapter for SpreadsheetAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::SpreadsheetMultitab
    }

    fn description(&self) -> &'static str {
        "Every sheet of a controller workbook"
    }

    fn extract_document(&self, document: Document<'_>) -> Result<Extraction, ExtractionError> {
        spreadsheet::extract_workbook(self.kind(), document)
    }
}

/// Any PDF kind; the dialects differ only in their profile.
#[derive(Debug)]
pub struct PdfAdapter {
    kind: SourceKind,
    description: &'static str,
    layout: PdfLayoutOptions,
}

impl PdfAdapter {
    pub const fn new(kind: SourceKind, description: &'static str) -> Self {
        Self {
            kind,
            description,
            layout: PdfLayoutOptions {
                line_tolerance: 0.4,
                cell_gap: 1.0,
                table_gap: 2.5,
            },
        }
    }

    pub fn with_layout(mut self, layout: PdfLayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

impl SourceAdapter for PdfAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn extract_document(&self, document: Document<'_>) -> Result<Extraction, ExtractionError> {
        extract_pdf(self.kind, document, &self.layout)
    }
}

static HTML_TABLE: HtmlTableAdapter = HtmlTableAdapter;
static SPREADSHEET: SpreadsheetAdapter = SpreadsheetAdapter;
static PDF_DIALECT_A: PdfAdapter = PdfAdapter::new(
    SourceKind::PdfDialectA,
    "PDF maps with marker rows and repeated-register group headers",
);
static PDF_DIALECT_B: PdfAdapter = PdfAdapter::new(
    SourceKind::PdfDialectB,
    "PDF manuals with section titles and two column families",
);
static PDF_MULTI_DOCUMENT: PdfAdapter = PdfAdapter::new(
    SourceKind::PdfMultiDocument,
    "Ordered PDF manuals unified as one source",
);

/// The adapter for a declared kind.
pub fn adapter_for(kind: SourceKind) -> &'static dyn SourceAdapter {
    match kind {
        SourceKind::HtmlTable => &HTML_TABLE,
        SourceKind::SpreadsheetMultitab => &SPREADSHEET,
        SourceKind::PdfDialectA => &PDF_DIALECT_A,
        SourceKind::PdfDialectB => &PDF_DIALECT_B,
        SourceKind::PdfMultiDocument => &PDF_MULTI_DOCUMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_an_adapter() {
        for kind in SourceKind::ALL {
            assert_eq!(adapter_for(kind).kind(), kind);
        }
    }

    #[test]
    fn single_document_kinds_reject_two_blobs() {
        let blob = b"<table><tr><td>x</td></tr></table>".as_slice();
        let documents = [Document::new(0, blob), Document::new(1, blob)];
        let error = adapter_for(SourceKind::HtmlTable)
            .extract_raw_tables(&documents)
            .unwrap_err();
        assert!(matches!(
            error,
            ConvertError::DocumentCount { count: 2, .. }
        ));
    }

    #[test]
    fn multi_document_needs_at_least_one_blob() {
        let error = adapter_for(SourceKind::PdfMultiDocument)
            .extract_raw_tables(&[])
            .unwrap_err();
        assert!(matches!(error, ConvertError::DocumentCount { count: 0, .. }));
    }
}
