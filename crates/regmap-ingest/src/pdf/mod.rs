//! PDF extraction: per page, in page order, tables in top-to-bottom order.
//!
//! Later stages infer section structure from this order, so pages and
//! tables are never reordered.

pub mod content;
pub mod layout;

use lopdf::content::Content;
use tracing::{debug, warn};

use regmap_model::{Document, ExtractionError, Provenance, RawTable, SourceKind, Warning};

use crate::Extraction;

pub use layout::PdfLayoutOptions;

pub fn extract_pdf(
    kind: SourceKind,
    document: Document<'_>,
    options: &PdfLayoutOptions,
) -> Result<Extraction, ExtractionError> {
    let fail = |reason: String| ExtractionError::new(document.id(), kind, reason);
    let pdf = lopdf::Document::load_mem(document.bytes)
        .map_err(|e| fail(format!("failed to parse PDF: {e}")))?;
    let pages = pdf.get_pages();
    if pages.is_empty() {
        return Err(fail("PDF has no pages".to_string()));
    }

    let mut extraction = Extraction::default();
    for (page_index, (page_number, page_id)) in pages.into_iter().enumerate() {
        let page_provenance = Provenance::new(kind, document.index, page_index, 0);
        let decoded = pdf
            .get_page_content(page_id)
            .map_err(|e| e.to_string())
            .and_then(|bytes| Content::decode(&bytes).map_err(|e| e.to_string()));
        let operations = match decoded {
            Ok(operations) => operations,
            Err(reason) => {
                warn!(page = page_number, %reason, "unreadable page content");
                extraction.warnings.push(Warning::table_skipped(
                    page_provenance,
                    format!("unreadable page content: {reason}"),
                ));
                continue;
            }
        };
        let fonts = page_fonts(&pdf, page_id);
        let page = content::interpret(&operations, &fonts);
        let tables = layout::page_tables(&page, options);
        debug!(
            page = page_number,
            runs = page.runs.len(),
            zones = page.zones.len(),
            tables = tables.len(),
            "pdf page"
        );
        for (table_index, rows) in tables.into_iter().enumerate() {
            extraction.push(RawTable::new(
                Provenance::new(kind, document.index, page_index, table_index),
                rows,
            ));
        }
    }
    Ok(extraction)
}

/// Encodings for the page fonts whose text is not plain Latin-1: fonts with
/// a ToUnicode map or a named `/Encoding`.
fn page_fonts(pdf: &lopdf::Document, page_id: lopdf::ObjectId) -> content::FontEncodings<'_> {
    let mut encodings = content::FontEncodings::new();
    let fonts = match pdf.get_page_fonts(page_id) {
        Ok(fonts) => fonts,
        Err(error) => {
            debug!(%error, "page fonts unavailable");
            return encodings;
        }
    };
    for (name, font) in fonts {
        let named = font.get(b"Encoding").and_then(lopdf::Object::as_name).is_ok();
        if !named && !font.has(b"ToUnicode") {
            continue;
        }
        match font.get_font_encoding(pdf) {
            Ok(encoding) => {
                encodings.insert(name, encoding);
            }
            Err(error) => {
                debug!(font = %String::from_utf8_lossy(&name), %error, "font encoding ignored");
            }
        }
    }
    encodings
}
