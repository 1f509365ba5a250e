use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use regmap_model::{Document, ExtractionError, Provenance, RawCell, RawTable, Rgb, SourceKind};

use crate::Extraction;

static BACKGROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)background(?:-color)?\s*:\s*(?:#(?P<hex>[0-9a-f]{3}|[0-9a-f]{6})\b|rgb\(\s*(?P<r>\d{1,3})\s*,\s*(?P<g>\d{1,3})\s*,\s*(?P<b>\d{1,3})\s*\))",
    )
    .expect("valid background regex")
});

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector {css}: {e}"))
}

/// Every `<table>` in document order; nested tables are tables of their own.
pub fn extract_html(kind: SourceKind, document: Document<'_>) -> Result<Extraction, ExtractionError> {
    let fail = |reason: String| ExtractionError::new(document.id(), kind, reason);
    let text = String::from_utf8_lossy(document.bytes);
    if !text.to_ascii_lowercase().contains("<table") {
        return Err(fail("no <table> element".to_string()));
    }
    let html = Html::parse_document(&text);
    let table_sel = selector("table").map_err(fail)?;
    let row_sel = selector("tr").map_err(fail)?;

    let mut extraction = Extraction::default();
    for (index, table) in html.select(&table_sel).enumerate() {
        let rows: Vec<Vec<RawCell>> = table
            .select(&row_sel)
            .filter(|row| owning_table(row).is_some_and(|owner| owner.id() == table.id()))
            .map(|row| row_cells(&row))
            .collect();
        debug!(table = index, rows = rows.len(), "html table");
        extraction.push(RawTable::new(
            Provenance::new(kind, document.index, 0, index),
            rows,
        ));
    }
    Ok(extraction)
}

fn owning_table<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
}

fn row_cells(row: &ElementRef<'_>) -> Vec<RawCell> {
    let row_fill = element_fill(row);
    let mut cells = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        let name = cell.value().name();
        if name != "td" && name != "th" {
            continue;
        }
        let text = cell
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let mut raw = if text.is_empty() {
            RawCell::empty()
        } else {
            RawCell::text(text)
        };
        if let Some(fill) = element_fill(&cell).or(row_fill) {
            raw = raw.with_fill(fill);
        }
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|span| *span > 0)
            .unwrap_or(1);
        for _ in 0..span {
            cells.push(raw.clone());
        }
    }
    cells
}

/// Background from `bgcolor` or an inline `background(-color)` declaration.
fn element_fill(element: &ElementRef<'_>) -> Option<Rgb> {
    let value = element.value();
    if let Some(fill) = value.attr("bgcolor").and_then(Rgb::from_hex) {
        return Some(fill);
    }
    let style = value.attr("style")?;
    let captures = BACKGROUND.captures(style)?;
    if let Some(hex) = captures.name("hex") {
        return Rgb::from_hex(hex.as_str());
    }
    let channel = |name: &str| {
        captures
            .name(name)
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .map(|v| v.min(255) as u8)
    };
    Some(Rgb::new(channel("r")?, channel("g")?, channel("b")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Extraction {
        extract_html(SourceKind::HtmlTable, Document::new(0, html.as_bytes())).unwrap()
    }

    #[test]
    fn tables_in_document_order_with_colspan() {
        let extraction = extract(
            r#"<html><body>
            <table><tr><td>Title only</td></tr></table>
            <table>
              <tr><th>BMS Address</th><th colspan="2">Variable name</th></tr>
              <tr><td> 10 </td><td>SP_TEMP</td><td></td></tr>
            </table></body></html>"#,
        );
        assert_eq!(extraction.tables.len(), 2);
        let second = &extraction.tables[1];
        assert_eq!(second.provenance.table, 1);
        assert_eq!(second.rows[0].len(), 3);
        assert_eq!(second.rows[0][2].as_str(), "Variable name");
        assert_eq!(second.rows[1][0].as_str(), "10");
        assert!(second.rows[1][2].text.is_none());
    }

    #[test]
    fn cell_fill_from_bgcolor_and_style() {
        let extraction = extract(
            r##"<table>
              <tr bgcolor="#ff0000"><td>A</td><td style="background-color: rgb(0, 128, 0)">B</td></tr>
              <tr><td style="color: red; background: #00f">C</td><td>D</td></tr>
            </table>"##,
        );
        let rows = &extraction.tables[0].rows;
        assert_eq!(rows[0][0].style.map(|s| s.fill), Some(Rgb::new(255, 0, 0)));
        assert_eq!(rows[0][1].style.map(|s| s.fill), Some(Rgb::new(0, 128, 0)));
        assert_eq!(rows[1][0].style.map(|s| s.fill), Some(Rgb::new(0, 0, 255)));
        assert!(rows[1][1].style.is_none());
    }

    #[test]
    fn nested_table_rows_stay_with_their_table() {
        let extraction = extract(
            "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr></table>",
        );
        assert_eq!(extraction.tables.len(), 2);
        assert_eq!(extraction.tables[0].rows.len(), 1);
        assert_eq!(extraction.tables[1].rows[0][0].as_str(), "inner");
    }

    #[test]
    fn document_without_tables_is_an_extraction_error() {
        let error =
            extract_html(SourceKind::HtmlTable, Document::new(3, b"<p>nothing</p>")).unwrap_err();
        assert_eq!(error.document.index, 3);
        assert!(error.reason.contains("<table>"));
    }

    #[test]
    fn empty_table_is_skipped_with_warning() {
        let extraction = extract("<table><tr><td> </td></tr></table><table><tr><td>x</td></tr></table>");
        assert_eq!(extraction.tables.len(), 1);
        assert_eq!(extraction.warnings.len(), 1);
    }
}
