use std::collections::BTreeMap;
use std::fmt::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use regmap_model::SystemCategory;
use regmap_validate::{InvariantReport, Severity};

use crate::types::{ConvertResult, OutputFormat};

/// Renders the conversion summary shown after `convert`.
pub fn render_summary(result: &ConvertResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Kind: {}", result.kind);
    for (index, path) in result.documents.iter().enumerate() {
        let _ = writeln!(out, "Document {index}: {}", path.display());
    }
    match &result.output {
        Some(path) => {
            let format = match result.format {
                OutputFormat::Csv => "csv",
                OutputFormat::Json => "json",
            };
            let _ = writeln!(out, "Output: {} ({format})", path.display());
        }
        None => {
            let _ = writeln!(out, "Output: stdout (json)");
        }
    }
    let _ = writeln!(out, "{}", category_table(result));
    if !result.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:\n{}", warning_table(result));
    }
    if let Some(report) = &result.invariants {
        if report.is_clean() {
            let _ = writeln!(out, "\nInvariants: clean");
        } else {
            let _ = writeln!(out, "\nInvariants:\n{}", issue_table(report));
        }
    }
    out
}

fn category_table(result: &ConvertResult) -> Table {
    let mut counts: BTreeMap<SystemCategory, usize> = BTreeMap::new();
    for record in &result.records {
        *counts.entry(record.system_category).or_default() += 1;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (category, count) in &counts {
        table.add_row(vec![Cell::new(category.as_str()), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(result.records.len(), Color::Reset).add_attribute(Attribute::Bold),
    ]);
    table
}

fn warning_table(result: &ConvertResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Table"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for warning in &result.warnings {
        table.add_row(vec![
            Cell::new(warning.code()).fg(Color::Yellow),
            dim_cell(warning.table()),
            Cell::new(warning.to_string()),
        ]);
    }
    table
}

fn issue_table(report: &InvariantReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Check"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in &report.issues {
        let severity = match issue.severity() {
            Severity::Error => Cell::new("error")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            Severity::Warning => Cell::new("warning").fg(Color::Yellow),
        };
        table.add_row(vec![
            severity,
            Cell::new(issue.code()),
            Cell::new(issue.to_string()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
