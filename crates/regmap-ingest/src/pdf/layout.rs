//! Text-position table reconstruction.
//!
//! Runs are grouped into lines by baseline, lines into cells by horizontal
//! gaps, and consecutive lines into tables until a large vertical gap.
//! Column positions are inferred per table by merging the horizontal spans
//! of every cell, so a missing cell stays an empty slot instead of shifting
//! the row left.

use regmap_model::RawCell;

use super::content::{PageContent, TextRun};

/// Tolerances, expressed as multiples of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayoutOptions {
    /// Runs whose baselines differ by less than this share a line.
    pub line_tolerance: f32,
    /// Runs on one line closer than this form one cell.
    pub cell_gap: f32,
    /// A vertical gap wider than this starts a new table.
    pub table_gap: f32,
}

impl Default for PdfLayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 0.4,
            cell_gap: 1.0,
            table_gap: 2.5,
        }
    }
}

#[derive(Debug, Clone)]
struct PlacedCell {
    text: String,
    x0: f32,
    x1: f32,
    y: f32,
    font_size: f32,
}

#[derive(Debug, Clone)]
struct Line {
    y: f32,
    font_size: f32,
    cells: Vec<PlacedCell>,
}

/// Rows of cells for every table found on the page, top to bottom.
pub fn page_tables(page: &PageContent, options: &PdfLayoutOptions) -> Vec<Vec<Vec<RawCell>>> {
    let lines = group_lines(&page.runs, options);
    split_tables(lines, options)
        .into_iter()
        .map(|block| grid(page, &block))
        .filter(|rows| !rows.is_empty())
        .collect()
}

fn group_lines(runs: &[TextRun], options: &PdfLayoutOptions) -> Vec<Line> {
    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<&TextRun>> = Vec::new();
    for run in sorted {
        let joins = lines.last().is_some_and(|line| {
            let anchor = line[0];
            let tolerance = options.line_tolerance * anchor.font_size.max(run.font_size);
            (anchor.y - run.y).abs() <= tolerance
        });
        if joins {
            if let Some(line) = lines.last_mut() {
                line.push(run);
            }
        } else {
            lines.push(vec![run]);
        }
    }

    lines
        .into_iter()
        .map(|mut runs| {
            runs.sort_by(|a, b| a.x.total_cmp(&b.x));
            let y = runs[0].y;
            let font_size = runs.iter().map(|r| r.font_size).fold(0.0, f32::max);
            Line {
                y,
                font_size,
                cells: merge_cells(&runs, options),
            }
        })
        .collect()
}

fn merge_cells(runs: &[&TextRun], options: &PdfLayoutOptions) -> Vec<PlacedCell> {
    let mut cells: Vec<PlacedCell> = Vec::new();
    for run in runs {
        let text = run.text.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(last) = cells.last_mut()
            && run.x - last.x1 <= options.cell_gap * run.font_size
        {
            last.text.push(' ');
            last.text.push_str(text);
            last.x1 = last.x1.max(run.right());
            continue;
        }
        cells.push(PlacedCell {
            text: text.to_string(),
            x0: run.x,
            x1: run.right(),
            y: run.y,
            font_size: run.font_size,
        });
    }
    cells
}

fn split_tables(lines: Vec<Line>, options: &PdfLayoutOptions) -> Vec<Vec<Line>> {
    let mut tables: Vec<Vec<Line>> = Vec::new();
    let mut previous: Option<(f32, f32)> = None;
    for line in lines {
        let starts_table = match previous {
            None => true,
            Some((y, size)) => y - line.y > options.table_gap * size.max(line.font_size),
        };
        previous = Some((line.y, line.font_size));
        if starts_table {
            tables.push(vec![line]);
        } else if let Some(table) = tables.last_mut() {
            table.push(line);
        }
    }
    tables
}

/// Column spans of a table: overlapping cell spans merged left to right.
fn column_spans(lines: &[Line]) -> Vec<(f32, f32)> {
    let mut spans: Vec<(f32, f32)> = lines
        .iter()
        .flat_map(|line| line.cells.iter().map(|cell| (cell.x0, cell.x1)))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::new();
    for (x0, x1) in spans {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

fn grid(page: &PageContent, lines: &[Line]) -> Vec<Vec<RawCell>> {
    let spans = column_spans(lines);
    lines
        .iter()
        .map(|line| {
            let mut row = vec![RawCell::empty(); spans.len()];
            for cell in &line.cells {
                let center = (cell.x0 + cell.x1) / 2.0;
                let Some(column) = spans
                    .iter()
                    .position(|(x0, x1)| center >= *x0 && center <= *x1)
                else {
                    continue;
                };
                let mut raw = match row[column].text.take() {
                    Some(existing) => RawCell::text(format!("{existing} {}", cell.text)),
                    None => RawCell::text(cell.text.clone()),
                };
                let sample_y = cell.y + cell.font_size * 0.3;
                if let Some(fill) = page.fill_at(cell.x0 + 0.5, sample_y) {
                    raw = raw.with_fill(fill);
                }
                row[column] = raw;
            }
            row
        })
        .collect()
}
