use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use tracing::info;

use regmap_model::{CANONICAL_COLUMNS, CellValue, ParameterRecord};

/// Physical type of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

pub fn column_type(column: &str) -> ColumnType {
    match column {
        "id" | "register" | "sampling" | "read" | "write" | "parameter_write_byte_position"
        | "current_error_status" => ColumnType::Int,
        "minvalue" | "maxvalue" | "offset" | "addition" | "value" | "current_value" => {
            ColumnType::Float
        }
        _ => ColumnType::Text,
    }
}

/// One frame column per canonical column, in contractual order.
pub fn records_to_frame(records: &[ParameterRecord]) -> Result<DataFrame> {
    let rows: Vec<Vec<CellValue>> = records
        .iter()
        .map(|record| record.cells().into_iter().map(|(_, cell)| cell).collect())
        .collect();

    let columns: Vec<Column> = CANONICAL_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cells = rows.iter().map(|row| row.get(index).unwrap_or(&CellValue::Null));
            build_column(name, column_type(name), cells)
        })
        .collect();
    DataFrame::new(columns).context("build record frame")
}

fn build_column<'a>(
    name: &str,
    kind: ColumnType,
    cells: impl Iterator<Item = &'a CellValue>,
) -> Column {
    match kind {
        ColumnType::Int => {
            let values: Vec<Option<i64>> = cells
                .map(|cell| match cell {
                    CellValue::Int(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        ColumnType::Float => {
            let values: Vec<Option<f64>> = cells
                .map(|cell| match cell {
                    CellValue::Float(v) => Some(*v),
                    CellValue::Int(v) => Some(*v as f64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        ColumnType::Text => {
            let values: Vec<Option<String>> = cells
                .map(|cell| match cell {
                    CellValue::Text(text) => Some(text.clone()),
                    CellValue::Int(v) => Some(v.to_string()),
                    CellValue::Float(v) => Some(v.to_string()),
                    CellValue::Null => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
    }
}

/// Writes the record frame as CSV with a header row.
pub fn write_csv(records: &[ParameterRecord], path: &Path) -> Result<()> {
    let mut frame = records_to_frame(records)?;
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "csv written");
    Ok(())
}
