use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use regmap_core::{Converter, adapter_for};
use regmap_model::SourceKind;
use regmap_report::{write_csv, write_json};
use regmap_standards::{Standards, builtin_profile_text};

use crate::cli::{ConvertArgs, OutputFormatArg};
use crate::summary::apply_table_style;
use crate::types::{ConvertResult, OutputFormat};

/// Table of the supported source kinds.
pub fn kinds_table() -> Result<Table> {
    let standards = Standards::builtin().context("load rule profiles")?;
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Column families", "Description"]);
    apply_table_style(&mut table);
    for kind in SourceKind::ALL {
        let families = standards
            .profile(kind)
            .map(|profile| profile.family_names().join(", "))
            .unwrap_or_default();
        table.add_row(vec![
            kind.to_string(),
            families,
            adapter_for(kind).description().to_string(),
        ]);
    }
    Ok(table)
}

pub fn run_kinds() -> Result<()> {
    println!("{}", kinds_table()?);
    Ok(())
}

pub fn run_profile(kind: SourceKind) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(builtin_profile_text(kind).as_bytes())
        .context("write profile")?;
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let _span = info_span!("request", kind = %args.kind).entered();
    let format = resolve_format(args.format, args.output.as_deref());

    let mut standards = Standards::builtin().context("load rule profiles")?;
    if let Some(path) = &args.profile {
        standards = standards
            .with_profile_file(path)
            .with_context(|| format!("load profile {}", path.display()))?;
    }

    let blobs = read_documents(&args.files)?;
    let views: Vec<&[u8]> = blobs.iter().map(Vec::as_slice).collect();
    let conversion = Converter::new(&standards)
        .convert(args.kind, &views)
        .with_context(|| format!("convert {} document(s) as {}", views.len(), args.kind))?;

    let invariants = args
        .check
        .then(|| regmap_validate::check(&conversion.records));

    match (&args.output, format) {
        (Some(path), OutputFormat::Csv) => write_csv(&conversion.records, path)?,
        (Some(path), OutputFormat::Json) => {
            let file =
                fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_json(&conversion.records, io::BufWriter::new(file))
                .with_context(|| format!("write {}", path.display()))?;
        }
        (None, _) => write_json(&conversion.records, io::stdout().lock())?,
    }
    info!(
        records = conversion.records.len(),
        warnings = conversion.warnings.len(),
        "request finished"
    );

    Ok(ConvertResult {
        kind: args.kind,
        documents: args.files.clone(),
        records: conversion.records,
        warnings: conversion.warnings,
        output: args.output.clone(),
        format,
        invariants,
    })
}

/// Explicit flag wins, then the output extension; stdout is always JSON.
pub fn resolve_format(flag: Option<OutputFormatArg>, output: Option<&Path>) -> OutputFormat {
    match flag {
        Some(OutputFormatArg::Csv) if output.is_some() => OutputFormat::Csv,
        Some(_) => OutputFormat::Json,
        None => match output.and_then(Path::extension).and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        },
    }
}

fn read_documents(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| fs::read(path).with_context(|| format!("read {}", path.display())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_flag_then_extension() {
        let csv = Path::new("out/params.CSV");
        assert_eq!(resolve_format(None, Some(csv)), OutputFormat::Csv);
        assert_eq!(
            resolve_format(Some(OutputFormatArg::Json), Some(csv)),
            OutputFormat::Json
        );
        assert_eq!(
            resolve_format(Some(OutputFormatArg::Csv), Some(Path::new("params.out"))),
            OutputFormat::Csv
        );
        assert_eq!(resolve_format(None, Some(Path::new("p.json"))), OutputFormat::Json);
        assert_eq!(resolve_format(Some(OutputFormatArg::Csv), None), OutputFormat::Json);
    }
}
