use std::io::Write;

use anyhow::{Context, Result};

use regmap_model::ParameterRecord;

pub fn records_to_json(records: &[ParameterRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("serialize records")
}

/// Writes the records as one pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[ParameterRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).context("serialize records")?;
    writeln!(writer).context("write records")?;
    writer.flush().context("flush records")?;
    Ok(())
}
