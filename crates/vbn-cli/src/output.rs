use anyhow::Context;
use std::io::Write;
use std::path::Path;
use vbn_core::ResponseVector;
use vbn_data::MetadataTable;

/// Writer for stdout or a file
fn open_output(output_path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// Write JSON string to stdout or a file.
pub fn write_output(json: &str, output_path: Option<&Path>) -> anyhow::Result<()> {
    let mut out = open_output(output_path)?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("JSON serialization failed")
}

/// Write a response as a two-column CSV: sample index (or time) and value
pub fn write_response(
    response: &ResponseVector,
    column: &str,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(open_output(output_path)?);
    let index_header = if response.sampling_rate.is_some() {
        "time"
    } else {
        "sample"
    };
    writer.write_record([index_header, column])?;

    for (time, value) in response.time_vector().iter().zip(&response.samples) {
        writer.write_record([time.to_string(), value.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a metadata table as CSV to stdout
pub fn write_table(table: &MetadataTable) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
