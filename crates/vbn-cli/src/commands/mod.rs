pub mod baseline;
pub mod cells;
pub mod process;
pub mod session;
pub mod smooth;
pub mod table;

use crate::cli::InputArgs;
use anyhow::Context;
use vbn_core::ResponseVector;
use vbn_data::MetadataTable;

/// Read the requested column of the input CSV as a response vector
pub(crate) fn read_response(input: &InputArgs) -> anyhow::Result<ResponseVector> {
    let table = MetadataTable::read_csv(&input.input)
        .with_context(|| format!("reading {}", input.input.display()))?;
    let samples = table
        .column_values::<f64>(&input.column)
        .with_context(|| format!("reading column '{}'", input.column))?;

    tracing::info!(
        input = %input.input.display(),
        column = %input.column,
        samples = samples.len(),
        "loaded response"
    );
    Ok(ResponseVector::new(samples).with_label(input.column.clone()))
}
