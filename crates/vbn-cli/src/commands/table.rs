use crate::cli::TableArgs;
use crate::output;
use serde::Serialize;
use std::collections::BTreeMap;
use vbn_core::DataConfig;
use vbn_data::{get_metadata_table, MetadataKind};

#[derive(Serialize)]
struct TableOutput<'a> {
    name: &'a str,
    columns: &'a [String],
    rows: Vec<BTreeMap<&'a str, &'a str>>,
}

pub fn execute(args: TableArgs, data: &DataConfig) -> anyhow::Result<()> {
    // Short aliases resolve to the standard table files
    let table_name = match args.name.parse::<MetadataKind>() {
        Ok(kind) => kind.table_name().to_string(),
        Err(_) => args.name.clone(),
    };

    let mut table = get_metadata_table(data, &table_name)?;
    if let Some(n) = args.head {
        table = table.head(n);
    }

    if args.json {
        let rows: Vec<BTreeMap<&str, &str>> = table
            .rows()
            .iter()
            .map(|row| {
                table
                    .headers()
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect();

        let out = TableOutput {
            name: table.name(),
            columns: table.headers(),
            rows,
        };
        output::write_output(&output::to_json(&out, false)?, None)
    } else {
        output::write_table(&table)
    }
}
