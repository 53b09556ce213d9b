use crate::cli::CellsArgs;
use crate::output;
use vbn_core::DataConfig;
use vbn_data::{
    cell_counts, print_number_of_cells, ExperimentDatasetSource, NwbDatasetSource,
    UnitsTableSource,
};

pub fn execute(args: CellsArgs, data: &DataConfig) -> anyhow::Result<()> {
    if args.from_nwb {
        report(&NwbDatasetSource::new(data.clone()), &args)
    } else {
        report(&UnitsTableSource::load(data)?, &args)
    }
}

fn report<S: ExperimentDatasetSource>(source: &S, args: &CellsArgs) -> anyhow::Result<()> {
    if args.json {
        let counts = cell_counts(source, &args.ids)?;
        return output::write_output(&output::to_json(&counts, false)?, None);
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    print_number_of_cells(source, &args.ids, &mut handle)?;
    Ok(())
}
