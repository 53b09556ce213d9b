use crate::cli::BaselineArgs;
use crate::output;
use vbn_processing::{baseline_subtract, BaselineWindow};

pub fn execute(args: BaselineArgs) -> anyhow::Result<()> {
    let response = super::read_response(&args.input)?;
    let window = BaselineWindow::new(args.start, args.end);

    let corrected = baseline_subtract(response.as_slice(), window)?;

    output::write_response(
        &response.with_samples(corrected),
        &args.input.column,
        args.input.output.as_deref(),
    )
}
