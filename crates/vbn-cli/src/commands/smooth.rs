use crate::cli::SmoothArgs;
use crate::output;
use vbn_processing::{ExponentialSmoother, SmoothingConfig};

pub fn execute(args: SmoothArgs) -> anyhow::Result<()> {
    let response = super::read_response(&args.input)?;

    let settings = SmoothingConfig {
        tau: args.tau,
        symmetrical: args.symmetrical,
        boundary: args.boundary,
        method: args.method,
    };
    let smoother = ExponentialSmoother::new(settings)?;
    let smoothed = smoother.smooth(response.as_slice())?;

    tracing::info!(
        taps = smoother.kernel().len(),
        boundary = %args.boundary,
        "smoothed response"
    );

    output::write_response(
        &response.with_samples(smoothed),
        &args.input.column,
        args.input.output.as_deref(),
    )
}
