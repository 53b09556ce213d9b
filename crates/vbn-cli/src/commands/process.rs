use crate::cli::ProcessArgs;
use crate::output;
use anyhow::Context;
use vbn_processing::ProcessingConfig;

pub fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    let config = ProcessingConfig::from_file(&args.config)
        .with_context(|| format!("loading processing configuration {}", args.config.display()))?;

    let mut response = super::read_response(&args.input)?;
    if let Some(rate) = args.sampling_rate {
        response = response.with_sampling_rate(rate)?;
    }

    let mut pipeline = config.build_pipeline()?;
    let result = pipeline.process(&response)?;

    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
    for metrics in &result.metrics {
        tracing::debug!(
            stage = %metrics.processor,
            micros = metrics.processing_time_us,
            success = metrics.success,
            "stage finished"
        );
    }
    tracing::info!(
        pipeline = %pipeline.name(),
        stages = pipeline.len(),
        micros = result.total_time_us,
        "pipeline finished"
    );

    output::write_response(&result.output, &args.input.column, args.input.output.as_deref())
}
