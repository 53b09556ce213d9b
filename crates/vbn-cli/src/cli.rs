use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vbn_core::DataConfig;
use vbn_processing::{BoundaryMode, ConvolutionMethod};

#[derive(Parser)]
#[command(
    name = "vbn",
    version,
    about = "Visual Behavior Neuropixels data access and response smoothing",
    long_about = "Smooth and baseline-correct response vectors, read project metadata tables,\n\
                  open session NWB files and report cell counts.\n\
                  Data paths come from --data-root, --data-config or $VBN_DATA_ROOT."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub data: DataArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Smooth a response column with an exponential kernel
    Smooth(SmoothArgs),
    /// Subtract the mean of a baseline window from a response column
    Baseline(BaselineArgs),
    /// Run a processing configuration (JSON) over a response column
    Process(ProcessArgs),
    /// Print a project metadata table
    Table(TableArgs),
    /// Open a session file and describe it
    Session(SessionArgs),
    /// Report the number of cells recorded in each session
    Cells(CellsArgs),
}

#[derive(Args)]
pub struct DataArgs {
    /// Data root containing behavior_ecephys_sessions/ and project_metadata/
    #[arg(long, env = "VBN_DATA_ROOT", global = true)]
    pub data_root: Option<PathBuf>,

    /// Data configuration JSON with session_dir and metadata_dir (overrides --data-root)
    #[arg(long, env = "VBN_CONFIG", global = true)]
    pub data_config: Option<PathBuf>,
}

impl DataArgs {
    pub fn resolve(&self) -> anyhow::Result<DataConfig> {
        let config = match (&self.data_config, &self.data_root) {
            (Some(path), _) => DataConfig::from_file(path)
                .with_context(|| format!("loading data configuration {}", path.display()))?,
            (None, Some(root)) => DataConfig::from_root(root),
            (None, None) => DataConfig::default(),
        };

        config.validate()?;
        tracing::debug!(
            session_dir = %config.session_dir.display(),
            metadata_dir = %config.metadata_dir.display(),
            "data configuration"
        );
        Ok(config)
    }
}

#[derive(Args)]
pub struct InputArgs {
    /// CSV file with a header row
    #[arg(long)]
    pub input: PathBuf,

    /// Column holding the response vector
    #[arg(long)]
    pub column: String,

    /// Write the result CSV here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SmoothArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Decay constant in samples
    #[arg(long, default_value_t = 1.0)]
    pub tau: f64,

    /// Two-sided kernel centred on each sample
    #[arg(long)]
    pub symmetrical: bool,

    /// Edge handling: zero, reflect, nearest or wrap
    #[arg(long, default_value_t = BoundaryMode::Zero)]
    pub boundary: BoundaryMode,

    /// Convolution method: direct, fft or auto
    #[arg(long, default_value_t = ConvolutionMethod::Direct)]
    pub method: ConvolutionMethod,
}

#[derive(Args)]
pub struct BaselineArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// First sample of the baseline window
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// One past the last sample of the baseline window
    #[arg(long, default_value_t = 20)]
    pub end: usize,
}

#[derive(Args)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Processing configuration JSON
    #[arg(long)]
    pub config: PathBuf,

    /// Sampling rate of the response in Hz
    #[arg(long)]
    pub sampling_rate: Option<f64>,
}

#[derive(Args)]
pub struct TableArgs {
    /// Table name: ecephys_sessions (or sessions), channels, probes, units, or any CSV stem
    pub name: String,

    /// Only print the first N rows
    #[arg(long)]
    pub head: Option<usize>,

    /// Output JSON instead of CSV
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SessionArgs {
    /// Session id (e.g. 1053941483)
    pub id: vbn_core::SessionId,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CellsArgs {
    /// Session ids, reported in the order given
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<vbn_core::SessionId>,

    /// Read unit ids from session NWB files instead of the units table
    #[arg(long)]
    pub from_nwb: bool,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
