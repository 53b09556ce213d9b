//! VBN-Data: Metadata tables, session files and cell-count reporting
//!
//! Every accessor takes a [`DataConfig`](vbn_core::DataConfig) naming the
//! session and metadata directories.

pub mod dataset;
pub mod metadata;
#[cfg(feature = "nwb")]
mod nwb;
pub mod report;
pub mod session;

pub use dataset::{
    CellSpecimens, ExperimentDatasetSource, NwbDatasetSource, UnitSet, UnitsTableSource,
};
pub use metadata::{
    get_channels_table, get_metadata_table, get_probes_table, get_session_table,
    get_standard_table, get_units_table, write_metadata_table, MetadataKind, MetadataTable,
};
pub use report::{cell_counts, print_number_of_cells, CellCount};
pub use session::{get_session, get_session_with, EcephysSession, NwbSessionLoader, SessionLoader};
