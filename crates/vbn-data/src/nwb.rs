//! NWB content readers (requires the `nwb` feature and a system HDF5 library)

use hdf5::File as H5File;
use std::path::Path;
use vbn_core::{VbnError, VbnResult};

/// Dataset listing the unit ids of the units table
const UNIT_IDS_DATASET: &str = "units/id";

fn parse_error(path: &Path, what: &str, err: hdf5::Error) -> VbnError {
    VbnError::MalformedSession {
        path: path.to_path_buf(),
        reason: format!("{}: {}", what, err),
    }
}

fn open(path: &Path) -> VbnResult<H5File> {
    H5File::open(path).map_err(|e| parse_error(path, "failed to open NWB file", e))
}

/// Root `nwb_version` attribute
pub(crate) fn read_nwb_version(path: &Path) -> VbnResult<String> {
    let file = open(path)?;
    let version = file
        .attr("nwb_version")
        .map_err(|e| parse_error(path, "missing nwb_version", e))?
        .read_scalar::<hdf5::types::VarLenUnicode>()
        .map_err(|e| parse_error(path, "failed to read nwb_version", e))?;

    tracing::debug!(path = %path.display(), version = %version, "NWB version");
    Ok(version.as_str().to_string())
}

/// Identifiers of the sorted units recorded in the session
pub(crate) fn read_unit_ids(path: &Path) -> VbnResult<Vec<i64>> {
    let file = open(path)?;
    let ids = file
        .dataset(UNIT_IDS_DATASET)
        .map_err(|e| parse_error(path, "missing units table", e))?
        .read_raw::<i64>()
        .map_err(|e| parse_error(path, "failed to read unit ids", e))?;

    tracing::debug!(path = %path.display(), units = ids.len(), "read unit ids");
    Ok(ids)
}

/// `session_start_time` as stored (ISO 8601 text)
pub(crate) fn read_session_start_time(path: &Path) -> VbnResult<String> {
    let file = open(path)?;
    let start = file
        .dataset("session_start_time")
        .map_err(|e| parse_error(path, "missing session_start_time", e))?
        .read_scalar::<hdf5::types::VarLenUnicode>()
        .map_err(|e| parse_error(path, "failed to read session_start_time", e))?;

    Ok(start.as_str().to_string())
}
