//! Cell-count reporting

use crate::dataset::{CellSpecimens, ExperimentDatasetSource};
use serde::Serialize;
use std::io::Write;
use vbn_core::{SessionId, VbnError, VbnResult};

/// Number of cells recorded in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellCount {
    pub session_id: SessionId,
    pub cells: usize,
}

fn count_cells<S>(source: &S, session_id: SessionId) -> VbnResult<CellCount>
where
    S: ExperimentDatasetSource + ?Sized,
{
    let dataset = source.get_experiment_data(session_id)?;
    Ok(CellCount {
        session_id,
        cells: dataset.cell_count()?,
    })
}

/// Count cells for every session, stopping at the first failure
pub fn cell_counts<S>(source: &S, session_ids: &[SessionId]) -> VbnResult<Vec<CellCount>>
where
    S: ExperimentDatasetSource + ?Sized,
{
    session_ids
        .iter()
        .map(|&session_id| count_cells(source, session_id))
        .collect()
}

/// Write one line per session in request order
///
/// Lines for sessions before a failing one are already written when the
/// error is returned.
pub fn print_number_of_cells<S, W>(
    source: &S,
    session_ids: &[SessionId],
    out: &mut W,
) -> VbnResult<()>
where
    S: ExperimentDatasetSource + ?Sized,
    W: Write + ?Sized,
{
    for &session_id in session_ids {
        let count = count_cells(source, session_id)?;
        writeln!(
            out,
            "The number of cells in session {} is {}",
            count.session_id, count.cells
        )
        .map_err(|source| VbnError::Output { source })?;

        tracing::debug!(session_id = %session_id, cells = count.cells, "reported cell count");
    }

    Ok(())
}
