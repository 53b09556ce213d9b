//! Per-session datasets exposing their recorded cells

use crate::metadata::{
    get_session_table, get_units_table, MetadataTable, SESSION_ID_COLUMN, UNIT_ID_COLUMN,
};
use crate::session::{get_session, EcephysSession};
use serde::Serialize;
use std::collections::BTreeMap;
use vbn_core::{DataConfig, SessionId, VbnError, VbnResult};

/// Dataset that knows which cells were recorded
pub trait CellSpecimens {
    fn cell_specimen_ids(&self) -> VbnResult<Vec<i64>>;

    fn cell_count(&self) -> VbnResult<usize> {
        Ok(self.cell_specimen_ids()?.len())
    }
}

/// Source of per-session datasets
pub trait ExperimentDatasetSource {
    type Dataset: CellSpecimens;

    fn get_experiment_data(&self, session_id: SessionId) -> VbnResult<Self::Dataset>;
}

/// Units recorded in one session, taken from the units table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSet {
    pub session_id: SessionId,
    pub unit_ids: Vec<i64>,
}

impl CellSpecimens for UnitSet {
    fn cell_specimen_ids(&self) -> VbnResult<Vec<i64>> {
        Ok(self.unit_ids.clone())
    }

    fn cell_count(&self) -> VbnResult<usize> {
        Ok(self.unit_ids.len())
    }
}

/// Dataset source backed by the `units` metadata table
#[derive(Debug, Clone, Default)]
pub struct UnitsTableSource {
    units_by_session: BTreeMap<SessionId, Vec<i64>>,
}

impl UnitsTableSource {
    /// Group unit ids by session
    pub fn from_table(table: &MetadataTable) -> VbnResult<Self> {
        let session_ids = table.column_values::<SessionId>(SESSION_ID_COLUMN)?;
        let unit_ids = table.column_values::<i64>(UNIT_ID_COLUMN)?;

        let mut units_by_session: BTreeMap<SessionId, Vec<i64>> = BTreeMap::new();
        for (session_id, unit_id) in session_ids.into_iter().zip(unit_ids) {
            units_by_session.entry(session_id).or_default().push(unit_id);
        }

        tracing::debug!(
            sessions = units_by_session.len(),
            units = table.len(),
            "indexed units table"
        );

        Ok(UnitsTableSource { units_by_session })
    }

    /// Register every session in the sessions table, including ones with no units
    pub fn with_sessions(mut self, sessions: &MetadataTable) -> VbnResult<Self> {
        for session_id in sessions.session_ids()? {
            self.units_by_session.entry(session_id).or_default();
        }
        Ok(self)
    }

    /// Read the units table and, when present, the sessions table
    pub fn load(config: &DataConfig) -> VbnResult<Self> {
        let source = Self::from_table(&get_units_table(config)?)?;

        match get_session_table(config) {
            Ok(sessions) => source.with_sessions(&sessions),
            Err(VbnError::FileNotFound { path }) => {
                tracing::debug!(
                    path = %path.display(),
                    "no sessions table, only sessions with units are known"
                );
                Ok(source)
            }
            Err(e) => Err(e),
        }
    }

    /// Known sessions, ascending
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.units_by_session.keys().copied().collect()
    }
}

impl ExperimentDatasetSource for UnitsTableSource {
    type Dataset = UnitSet;

    fn get_experiment_data(&self, session_id: SessionId) -> VbnResult<UnitSet> {
        self.units_by_session
            .get(&session_id)
            .map(|unit_ids| UnitSet {
                session_id,
                unit_ids: unit_ids.clone(),
            })
            .ok_or(VbnError::SessionNotFound {
                session_id: session_id.value(),
            })
    }
}

impl CellSpecimens for EcephysSession {
    fn cell_specimen_ids(&self) -> VbnResult<Vec<i64>> {
        self.unit_ids()
    }
}

/// Dataset source that opens each session's NWB file
#[derive(Debug, Clone)]
pub struct NwbDatasetSource {
    config: DataConfig,
}

impl NwbDatasetSource {
    pub fn new(config: DataConfig) -> Self {
        NwbDatasetSource { config }
    }
}

impl ExperimentDatasetSource for NwbDatasetSource {
    type Dataset = EcephysSession;

    fn get_experiment_data(&self, session_id: SessionId) -> VbnResult<EcephysSession> {
        get_session(&self.config, session_id).map_err(|e| match e {
            VbnError::FileNotFound { .. } => VbnError::SessionNotFound {
                session_id: session_id.value(),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units_table() -> MetadataTable {
        let row = |session: &str, unit: &str| vec![session.to_string(), unit.to_string()];
        MetadataTable::new(
            "units",
            vec![SESSION_ID_COLUMN.to_string(), UNIT_ID_COLUMN.to_string()],
            vec![row("10", "1"), row("10", "2"), row("20", "3"), row("10", "4")],
        )
        .unwrap()
    }

    #[test]
    fn test_units_grouped_by_session() {
        let source = UnitsTableSource::from_table(&units_table()).unwrap();
        assert_eq!(source.session_ids(), vec![SessionId(10), SessionId(20)]);

        let dataset = source.get_experiment_data(SessionId(10)).unwrap();
        assert_eq!(dataset.unit_ids, vec![1, 2, 4]);
        assert_eq!(dataset.cell_count().unwrap(), 3);
    }

    #[test]
    fn test_unknown_session() {
        let source = UnitsTableSource::from_table(&units_table()).unwrap();
        let result = source.get_experiment_data(SessionId(30));
        assert!(matches!(result, Err(VbnError::SessionNotFound { session_id: 30 })));
    }

    #[test]
    fn test_session_without_units() {
        let sessions = MetadataTable::new(
            "ecephys_sessions",
            vec![SESSION_ID_COLUMN.to_string()],
            vec![vec!["10".to_string()], vec!["30".to_string()]],
        )
        .unwrap();
        let source = UnitsTableSource::from_table(&units_table())
            .unwrap()
            .with_sessions(&sessions)
            .unwrap();

        assert_eq!(
            source.session_ids(),
            vec![SessionId(10), SessionId(20), SessionId(30)]
        );
        assert_eq!(source.get_experiment_data(SessionId(30)).unwrap().cell_count().unwrap(), 0);
        assert_eq!(source.get_experiment_data(SessionId(10)).unwrap().cell_count().unwrap(), 3);
    }

    #[test]
    fn test_missing_columns() {
        let table = MetadataTable::new("units", vec!["unit_id".to_string()], vec![]).unwrap();
        assert!(matches!(
            UnitsTableSource::from_table(&table),
            Err(VbnError::MalformedTable { .. })
        ));
    }

    #[test]
    fn test_nwb_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = NwbDatasetSource::new(DataConfig::from_root(dir.path()));
        let result = source.get_experiment_data(SessionId(99));
        assert!(matches!(result, Err(VbnError::SessionNotFound { session_id: 99 })));
    }
}
