//! End-to-end access to a data directory laid out on disk

use std::fs;
use std::io::Write;
use std::path::Path;
use vbn_core::{DataConfig, SessionId, VbnError};
use vbn_data::session::HDF5_SIGNATURE;
use vbn_data::{
    get_metadata_table, get_probes_table, get_session, get_session_table, get_units_table,
    print_number_of_cells, write_metadata_table, MetadataTable, NwbDatasetSource,
    UnitsTableSource,
};

const SESSIONS_CSV: &str = "\
ecephys_session_id,behavior_session_id,genotype,session_type,project_code
1044385384,1044408432,wt/wt,EPHYS_1_images_G_3uL_reward,NeuropixelVisualBehavior
1053941483,1053960987,\"Sst-IRES-Cre/wt;Ai32(RCL-ChR2(H134R)_EYFP)/wt\",\
    EPHYS_1_images_H_3uL_reward,NeuropixelVisualBehavior
";

const UNITS_CSV: &str = "\
unit_id,ecephys_session_id,ecephys_probe_id,quality
1157005856,1044385384,1044506933,good
1157005853,1044385384,1044506933,good
1157001834,1053941483,1054059290,noise
";

fn data_root() -> (tempfile::TempDir, DataConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = DataConfig::from_root(dir.path());
    fs::create_dir_all(&config.metadata_dir).unwrap();
    fs::write(config.metadata_file("ecephys_sessions"), SESSIONS_CSV).unwrap();
    fs::write(config.metadata_file("units"), UNITS_CSV).unwrap();
    (dir, config)
}

fn write_session(config: &DataConfig, id: u64) {
    let path = config.session_file(id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(&HDF5_SIGNATURE).unwrap();
    file.write_all(&[0u8; 128]).unwrap();
}

#[test]
fn session_table_reads_quoted_fields() {
    let (_dir, config) = data_root();
    let sessions = get_session_table(&config).unwrap();

    assert_eq!(sessions.name(), "ecephys_sessions");
    assert_eq!(sessions.len(), 2);
    assert_eq!(
        sessions.session_ids().unwrap(),
        vec![SessionId(1044385384), SessionId(1053941483)]
    );
    assert_eq!(
        sessions.get(1, "genotype"),
        Some("Sst-IRES-Cre/wt;Ai32(RCL-ChR2(H134R)_EYFP)/wt")
    );
}

#[test]
fn missing_table_is_file_not_found() {
    let (_dir, config) = data_root();
    assert!(matches!(
        get_probes_table(&config),
        Err(VbnError::FileNotFound { .. })
    ));
}

#[test]
fn ragged_table_is_malformed() {
    let (_dir, config) = data_root();
    fs::write(config.metadata_file("channels"), "a,b\n1,2\n3\n").unwrap();

    assert!(matches!(
        get_metadata_table(&config, "channels"),
        Err(VbnError::MalformedTable { .. })
    ));
}

#[test]
fn written_table_reads_back() {
    let (_dir, config) = data_root();
    let units = get_units_table(&config).unwrap();
    let good = units.filter_eq("quality", "good").unwrap();

    let renamed = MetadataTable::new("good_units", good.headers().to_vec(), good.rows().to_vec())
        .unwrap();
    let path = write_metadata_table(&config, &renamed).unwrap();
    assert!(Path::new(&path).exists());

    let reread = get_metadata_table(&config, "good_units").unwrap();
    assert_eq!(reread.headers(), units.headers());
    assert_eq!(reread.rows(), good.rows());
}

#[test]
fn get_session_resolves_standard_layout() {
    let (_dir, config) = data_root();
    write_session(&config, 1053941483);

    let session = get_session(&config, 1053941483u64).unwrap();
    assert_eq!(session.id(), SessionId(1053941483));
    assert_eq!(session.path(), config.session_file(1053941483u64));
    assert_eq!(session.file_size(), 136);

    assert!(matches!(
        get_session(&config, 1044385384u64),
        Err(VbnError::FileNotFound { .. })
    ));
}

#[test]
fn cell_report_from_units_table() {
    let (_dir, config) = data_root();
    let source = UnitsTableSource::load(&config).unwrap();

    let mut out = Vec::new();
    print_number_of_cells(
        &source,
        &[SessionId(1053941483), SessionId(1044385384)],
        &mut out,
    )
    .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The number of cells in session 1053941483 is 1\n\
         The number of cells in session 1044385384 is 2\n"
    );
}

#[test]
fn cell_report_counts_session_without_units() {
    let (_dir, config) = data_root();
    let mut sessions = fs::OpenOptions::new()
        .append(true)
        .open(config.metadata_file("ecephys_sessions"))
        .unwrap();
    writeln!(
        sessions,
        "1064400234,1064415305,wt/wt,EPHYS_1_images_G_3uL_reward,NeuropixelVisualBehavior"
    )
    .unwrap();
    drop(sessions);

    let source = UnitsTableSource::load(&config).unwrap();
    let mut out = Vec::new();
    print_number_of_cells(&source, &[SessionId(1064400234)], &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The number of cells in session 1064400234 is 0\n"
    );
}

#[test]
fn cell_report_without_sessions_table() {
    let (_dir, config) = data_root();
    fs::remove_file(config.metadata_file("ecephys_sessions")).unwrap();

    let source = UnitsTableSource::load(&config).unwrap();
    assert_eq!(
        source.session_ids(),
        vec![SessionId(1044385384), SessionId(1053941483)]
    );
}

#[test]
fn cell_report_stops_at_unknown_session() {
    let (_dir, config) = data_root();
    let source = UnitsTableSource::load(&config).unwrap();

    let mut out = Vec::new();
    let result = print_number_of_cells(&source, &[SessionId(1044385384), SessionId(1)], &mut out);

    assert!(matches!(result, Err(VbnError::SessionNotFound { session_id: 1 })));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The number of cells in session 1044385384 is 2\n"
    );
}

#[cfg(not(feature = "nwb"))]
#[test]
fn nwb_source_needs_feature_for_unit_ids() {
    let (_dir, config) = data_root();
    write_session(&config, 1044385384);
    let source = NwbDatasetSource::new(config);

    let mut out = Vec::new();
    let result = print_number_of_cells(&source, &[SessionId(1044385384)], &mut out);
    assert!(matches!(result, Err(VbnError::FeatureDisabled { .. })));
    assert!(out.is_empty());
}
