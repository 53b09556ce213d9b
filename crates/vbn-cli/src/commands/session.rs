use crate::cli::SessionArgs;
use crate::output;
use serde::Serialize;
use vbn_core::DataConfig;
use vbn_data::get_session;

#[derive(Serialize)]
struct SessionOutput {
    session_id: u64,
    path: String,
    file_size: u64,
    superblock_offset: u64,
    nwb_version: Option<String>,
    session_start_time: Option<String>,
    units: Option<usize>,
}

pub fn execute(args: SessionArgs, data: &DataConfig) -> anyhow::Result<()> {
    let session = get_session(data, args.id)?;

    // Content fields need the nwb feature; report them as missing otherwise
    let info = SessionOutput {
        session_id: session.id().value(),
        path: session.path().display().to_string(),
        file_size: session.file_size(),
        superblock_offset: session.superblock_offset(),
        nwb_version: session.nwb_version().ok(),
        session_start_time: session.session_start_time().ok(),
        units: session.unit_ids().ok().map(|ids| ids.len()),
    };

    if args.json {
        return output::write_output(&output::to_json(&info, false)?, None);
    }

    println!("Session {}", info.session_id);
    println!("File: {} ({} bytes)", info.path, info.file_size);
    if info.superblock_offset > 0 {
        println!("HDF5 superblock at offset {}", info.superblock_offset);
    }
    if let Some(version) = &info.nwb_version {
        println!("NWB version: {}", version);
    }
    if let Some(start) = &info.session_start_time {
        println!("Session start: {}", start);
    }
    if let Some(units) = info.units {
        println!("Units: {}", units);
    }
    Ok(())
}
