//! Session file access
//!
//! A session is opened lazily: [`get_session`] resolves the NWB path and
//! verifies the HDF5 signature, content is read only when asked for.

use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use vbn_core::{DataConfig, SessionId, VbnError, VbnResult};

/// Format signature at the start of an HDF5 superblock
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'];

/// First user-block offset after zero; later candidates double
const FIRST_USER_BLOCK_OFFSET: u64 = 512;

/// Opens the session stored at a path
pub trait SessionLoader {
    type Session;

    fn load(&self, session_id: SessionId, path: &Path) -> VbnResult<Self::Session>;
}

/// Loader for NWB files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct NwbSessionLoader;

impl SessionLoader for NwbSessionLoader {
    type Session = EcephysSession;

    fn load(&self, session_id: SessionId, path: &Path) -> VbnResult<EcephysSession> {
        EcephysSession::open(session_id, path)
    }
}

/// Handle to one recorded session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcephysSession {
    id: SessionId,
    path: PathBuf,
    file_size: u64,
    superblock_offset: u64,
}

impl EcephysSession {
    /// Open a session file and check that it is an HDF5 container
    pub fn open(id: SessionId, path: impl Into<PathBuf>) -> VbnResult<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| VbnError::io(&path, e))?;

        if !metadata.is_file() {
            return Err(VbnError::MalformedSession {
                path,
                reason: "not a regular file".to_string(),
            });
        }

        let file_size = metadata.len();
        let superblock_offset = find_superblock(&path, file_size)?.ok_or_else(|| {
            VbnError::MalformedSession {
                path: path.clone(),
                reason: "missing HDF5 signature".to_string(),
            }
        })?;

        tracing::info!(
            session_id = %id,
            path = %path.display(),
            bytes = file_size,
            "opened session"
        );

        Ok(EcephysSession {
            id,
            path,
            file_size,
            superblock_offset,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the NWB file in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Byte offset of the HDF5 superblock (non-zero when a user block is present)
    pub fn superblock_offset(&self) -> u64 {
        self.superblock_offset
    }

    #[cfg(feature = "nwb")]
    pub fn nwb_version(&self) -> VbnResult<String> {
        crate::nwb::read_nwb_version(&self.path)
    }

    #[cfg(not(feature = "nwb"))]
    pub fn nwb_version(&self) -> VbnResult<String> {
        Err(VbnError::FeatureDisabled { feature: "nwb" })
    }

    /// Identifiers of the sorted units in the session
    #[cfg(feature = "nwb")]
    pub fn unit_ids(&self) -> VbnResult<Vec<i64>> {
        crate::nwb::read_unit_ids(&self.path)
    }

    #[cfg(not(feature = "nwb"))]
    pub fn unit_ids(&self) -> VbnResult<Vec<i64>> {
        Err(VbnError::FeatureDisabled { feature: "nwb" })
    }

    #[cfg(feature = "nwb")]
    pub fn session_start_time(&self) -> VbnResult<String> {
        crate::nwb::read_session_start_time(&self.path)
    }

    #[cfg(not(feature = "nwb"))]
    pub fn session_start_time(&self) -> VbnResult<String> {
        Err(VbnError::FeatureDisabled { feature: "nwb" })
    }
}

/// Locate the HDF5 signature at offset 0, 512, 1024, 2048, ...
fn find_superblock(path: &Path, file_size: u64) -> VbnResult<Option<u64>> {
    let mut file = File::open(path).map_err(|e| VbnError::io(path, e))?;
    let mut signature = [0u8; HDF5_SIGNATURE.len()];
    let width = HDF5_SIGNATURE.len() as u64;

    let mut offset = 0u64;
    while offset + width <= file_size {
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(&mut signature))
            .map_err(|e| VbnError::io(path, e))?;

        if signature == HDF5_SIGNATURE {
            return Ok(Some(offset));
        }

        offset = if offset == 0 {
            FIRST_USER_BLOCK_OFFSET
        } else {
            offset * 2
        };
    }

    Ok(None)
}

/// Resolve and open a session through a custom loader
pub fn get_session_with<L: SessionLoader>(
    loader: &L,
    config: &DataConfig,
    session_id: impl Into<SessionId>,
) -> VbnResult<L::Session> {
    let session_id = session_id.into();
    let path = config.session_file(session_id);

    tracing::debug!(session_id = %session_id, path = %path.display(), "resolving session");
    loader.load(session_id, &path)
}

/// Open `<session_dir>/<id>/ecephys_session_<id>.nwb`
pub fn get_session(
    config: &DataConfig,
    session_id: impl Into<SessionId>,
) -> VbnResult<EcephysSession> {
    get_session_with(&NwbSessionLoader, config, session_id)
}
