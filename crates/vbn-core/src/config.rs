//! Data directory configuration
//!
//! Replaces hard-coded cache locations with an explicit value that is passed
//! to every accessor, so tests can point it at a temporary directory.

use crate::error::{VbnError, VbnResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Subdirectory holding one folder per session
pub const SESSION_SUBDIR: &str = "behavior_ecephys_sessions";

/// Subdirectory holding the project metadata tables
pub const METADATA_SUBDIR: &str = "project_metadata";

/// Locations of session files and metadata tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory containing `<id>/ecephys_session_<id>.nwb`
    pub session_dir: PathBuf,
    /// Directory containing `<table>.csv`
    pub metadata_dir: PathBuf,
}

impl DataConfig {
    /// Create configuration from explicit directories
    pub fn new(session_dir: impl Into<PathBuf>, metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: session_dir.into(),
            metadata_dir: metadata_dir.into(),
        }
    }

    /// Standard layout under a single data root
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join(SESSION_SUBDIR), root.join(METADATA_SUBDIR))
    }

    /// Path of the NWB file for a session
    pub fn session_file(&self, session_id: impl std::fmt::Display) -> PathBuf {
        let id = session_id.to_string();
        self.session_dir
            .join(&id)
            .join(format!("ecephys_session_{}.nwb", id))
    }

    /// Path of a metadata table
    pub fn metadata_file(&self, table_name: &str) -> PathBuf {
        self.metadata_dir.join(format!("{}.csv", table_name))
    }

    /// Validate configuration
    pub fn validate(&self) -> VbnResult<()> {
        if self.session_dir.as_os_str().is_empty() {
            return Err(VbnError::ConfigurationError {
                message: "Session directory cannot be empty".to_string(),
            });
        }

        if self.metadata_dir.as_os_str().is_empty() {
            return Err(VbnError::ConfigurationError {
                message: "Metadata directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> VbnResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> VbnResult<Self> {
        let config: DataConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> VbnResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| VbnError::io(path, e))?;
        tracing::debug!(path = %path.display(), "loaded data configuration");
        Self::from_json(&json)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::from_root("data/visual-behavior-neuropixels")
    }
}
