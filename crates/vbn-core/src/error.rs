//! Error handling for the VBN toolkit
//!
//! One error type for every crate in the workspace. Variants carry the
//! context needed to explain a failure without a backtrace.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for VBN toolkit operations
pub type VbnResult<T> = Result<T, VbnError>;

/// Error type for all toolkit operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VbnError {
    /// Decay constant is zero, negative, non-finite or too small for a kernel
    #[error("Invalid tau {tau}: must be finite with 10 * tau >= 0.5")]
    InvalidTau {
        /// Offending decay constant
        tau: f64,
    },

    /// Baseline window selects no samples
    #[error("Empty baseline window [{start}, {end})")]
    EmptyWindow {
        /// Inclusive start index
        start: usize,
        /// Exclusive end index
        end: usize,
    },

    /// Baseline window extends past the end of the vector
    #[error("Baseline window [{start}, {end}) out of range for vector of length {len}")]
    WindowOutOfRange {
        /// Inclusive start index
        start: usize,
        /// Exclusive end index
        end: usize,
        /// Length of the response vector
        len: usize,
    },

    /// Invalid processing or data configuration
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem
        message: String,
    },

    /// Failure inside a processing stage
    #[error("Processing error: {message}")]
    ProcessingError {
        /// Description of the processing failure
        message: String,
    },

    /// Required file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// I/O failure while reading or writing a file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Writing a report or result to its output stream failed
    #[error("Failed to write output: {source}")]
    Output {
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Metadata table could not be parsed or lacks an expected column
    #[error("Malformed table {}: {reason}", path.display())]
    MalformedTable {
        /// Table file
        path: PathBuf,
        /// Parser or lookup failure
        reason: String,
    },

    /// Session file exists but is not a readable NWB/HDF5 container
    #[error("Malformed session file {}: {reason}", path.display())]
    MalformedSession {
        /// Session file
        path: PathBuf,
        /// Description of the problem
        reason: String,
    },

    /// No data is known for the requested session
    #[error("Session {session_id} not found")]
    SessionNotFound {
        /// Requested session identifier
        session_id: u64,
    },

    /// Identifier text is not a valid session id
    #[error("Invalid session id '{input}'")]
    InvalidSessionId {
        /// Text that failed to parse
        input: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError {
        /// Serializer message
        reason: String,
    },

    /// Operation needs a cargo feature that was not compiled in
    #[error("Unsupported operation: rebuild with the '{feature}' feature enabled")]
    FeatureDisabled {
        /// Name of the missing cargo feature
        feature: &'static str,
    },
}

impl VbnError {
    /// Build an I/O error, mapping `NotFound` to [`VbnError::FileNotFound`]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            VbnError::FileNotFound { path }
        } else {
            VbnError::Io { path, source }
        }
    }
}

impl From<serde_json::Error> for VbnError {
    fn from(err: serde_json::Error) -> Self {
        VbnError::SerializationError {
            reason: err.to_string(),
        }
    }
}
