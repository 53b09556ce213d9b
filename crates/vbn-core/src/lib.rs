//! VBN-Core: Foundation types shared across the toolkit
//!
//! Error type, response vectors, session identifiers and the data-directory
//! configuration used by the processing and data crates.

pub mod config;
pub mod error;
pub mod response;
pub mod session_id;

pub use config::DataConfig;
pub use error::{VbnError, VbnResult};
pub use response::{ResponseStats, ResponseVector};
pub use session_id::SessionId;
