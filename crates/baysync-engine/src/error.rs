//! Error types for baysync-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The location text carried no resource marker followed by a number.
    #[error("Malformed location: no resource tag in {location:?}")]
    MalformedLocation { location: String },

    /// The resource marker word cannot be turned into a tag pattern.
    #[error("Invalid resource marker: {0}")]
    InvalidMarker(String),

    /// The feed or the local store could not be queried, or answered with
    /// data that could not be decoded. Never to be read as "no events".
    #[error("Remote query failed: {0}")]
    RemoteQuery(String),

    /// The local store refused or failed a create call.
    #[error("Create failed for {label:?}: {message}")]
    CreateFailure { label: String, message: String },

    #[error("Invalid interval: end {end} is before start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Convenience alias used throughout baysync-engine.
pub type Result<T> = std::result::Result<T, SyncError>;
