//! Error types shared by every stage of the sync pipeline.

use std::path::PathBuf;

/// Errors that can occur while syncing a channel into the news index.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// The messages request failed, returned a non-success status, or
    /// produced a body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// A message carried a timestamp that is not ISO-8601.
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Creating a directory or writing a file failed.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The existing manifest could not be parsed or serialized.
    #[error("manifest error at {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(e.to_string())
    }
}

/// Convenience result type.
pub type SyncResult<T> = Result<T, SyncError>;
