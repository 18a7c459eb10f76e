use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a tracking run. None of them are retried.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to enumerate files under {}: {message}", .root.display())]
    Enumeration { root: PathBuf, message: String },

    #[error("failed to stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to publish snapshot: {0}")]
    Publish(String),

    #[error("snapshot log schema version {found} does not match {expected}; refusing to modify it")]
    SchemaMismatch { found: String, expected: String },

    #[error("not a snapshot log entry id: {0}")]
    InvalidEntryId(String),

    #[error("failed to publish snapshot to database: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<reqwest::Error> for TrackError {
    fn from(err: reqwest::Error) -> Self {
        TrackError::Publish(err.to_string())
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Publish(format!("invalid snapshot payload: {}", err))
    }
}
