use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode session file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to encode session file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid session id {id}; {available} session(s) available")]
    InvalidRecordId { id: usize, available: usize },
}

impl SessionStoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn encode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Encode {
            path: path.into(),
            source,
        }
    }
}
