//! Error types for vutil
//!
//! All modules use `VutilResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

use crate::fs::FsError;

/// Result type alias for vutil operations
pub type VutilResult<T> = Result<T, VutilError>;

/// All errors that can occur in vutil
#[derive(Error, Debug)]
pub enum VutilError {
    // Extraction errors
    #[error("Artifact {path} is {size} bytes, exceeding the {limit} byte ceiling")]
    SizeExceeded {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Failed to parse stylesheet {path}: {reason}")]
    MalformedArtifact { path: PathBuf, reason: String },

    #[error("Generated stylesheet missing: {0}")]
    ArtifactMissing(PathBuf),

    // Cooperative unwind; callers that observe it must return without
    // reporting or mutating shared state.
    #[error("Extraction cancelled")]
    Cancelled,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Filesystem errors
    #[error(transparent)]
    Fs(#[from] FsError),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl VutilError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a malformed-artifact error
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check whether this error is a cooperative cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ArtifactMissing(_) => Some("Reinstall vuetify: npm install vuetify"),
            Self::MalformedArtifact { .. } => Some("Run with -vv and inspect the logs"),
            Self::SizeExceeded { .. } => {
                Some("The stylesheet is unexpectedly large; check the installation")
            }
            Self::ConfigInvalid { .. } => Some("Run: vutil config init --force"),
            _ => None,
        }
    }
}
