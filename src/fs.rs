//! Async filesystem facility
//!
//! All discovery and extraction I/O goes through the [`FileSystem`] trait so
//! the pipeline can be driven against a real tree or a test double. Errors
//! are a closed set of variants; callers match on them instead of sniffing
//! `io::Error` internals.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Closed error set for filesystem probes
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Filesystem error at {path}: {source}")]
    Other {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Other {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Check for the "not found" variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Abstract async filesystem interface
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Check whether a path exists
    async fn exists(&self, path: &Path) -> bool;

    /// Read a file's full contents
    async fn read(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// List entry names (not full paths) of a directory
    async fn read_dir(&self, path: &Path) -> Result<Vec<String>, FsError>;

    /// File size in bytes, without reading the contents
    async fn file_size(&self, path: &Path) -> Result<u64, FsError>;
}

/// Production implementation backed by tokio::fs
pub struct OsFileSystem;

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<String>, FsError> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(path, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn file_size(&self, path: &Path) -> Result<u64, FsError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        Ok(meta.len())
    }
}
