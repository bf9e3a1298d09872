//! Durable key-value storage for the persistent cache
//!
//! Keys are slash-separated relative paths; [`FileStore`] maps each key to
//! one file under its base directory. The store is dumb on purpose: entry
//! validation (version, content hash) lives in the cache layer above it.

use crate::error::{VutilError, VutilResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Abstract durable key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read an entry's bytes; `None` when absent
    async fn read(&self, key: &str) -> VutilResult<Option<Vec<u8>>>;

    /// Write an entry, overwriting unconditionally
    async fn write(&self, key: &str, bytes: &[u8]) -> VutilResult<()>;

    /// Delete an entry; deleting an absent key is a no-op
    async fn delete(&self, key: &str) -> VutilResult<()>;

    /// List all keys starting with the given prefix
    async fn list_keys(&self, prefix: &str) -> VutilResult<Vec<String>>;
}

/// File-per-key store rooted at a base directory
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }

    fn collect_keys(
        dir: &Path,
        base: &Path,
        prefix: &str,
        out: &mut Vec<String>,
    ) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                Self::collect_keys(&path, base, prefix, out)?;
            } else if let Ok(rel) = path.strip_prefix(base) {
                let key = rel.to_string_lossy().replace('\\', "/");
                if key.starts_with(prefix) {
                    out.push(key);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> VutilResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VutilError::io(
                format!("reading cache entry {}", path.display()),
                e,
            )),
        }
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> VutilResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| VutilError::io("creating cache directory", e))?;
        }
        fs::write(&path, bytes)
            .await
            .map_err(|e| VutilError::io(format!("writing cache entry {}", path.display()), e))
    }

    async fn delete(&self, key: &str) -> VutilResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VutilError::io(
                format!("deleting cache entry {}", path.display()),
                e,
            )),
        }
    }

    async fn list_keys(&self, prefix: &str) -> VutilResult<Vec<String>> {
        let base = self.base_dir.clone();
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        Self::collect_keys(&base, &base, prefix, &mut keys)
            .map_err(|e| VutilError::io("listing cache entries", e))?;
        keys.sort();
        Ok(keys)
    }
}

/// Volatile store used when the durable layer is disabled
///
/// Keeps the cache API intact while persisting nothing across processes.
#[derive(Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> VutilResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().expect("store lock").get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> VutilResult<()> {
        self.entries
            .lock()
            .expect("store lock")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> VutilResult<()> {
        self.entries.lock().expect("store lock").remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> VutilResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .expect("store lock")
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
