//! Persistent record cache
//!
//! Two layers: an in-memory hot map keyed by root, and a durable
//! [`KeyValueStore`] keyed by `records/<root digest>/<version>`. An entry is
//! only served when its version matches the currently discovered
//! installation and the artifact's current bytes re-hash to the stored
//! content hash — a package can be reinstalled at the same version with
//! different contents, so the version check alone is not enough.
//!
//! Durable-layer failures degrade to a miss on read and a no-op on write;
//! the memory layer alone is sufficient for correctness within a session.

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::fs::FileSystem;
use crate::record::Record;
use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Namespace prefix for all durable entries owned by this cache
const NAMESPACE: &str = "records/";

/// One cached extraction result for a (root, version) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Installation version at extraction time
    pub version: Version,

    /// When the entry was created
    pub timestamp: DateTime<Utc>,

    /// Extracted records, in artifact order
    pub records: Vec<Record>,

    /// SHA-256 of the artifact bytes at extraction time (hex)
    pub content_hash: String,
}

/// Durable, content-validated record cache with an in-memory hot layer
pub struct PersistentCache {
    store: Arc<dyn KeyValueStore>,
    fs: Arc<dyn FileSystem>,
    memory: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl PersistentCache {
    pub fn new(store: Arc<dyn KeyValueStore>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            store,
            fs,
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// Look up records for a root at a specific version
    ///
    /// When `artifact_path` is given, the stored content hash is re-verified
    /// against the file's current bytes; a mismatch invalidates the root and
    /// reports a miss.
    pub async fn get(
        &self,
        root: &Path,
        version: &Version,
        artifact_path: Option<&Path>,
    ) -> Option<Vec<Record>> {
        let memory_entry = {
            let memory = self.memory.lock().expect("cache memory lock");
            memory.get(root).cloned()
        };

        if let Some(entry) = memory_entry {
            if entry.version == *version {
                if self.verify_hash(root, &entry, artifact_path).await {
                    debug!("Cache hit (memory) for {}", root.display());
                    return Some(entry.records);
                }
                return None;
            }
            // Version moved on; the durable layer may hold the new one.
        }

        let key = self.key_for(root, version);
        let bytes = match self.store.read(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Durable cache read failed for {}: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt cache entry {}: {}", key, e);
                let _ = self.store.delete(&key).await;
                return None;
            }
        };

        if entry.version != *version {
            return None;
        }
        if !self.verify_hash(root, &entry, artifact_path).await {
            return None;
        }

        debug!("Cache hit (durable) for {}", root.display());
        let records = entry.records.clone();
        self.memory
            .lock()
            .expect("cache memory lock")
            .insert(root.to_path_buf(), entry);
        Some(records)
    }

    /// Store an extraction result for a (root, version) pair
    ///
    /// Computes the artifact's content hash and overwrites any prior entry
    /// for the same key. Durable write failures are logged and swallowed.
    pub async fn set(
        &self,
        root: &Path,
        version: &Version,
        records: &[Record],
        artifact_path: &Path,
    ) {
        let Some(content_hash) = self.hash_artifact(artifact_path).await else {
            warn!(
                "Skipping cache write for {}: artifact unreadable",
                root.display()
            );
            return;
        };

        let entry = CacheEntry {
            version: version.clone(),
            timestamp: Utc::now(),
            records: records.to_vec(),
            content_hash,
        };

        let key = self.key_for(root, version);
        match serde_json::to_vec(&entry) {
            Ok(bytes) => {
                if let Err(e) = self.store.write(&key, &bytes).await {
                    warn!("Durable cache write failed for {}: {}", key, e);
                }
            }
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }

        self.memory
            .lock()
            .expect("cache memory lock")
            .insert(root.to_path_buf(), entry);
    }

    /// Drop the memory entry and every durable entry for a root
    pub async fn invalidate(&self, root: &Path) {
        self.memory.lock().expect("cache memory lock").remove(root);

        let prefix = format!("{}{}/", NAMESPACE, root_digest(root));
        match self.store.list_keys(&prefix).await {
            Ok(keys) => {
                for key in keys {
                    if let Err(e) = self.store.delete(&key).await {
                        warn!("Failed to delete cache entry {}: {}", key, e);
                    }
                }
            }
            Err(e) => warn!("Failed to list cache entries for invalidation: {}", e),
        }
        debug!("Invalidated cache for {}", root.display());
    }

    /// Empty both layers
    pub async fn clear(&self) {
        self.memory.lock().expect("cache memory lock").clear();

        match self.store.list_keys(NAMESPACE).await {
            Ok(keys) => {
                for key in keys {
                    if let Err(e) = self.store.delete(&key).await {
                        warn!("Failed to delete cache entry {}: {}", key, e);
                    }
                }
            }
            Err(e) => warn!("Failed to list cache entries for clear: {}", e),
        }
    }

    /// All durable keys in this cache's namespace
    pub async fn entry_keys(&self) -> Vec<String> {
        self.store.list_keys(NAMESPACE).await.unwrap_or_default()
    }

    fn key_for(&self, root: &Path, version: &Version) -> String {
        format!("{}{}/{}", NAMESPACE, root_digest(root), version)
    }

    async fn verify_hash(
        &self,
        root: &Path,
        entry: &CacheEntry,
        artifact_path: Option<&Path>,
    ) -> bool {
        let Some(path) = artifact_path else {
            return true;
        };
        match self.hash_artifact(path).await {
            Some(current) if current == entry.content_hash => true,
            _ => {
                debug!(
                    "Content hash mismatch for {}, invalidating",
                    root.display()
                );
                self.invalidate(root).await;
                false
            }
        }
    }

    async fn hash_artifact(&self, path: &Path) -> Option<String> {
        match self.fs.read(path).await {
            Ok(bytes) => Some(content_hash(&bytes)),
            Err(e) => {
                debug!("Cannot hash artifact {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// SHA-256 of artifact bytes, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fixed-length digest of a root path, the stable key component
///
/// A digest avoids collisions between unrelated roots whose path text only
/// differs in characters a naive substitution scheme would fold together.
fn root_digest(root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(root.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}
