//! CLI command implementations

pub mod cache;
pub mod config;
pub mod extract;
pub mod init;
pub mod list;
pub mod watch;

pub use cache::execute as cache;
pub use config::execute as config;
pub use extract::execute as extract;
pub use init::execute as init;
pub use list::execute as list;
pub use watch::execute as watch;

use crate::cache::{FileStore, KeyValueStore, MemoryStore};
use crate::config::{Config, ConfigManager};
use crate::error::{VutilError, VutilResult};
use crate::fs::OsFileSystem;
use crate::notify::Notifier;
use crate::orchestration::Extractor;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve CLI root arguments, defaulting to the current directory
pub(crate) fn resolve_roots(roots: &[PathBuf]) -> VutilResult<Vec<PathBuf>> {
    if roots.is_empty() {
        let cwd = std::env::current_dir()
            .map_err(|e| VutilError::io("getting current directory", e))?;
        return Ok(vec![cwd]);
    }

    roots
        .iter()
        .map(|root| {
            root.canonicalize().map_err(|e| {
                VutilError::io(format!("resolving root {}", root.display()), e)
            })
        })
        .collect()
}

/// Directory backing the durable cache layer
pub(crate) fn cache_dir(config: &Config) -> PathBuf {
    config
        .cache
        .dir
        .clone()
        .unwrap_or_else(ConfigManager::cache_dir)
}

/// Wire up the extraction pipeline for a set of roots
pub(crate) fn build_extractor(roots: Vec<PathBuf>, config: &Config) -> Arc<Extractor> {
    let store: Arc<dyn KeyValueStore> = if config.cache.enabled {
        Arc::new(FileStore::new(cache_dir(config)))
    } else {
        Arc::new(MemoryStore::new())
    };

    Arc::new(Extractor::new(
        roots,
        Arc::new(OsFileSystem),
        store,
        Arc::new(Notifier::new(config)),
    ))
}
