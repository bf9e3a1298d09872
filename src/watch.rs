//! Filesystem change monitoring
//!
//! Watches workspace roots for manifest edits and vuetify install, update,
//! and removal events. All triggers funnel through one debounce window so a
//! package-manager install storm collapses into a single forced
//! re-extraction. Manifest edits only trigger when vuetify is actually
//! among the declared dependencies; artifact removal clears the cache
//! instead of re-extracting.

use crate::error::{VutilError, VutilResult};
use crate::fs::FileSystem;
use crate::locate::{PackageManifest, PACKAGE_NAME};
use crate::orchestration::Extractor;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What a debounced event batch asks the pipeline to do
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Triggers {
    extract: bool,
    clear_cache: bool,
}

/// Debounced watcher over workspace roots
pub struct ChangeMonitor {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: mpsc::UnboundedReceiver<Vec<DebouncedEvent>>,
    fs: Arc<dyn FileSystem>,
}

impl ChangeMonitor {
    /// Start watching the given roots with one shared debounce window
    pub fn new(
        roots: &[PathBuf],
        fs: Arc<dyn FileSystem>,
        debounce: Duration,
    ) -> VutilResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let _ = tx.send(events);
                }
                Err(e) => error!("Watch error: {}", e),
            },
        )
        .map_err(|e| VutilError::Internal(format!("failed to start file watcher: {}", e)))?;

        for root in roots {
            match debouncer.watcher().watch(root, RecursiveMode::Recursive) {
                Ok(()) => info!("Watching {} for changes", root.display()),
                Err(e) => warn!("Cannot watch {}: {}", root.display(), e),
            }
        }

        Ok(Self {
            _debouncer: debouncer,
            events: rx,
            fs,
        })
    }

    /// Drive the extractor from filesystem events until the channel closes
    pub async fn run(mut self, extractor: Arc<Extractor>) {
        while let Some(events) = self.events.recv().await {
            let triggers = classify(self.fs.as_ref(), &events).await;

            if triggers.clear_cache {
                debug!("Artifact removed, clearing persistent cache");
                extractor.clear_cache().await;
            }
            if triggers.extract {
                if let Err(e) = extractor.extract_all(true).await {
                    warn!("Re-extraction after filesystem change failed: {}", e);
                }
            }
        }
    }
}

/// Reduce a debounced batch to pipeline triggers
async fn classify(fs: &dyn FileSystem, events: &[DebouncedEvent]) -> Triggers {
    let mut triggers = Triggers::default();

    for event in events {
        let path = &event.path;
        if is_vuetify_path(path) {
            if fs.exists(path).await {
                triggers.extract = true;
            } else {
                triggers.clear_cache = true;
            }
        } else if is_manifest_event(path) && manifest_declares_vuetify(fs, path).await {
            triggers.extract = true;
        }
    }

    triggers
}

/// A project manifest edit, as opposed to one inside an installed package
fn is_manifest_event(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "package.json")
        && !path
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}

/// A path inside an installed vuetify package directory
fn is_vuetify_path(path: &Path) -> bool {
    let names: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    names
        .windows(2)
        .any(|pair| pair[0] == "node_modules" && pair[1] == PACKAGE_NAME)
}

async fn manifest_declares_vuetify(fs: &dyn FileSystem, path: &Path) -> bool {
    let Ok(bytes) = fs.read(path).await else {
        return false;
    };
    match serde_json::from_slice::<PackageManifest>(&bytes) {
        Ok(manifest) => manifest.declares_vuetify(),
        Err(e) => {
            debug!("Ignoring unparseable manifest {}: {}", path.display(), e);
            false
        }
    }
}
