//! Extraction orchestration
//!
//! [`Extractor`] drives one extraction cycle end to end: locate
//! installations, consult the persistent cache per root, parse on miss,
//! publish the results into the in-memory index that consumers query.
//!
//! Concurrency model: at most one non-cancelled run exists at a time.
//! `extract_all` cancels the previous run's token before starting, and
//! every suspension point checks the token after resuming, unwinding
//! without touching the index when it is set. `ensure_extracted` callers
//! coalesce onto the in-flight run instead of starting their own.
//!
//! A per-root failure is isolated: it is reported and the root's previous
//! index entry stays in place, so a transient error never discards a
//! previously good extraction.

use crate::artifact;
use crate::cache::{KeyValueStore, PersistentCache};
use crate::error::{VutilError, VutilResult};
use crate::fs::FileSystem;
use crate::locate::Locator;
use crate::notify::Notifier;
use crate::record::{Installation, Record};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle of the extraction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    NeverRun,
    Running,
    Completed,
}

struct Shared {
    index: BTreeMap<PathBuf, Arc<Vec<Record>>>,
    status: ExtractionStatus,
}

struct RunHandle {
    token: CancellationToken,
    done: watch::Receiver<bool>,
}

/// Coordinates locate → cache → parse → index for a fixed set of roots
pub struct Extractor {
    roots: Vec<PathBuf>,
    fs: Arc<dyn FileSystem>,
    locator: Locator,
    cache: PersistentCache,
    notifier: Arc<Notifier>,
    shared: Mutex<Shared>,
    // Lock order: `run` before `shared`, everywhere.
    run: Mutex<Option<RunHandle>>,
}

impl Extractor {
    pub fn new(
        roots: Vec<PathBuf>,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            roots,
            locator: Locator::new(fs.clone()),
            cache: PersistentCache::new(store, fs.clone()),
            fs,
            notifier,
            shared: Mutex::new(Shared {
                index: BTreeMap::new(),
                status: ExtractionStatus::NeverRun,
            }),
            run: Mutex::new(None),
        }
    }

    /// Run a full extraction cycle, cancelling any cycle already in flight
    pub async fn extract_all(&self, force_refresh: bool) -> VutilResult<()> {
        let (token, done_tx) = {
            let mut run = self.run.lock().expect("run lock");
            if let Some(prev) = run.take() {
                debug!("Cancelling in-flight extraction");
                prev.token.cancel();
            }
            self.install_run(&mut run)
        };

        self.execute(token, done_tx, force_refresh).await
    }

    /// Extract once; concurrent callers share the in-flight run
    ///
    /// Returns immediately when a cycle has already completed. Callers that
    /// need fresh data use [`Self::refresh`].
    pub async fn ensure_extracted(&self) -> VutilResult<()> {
        enum Plan {
            Done,
            Wait(watch::Receiver<bool>),
            Run(CancellationToken, watch::Sender<bool>),
        }

        let plan = {
            let mut run = self.run.lock().expect("run lock");
            let already_completed = {
                let shared = self.shared.lock().expect("shared lock");
                shared.status == ExtractionStatus::Completed
            };

            if already_completed {
                Plan::Done
            } else if let Some(handle) = run.as_ref() {
                Plan::Wait(handle.done.clone())
            } else {
                let (token, done_tx) = self.install_run(&mut run);
                Plan::Run(token, done_tx)
            }
        };

        match plan {
            Plan::Done => Ok(()),
            Plan::Wait(mut done) => {
                let _ = done.wait_for(|finished| *finished).await;
                Ok(())
            }
            Plan::Run(token, done_tx) => self.execute(token, done_tx, false).await,
        }
    }

    /// Forced re-extraction; completes when the cycle finishes
    pub async fn refresh(&self) -> VutilResult<()> {
        self.extract_all(true).await
    }

    /// Records for one root; empty if unknown or not yet extracted
    pub fn records_for(&self, root: &Path) -> Vec<Record> {
        let shared = self.shared.lock().expect("shared lock");
        shared
            .index
            .get(root)
            .map(|records| records.as_ref().clone())
            .unwrap_or_default()
    }

    /// Records across all known roots, in root order
    pub fn all_records(&self) -> Vec<Record> {
        let shared = self.shared.lock().expect("shared lock");
        shared
            .index
            .values()
            .flat_map(|records| records.iter().cloned())
            .collect()
    }

    /// Per-root record counts, for summaries
    pub fn index_summary(&self) -> BTreeMap<PathBuf, usize> {
        let shared = self.shared.lock().expect("shared lock");
        shared
            .index
            .iter()
            .map(|(root, records)| (root.clone(), records.len()))
            .collect()
    }

    pub fn status(&self) -> ExtractionStatus {
        self.shared.lock().expect("shared lock").status
    }

    /// Reset to the never-run state: cancel, empty the index, clear the cache
    pub async fn clear(&self) {
        {
            let mut run = self.run.lock().expect("run lock");
            if let Some(prev) = run.take() {
                prev.token.cancel();
            }
        }
        {
            let mut shared = self.shared.lock().expect("shared lock");
            shared.index.clear();
            shared.status = ExtractionStatus::NeverRun;
        }
        self.cache.clear().await;
    }

    /// Drop all persisted entries without touching the index
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Durable cache keys currently present
    pub async fn cache_keys(&self) -> Vec<String> {
        self.cache.entry_keys().await
    }

    fn install_run(
        &self,
        run: &mut Option<RunHandle>,
    ) -> (CancellationToken, watch::Sender<bool>) {
        let token = CancellationToken::new();
        let (done_tx, done_rx) = watch::channel(false);
        *run = Some(RunHandle {
            token: token.clone(),
            done: done_rx,
        });
        self.shared.lock().expect("shared lock").status = ExtractionStatus::Running;
        (token, done_tx)
    }

    async fn execute(
        &self,
        token: CancellationToken,
        done_tx: watch::Sender<bool>,
        force_refresh: bool,
    ) -> VutilResult<()> {
        let result = self.run_cycle(&token, force_refresh).await;

        {
            let mut run = self.run.lock().expect("run lock");
            if !token.is_cancelled() {
                let mut shared = self.shared.lock().expect("shared lock");
                shared.status = if result.is_ok() {
                    ExtractionStatus::Completed
                } else {
                    ExtractionStatus::NeverRun
                };
                *run = None;
            }
            // A cancelled run was already replaced; its slot is not ours.
        }

        let _ = done_tx.send(true);

        match result {
            Err(VutilError::Cancelled) => Ok(()),
            other => other,
        }
    }

    async fn run_cycle(&self, token: &CancellationToken, force_refresh: bool) -> VutilResult<()> {
        let installations = match self.locator.find_all(&self.roots, token).await {
            Ok(installations) => installations,
            Err(VutilError::Cancelled) => return Err(VutilError::Cancelled),
            Err(e) => {
                self.notifier.critical(&e);
                return Err(e);
            }
        };
        if token.is_cancelled() {
            return Err(VutilError::Cancelled);
        }

        let missing: Vec<PathBuf> = self
            .roots
            .iter()
            .filter(|root| !installations.contains_key(*root))
            .cloned()
            .collect();

        if installations.is_empty() {
            self.notifier.not_detected(&missing);
            let mut shared = self.shared.lock().expect("shared lock");
            shared.index.clear();
            return Ok(());
        }
        if !missing.is_empty() {
            self.notifier.not_detected(&missing);
        }

        for (root, installation) in &installations {
            if token.is_cancelled() {
                return Err(VutilError::Cancelled);
            }

            match self
                .process_root(root, installation, force_refresh, token)
                .await
            {
                Ok(records) => {
                    if token.is_cancelled() {
                        return Err(VutilError::Cancelled);
                    }
                    info!(
                        "Indexed {} record(s) for {} ({})",
                        records.len(),
                        root.display(),
                        installation.version
                    );
                    let mut shared = self.shared.lock().expect("shared lock");
                    shared.index.insert(root.clone(), Arc::new(records));
                }
                Err(VutilError::Cancelled) => return Err(VutilError::Cancelled),
                Err(e) => {
                    // Previous index entry for this root stays in place.
                    self.notifier.root_failure(root, &e);
                }
            }
        }

        if token.is_cancelled() {
            return Err(VutilError::Cancelled);
        }

        // Roots that no longer hold an installation drop out of the index;
        // roots that failed above were confirmed installations and stay.
        {
            let mut shared = self.shared.lock().expect("shared lock");
            shared
                .index
                .retain(|root, _| installations.contains_key(root));
        }

        Ok(())
    }

    async fn process_root(
        &self,
        root: &Path,
        installation: &Installation,
        force_refresh: bool,
        token: &CancellationToken,
    ) -> VutilResult<Vec<Record>> {
        if !force_refresh {
            let cached = self
                .cache
                .get(
                    root,
                    &installation.version,
                    Some(&installation.artifact_path),
                )
                .await;
            if token.is_cancelled() {
                return Err(VutilError::Cancelled);
            }
            if let Some(records) = cached {
                debug!("Using cached records for {}", root.display());
                return Ok(records);
            }
        }

        let size = match self.fs.file_size(&installation.artifact_path).await {
            Ok(size) => size,
            Err(e) if e.is_not_found() => {
                return Err(VutilError::ArtifactMissing(
                    installation.artifact_path.clone(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        if token.is_cancelled() {
            return Err(VutilError::Cancelled);
        }
        if size > artifact::MAX_ARTIFACT_BYTES {
            return Err(VutilError::SizeExceeded {
                path: installation.artifact_path.clone(),
                size,
                limit: artifact::MAX_ARTIFACT_BYTES,
            });
        }

        let bytes = match self.fs.read(&installation.artifact_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                return Err(VutilError::ArtifactMissing(
                    installation.artifact_path.clone(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        if token.is_cancelled() {
            return Err(VutilError::Cancelled);
        }

        let records = artifact::parse(&installation.artifact_path, &bytes)?;

        self.cache
            .set(
                root,
                &installation.version,
                &records,
                &installation.artifact_path,
            )
            .await;
        if token.is_cancelled() {
            return Err(VutilError::Cancelled);
        }

        Ok(records)
    }
}
