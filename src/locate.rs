//! Vuetify installation discovery
//!
//! Probes each workspace root through a fixed priority chain and confirms
//! an installation only when both the package manifest and a generated
//! stylesheet are present. Same layout = same installation; the first
//! strategy that confirms wins and the rest are skipped.
//!
//! Probe failures (missing paths, permission errors) are "not found",
//! never fatal: one broken root must not hide installations in others.

use crate::error::{VutilError, VutilResult};
use crate::fs::FileSystem;
use crate::record::Installation;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// npm package name being located
pub const PACKAGE_NAME: &str = "vuetify";

/// Conventional frontend subdirectory names, probed in order
const CONVENTIONAL_SUBDIRS: &[&str] = &["frontend", "client", "web", "app", "ui", "packages", "apps"];

/// Subdirectories that additionally get one nested level probed
const NESTED_SUBDIRS: &[&str] = &["packages", "apps"];

/// Candidate artifact paths relative to the package directory
const ARTIFACT_CANDIDATES: &[&str] = &["dist/vuetify.css", "dist/vuetify.min.css"];

/// Minimal view of a package.json manifest
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    pub workspaces: Option<Workspaces>,
}

/// The `workspaces` field comes in two shapes across package managers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    List(Vec<String>),
    Config { packages: Vec<String> },
}

impl Workspaces {
    fn members(&self) -> &[String] {
        match self {
            Self::List(members) => members,
            Self::Config { packages } => packages,
        }
    }
}

impl PackageManifest {
    /// Check whether vuetify is declared as a (dev) dependency
    pub fn declares_vuetify(&self) -> bool {
        self.dependencies.contains_key(PACKAGE_NAME)
            || self.dev_dependencies.contains_key(PACKAGE_NAME)
    }
}

/// Discovers vuetify installations across workspace roots
pub struct Locator {
    fs: Arc<dyn FileSystem>,
}

impl Locator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Locate installations for every root
    ///
    /// Roots without a confirmed installation are absent from the result.
    pub async fn find_all(
        &self,
        roots: &[PathBuf],
        token: &CancellationToken,
    ) -> VutilResult<BTreeMap<PathBuf, Installation>> {
        let mut found = BTreeMap::new();

        for root in roots {
            if token.is_cancelled() {
                return Err(VutilError::Cancelled);
            }

            match self.find_in_root(root).await {
                Some(installation) => {
                    debug!(
                        "Found {} {} at {}",
                        PACKAGE_NAME,
                        installation.version,
                        installation.artifact_path.display()
                    );
                    found.insert(root.clone(), installation);
                }
                None => debug!("No {} installation under {}", PACKAGE_NAME, root.display()),
            }
        }

        debug!("Located {} installation(s)", found.len());
        Ok(found)
    }

    /// Probe one root through the strategy chain; first hit wins
    async fn find_in_root(&self, root: &Path) -> Option<Installation> {
        // 1. The root's own dependency directory
        if let Some(inst) = self.confirm(root, &package_dir(root)).await {
            return Some(inst);
        }

        // 2. Parent directory (nested package layouts)
        if let Some(parent) = root.parent() {
            if let Some(inst) = self.confirm(root, &package_dir(parent)).await {
                return Some(inst);
            }
        }

        // 3. Conventional frontend subdirectories
        for sub in CONVENTIONAL_SUBDIRS {
            let dir = root.join(sub);
            if let Some(inst) = self.confirm(root, &package_dir(&dir)).await {
                return Some(inst);
            }

            if NESTED_SUBDIRS.contains(sub) {
                if let Ok(names) = self.fs.read_dir(&dir).await {
                    for name in names {
                        let nested = dir.join(&name);
                        if let Some(inst) = self.confirm(root, &package_dir(&nested)).await {
                            return Some(inst);
                        }
                    }
                }
            }
        }

        // 4. pnpm store, matched by version-qualified directory prefix
        let pnpm = root.join("node_modules").join(".pnpm");
        if let Ok(names) = self.fs.read_dir(&pnpm).await {
            for name in names {
                if !name.starts_with(&format!("{}@", PACKAGE_NAME)) {
                    continue;
                }
                let candidate = pnpm.join(&name).join("node_modules").join(PACKAGE_NAME);
                if let Some(inst) = self.confirm(root, &candidate).await {
                    return Some(inst);
                }
            }
        }

        // 5. Workspace members declared in the root manifest
        for member in self.workspace_members(root).await {
            if let Some(inst) = self.confirm(root, &package_dir(&member)).await {
                return Some(inst);
            }
        }

        None
    }

    /// Confirm a package directory as an installation
    ///
    /// Requires a parseable manifest with a semver version and at least one
    /// candidate artifact. A manifest without any artifact yields nothing.
    async fn confirm(&self, root: &Path, pkg_dir: &Path) -> Option<Installation> {
        let manifest_path = pkg_dir.join("package.json");
        let bytes = self.fs.read(&manifest_path).await.ok()?;

        let manifest: PackageManifest = match serde_json::from_slice(&bytes) {
            Ok(m) => m,
            Err(e) => {
                warn!("Unparseable manifest {}: {}", manifest_path.display(), e);
                return None;
            }
        };

        let raw_version = manifest.version?;
        let version = match Version::parse(&raw_version) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Invalid version '{}' in {}: {}",
                    raw_version,
                    manifest_path.display(),
                    e
                );
                return None;
            }
        };

        for candidate in ARTIFACT_CANDIDATES {
            let artifact = pkg_dir.join(candidate);
            if self.fs.exists(&artifact).await {
                return Some(Installation {
                    root_path: root.to_path_buf(),
                    artifact_path: artifact,
                    version,
                });
            }
        }

        debug!(
            "Manifest found but no artifact under {}",
            pkg_dir.display()
        );
        None
    }

    /// Expand workspace member declarations from the root manifest
    ///
    /// Only single-level `dir/*` globs are expanded; anything else is
    /// treated as a literal path.
    async fn workspace_members(&self, root: &Path) -> Vec<PathBuf> {
        let manifest_path = root.join("package.json");
        let Ok(bytes) = self.fs.read(&manifest_path).await else {
            return Vec::new();
        };
        let Ok(manifest) = serde_json::from_slice::<PackageManifest>(&bytes) else {
            return Vec::new();
        };
        let Some(workspaces) = manifest.workspaces else {
            return Vec::new();
        };

        let mut members = Vec::new();
        for entry in workspaces.members() {
            if let Some(prefix) = entry.strip_suffix("/*") {
                let dir = root.join(prefix);
                if let Ok(names) = self.fs.read_dir(&dir).await {
                    members.extend(names.into_iter().map(|n| dir.join(n)));
                }
            } else {
                members.push(root.join(entry));
            }
        }
        members
    }
}

fn package_dir(base: &Path) -> PathBuf {
    base.join("node_modules").join(PACKAGE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn install_vuetify(pkg_dir: &Path, version: &str) {
        fs::create_dir_all(pkg_dir.join("dist")).unwrap();
        fs::write(
            pkg_dir.join("package.json"),
            format!(r#"{{"name": "vuetify", "version": "{}"}}"#, version),
        )
        .unwrap();
        fs::write(pkg_dir.join("dist/vuetify.css"), ".ma-2{margin:8px}").unwrap();
    }

    fn locator() -> Locator {
        Locator::new(Arc::new(OsFileSystem))
    }

    #[tokio::test]
    async fn finds_direct_installation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        install_vuetify(&root.join("node_modules/vuetify"), "3.1.0");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();

        let inst = found.get(&root).unwrap();
        assert_eq!(inst.version, Version::parse("3.1.0").unwrap());
        assert!(inst.artifact_path.ends_with("dist/vuetify.css"));
    }

    #[tokio::test]
    async fn finds_parent_installation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("web-app");
        fs::create_dir_all(&root).unwrap();
        install_vuetify(&temp.path().join("node_modules/vuetify"), "3.4.2");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert!(found.contains_key(&root));
    }

    #[tokio::test]
    async fn finds_conventional_subdir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        install_vuetify(&root.join("frontend/node_modules/vuetify"), "2.7.0");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert!(found.contains_key(&root));
    }

    #[tokio::test]
    async fn finds_nested_packages_member() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        install_vuetify(&root.join("packages/webapp/node_modules/vuetify"), "3.0.0");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert!(found.contains_key(&root));
    }

    #[tokio::test]
    async fn finds_pnpm_store_installation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        install_vuetify(
            &root.join("node_modules/.pnpm/vuetify@3.5.1/node_modules/vuetify"),
            "3.5.1",
        );

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert_eq!(
            found.get(&root).unwrap().version,
            Version::parse("3.5.1").unwrap()
        );
    }

    #[tokio::test]
    async fn finds_workspace_member() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(
            root.join("package.json"),
            r#"{"name": "mono", "version": "1.0.0", "workspaces": ["modules/*"]}"#,
        )
        .unwrap();
        install_vuetify(&root.join("modules/site/node_modules/vuetify"), "3.2.0");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert!(found.contains_key(&root));
    }

    #[tokio::test]
    async fn first_hit_wins_over_later_strategies() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        install_vuetify(&root.join("node_modules/vuetify"), "3.9.9");
        install_vuetify(&root.join("frontend/node_modules/vuetify"), "1.1.1");

        let token = CancellationToken::new();
        let found = locator().find_all(&[root.clone()], &token).await.unwrap();
        assert_eq!(
            found.get(&root).unwrap().version,
            Version::parse("3.9.9").unwrap()
        );
    }

    #[tokio::test]
    async fn manifest_without_artifact_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let pkg = root.join("node_modules/vuetify");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("package.json"),
            r#"{"name": "vuetify", "version": "3.1.0"}"#,
        )
        .unwrap();

        let token = CancellationToken::new();
        let found = locator().find_all(&[root], &token).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn invalid_version_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let pkg = root.join("node_modules/vuetify");
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(
            pkg.join("package.json"),
            r#"{"name": "vuetify", "version": "not-a-version"}"#,
        )
        .unwrap();
        fs::write(pkg.join("dist/vuetify.css"), "").unwrap();

        let token = CancellationToken::new();
        let found = locator().find_all(&[root], &token).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn broken_root_does_not_hide_others() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        let good = temp.path().join("good");
        install_vuetify(&good.join("node_modules/vuetify"), "3.1.0");

        let token = CancellationToken::new();
        let found = locator()
            .find_all(&[missing, good.clone()], &token)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&good));
    }

    #[tokio::test]
    async fn cancelled_token_stops_discovery() {
        let temp = TempDir::new().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = locator()
            .find_all(&[temp.path().to_path_buf()], &token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn manifest_declares_vuetify() {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{"version": "1.0.0", "dependencies": {"vuetify": "^3.0.0"}}"#,
        )
        .unwrap();
        assert!(manifest.declares_vuetify());

        let manifest: PackageManifest = serde_json::from_str(
            r#"{"version": "1.0.0", "devDependencies": {"vuetify": "^3.0.0"}}"#,
        )
        .unwrap();
        assert!(manifest.declares_vuetify());

        let manifest: PackageManifest =
            serde_json::from_str(r#"{"version": "1.0.0", "dependencies": {"vue": "^3"}}"#).unwrap();
        assert!(!manifest.declares_vuetify());
    }
}
