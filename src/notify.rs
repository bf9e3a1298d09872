//! User-visible notifications
//!
//! One explicitly constructed [`Notifier`] instance is shared by the
//! extraction pipeline; components receive it by reference instead of
//! writing to a process-global channel. Messages go to stderr so command
//! output stays scriptable.

use crate::config::Config;
use crate::error::VutilError;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

/// Routes extraction outcomes to the user
pub struct Notifier {
    show_not_detected: bool,
    not_detected_shown: AtomicBool,
}

impl Notifier {
    pub fn new(config: &Config) -> Self {
        Self {
            show_not_detected: config.notifications.not_detected,
            not_detected_shown: AtomicBool::new(false),
        }
    }

    /// Informational "no installation found" prompt, naming the roots
    /// that yielded nothing
    ///
    /// Shown at most once per process run and suppressible via
    /// `notifications.not_detected = false`.
    pub fn not_detected(&self, roots: &[PathBuf]) {
        if !self.show_not_detected {
            return;
        }
        if self.not_detected_shown.swap(true, Ordering::SeqCst) {
            return;
        }
        eprintln!(
            "{} No vuetify installation detected in {} workspace root(s):",
            style("[INFO]").cyan(),
            roots.len()
        );
        for root in roots {
            eprintln!("  {}", style(root.display()).dim());
        }
        eprintln!(
            "  {}",
            style("Disable this notice with: vutil config set notifications.not_detected false")
                .dim()
        );
    }

    /// Per-root extraction failure, actionable where possible
    pub fn root_failure(&self, root: &Path, err: &VutilError) {
        warn!("Extraction failed for {}: {}", root.display(), err);
        eprintln!(
            "{} Extraction failed for {}: {}",
            style("[WARN]").yellow(),
            root.display(),
            err
        );
        if let Some(hint) = err.hint() {
            eprintln!("  {} {}", style("Hint:").yellow(), hint);
        }
    }

    /// Cycle-fatal failure (discovery itself broke)
    pub fn critical(&self, err: &VutilError) {
        error!("Extraction cycle failed: {}", err);
        eprintln!(
            "{} Extraction cycle failed: {}",
            style("[ERROR]").red().bold(),
            err
        );
        eprintln!(
            "  {}",
            style("Re-run with -vv for a full log of the failing cycle").dim()
        );
    }

    #[cfg(test)]
    fn was_not_detected_shown(&self) -> bool {
        self.not_detected_shown.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    #[test]
    fn not_detected_latches_after_first_show() {
        let notifier = Notifier::new(&Config::default());
        let roots = vec![PathBuf::from("/work/app")];
        assert!(!notifier.was_not_detected_shown());

        notifier.not_detected(&roots);
        assert!(notifier.was_not_detected_shown());

        // Second call must be silent; the latch stays set.
        notifier.not_detected(&roots);
        assert!(notifier.was_not_detected_shown());
    }

    #[test]
    fn not_detected_respects_config_gate() {
        let mut config = Config::default();
        config.notifications.not_detected = false;

        let notifier = Notifier::new(&config);
        notifier.not_detected(&[PathBuf::from("/work/app")]);
        assert!(!notifier.was_not_detected_shown());
    }

    #[test]
    fn failure_paths_do_not_panic() {
        let notifier = Notifier::new(&Config::default());
        let root = PathBuf::from("/work/app");
        notifier.root_failure(&root, &VutilError::ArtifactMissing(root.clone()));
        notifier.critical(&VutilError::Internal("boom".into()));
    }
}
