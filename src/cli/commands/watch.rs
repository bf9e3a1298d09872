//! Watch command - keep the index fresh until interrupted

use crate::cli::args::WatchArgs;
use crate::cli::commands::{build_extractor, resolve_roots};
use crate::config::Config;
use crate::error::VutilResult;
use crate::fs::OsFileSystem;
use crate::watch::ChangeMonitor;
use console::style;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Execute the watch command
pub async fn execute(args: WatchArgs, config: &Config) -> VutilResult<()> {
    let roots = resolve_roots(&args.roots)?;
    let extractor = build_extractor(roots.clone(), config);

    extractor.extract_all(false).await?;
    let total: usize = extractor.index_summary().values().sum();
    println!(
        "{} Extracted {} utility class(es); watching {} root(s) for changes",
        style("[OK]").green(),
        total,
        roots.len()
    );

    let monitor = ChangeMonitor::new(
        &roots,
        Arc::new(OsFileSystem),
        Duration::from_millis(config.watch.debounce_ms),
    )?;

    tokio::select! {
        _ = monitor.run(extractor.clone()) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down watcher");
            println!();
            println!("{} Watcher stopped", style("[OK]").green());
        }
    }

    Ok(())
}
