//! Cache command - inspect or clear the persistent cache

use crate::cache::{FileStore, KeyValueStore};
use crate::cli::args::{CacheAction, CacheArgs};
use crate::cli::commands::cache_dir;
use crate::config::Config;
use crate::error::{VutilError, VutilResult};
use console::style;
use std::io::{self, Write};
use std::sync::Arc;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> VutilResult<()> {
    let dir = cache_dir(config);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.clone()));

    match args.action {
        CacheAction::Info => info(&*store, &dir.display().to_string()).await,
        CacheAction::Clear { yes } => clear(&*store, yes).await,
    }
}

async fn info(store: &dyn KeyValueStore, dir: &str) -> VutilResult<()> {
    let keys = store.list_keys("records/").await?;

    println!("Cache directory: {}", dir);
    if keys.is_empty() {
        println!("No cached entries.");
        return Ok(());
    }

    println!();
    println!("{:<24} {}", "ROOT DIGEST", "VERSION");
    println!("{}", "-".repeat(40));
    for key in &keys {
        // records/<digest>/<version>
        let mut parts = key.splitn(3, '/');
        let _ = parts.next();
        let digest = parts.next().unwrap_or("?");
        let version = parts.next().unwrap_or("?");
        println!("{:<24} {}", digest, version);
    }

    println!();
    println!("Total: {} entry(ies)", style(keys.len()).green());
    Ok(())
}

async fn clear(store: &dyn KeyValueStore, yes: bool) -> VutilResult<()> {
    let keys = store.list_keys("records/").await?;
    if keys.is_empty() {
        println!("Cache is already empty.");
        return Ok(());
    }

    if !yes {
        print!("Remove {} cached entry(ies)? [y/N] ", keys.len());
        io::stdout()
            .flush()
            .map_err(|e| VutilError::io("flushing stdout", e))?;

        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .map_err(|e| VutilError::io("reading confirmation", e))?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    for key in &keys {
        store.delete(key).await?;
    }

    println!(
        "{} Removed {} cached entry(ies)",
        style("[OK]").green(),
        keys.len()
    );
    Ok(())
}
