//! vutil - Vuetify utility-class extractor
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vutil::cli::{Cli, Commands};
use vutil::config::{Config, ConfigManager};
use vutil::error::VutilResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> VutilResult<()> {
    let cli = Cli::parse();

    // Init command doesn't need config loading
    if let Commands::Init(args) = cli.command {
        init_logging(cli.verbose, &Config::default());
        return vutil::cli::commands::init(args).await;
    }

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| vutil::error::VutilError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    if let Some(ref path) = local_config_path {
        debug!("Using local config: {}", path.display());
    }

    // Ensure state directories exist
    ConfigManager::ensure_state_dirs().await?;

    // Dispatch to command
    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Extract(args) => vutil::cli::commands::extract(args, &config).await,
        Commands::List(args) => vutil::cli::commands::list(args, &config).await,
        Commands::Watch(args) => vutil::cli::commands::watch(args, &config).await,
        Commands::Cache(args) => vutil::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            vutil::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
///
/// `general.verbose` raises the baseline to info when no -v flag is given;
/// warnings and errors always pass the filter.
fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 if config.general.verbose => "vutil=info",
        0 => "vutil=warn",
        1 => "vutil=info",
        _ => "vutil=debug",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
