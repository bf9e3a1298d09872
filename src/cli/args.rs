//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vutil - Vuetify utility-class extractor
///
/// Discovers vuetify installations in workspace roots, mines the generated
/// stylesheet for utility classes, and serves them from a persistent,
/// content-validated cache.
#[derive(Parser, Debug)]
#[command(name = "vutil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VUTIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .vutil.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an extraction cycle over workspace roots
    Extract(ExtractArgs),

    /// List extracted utility classes
    List(ListArgs),

    /// Extract, then re-extract on filesystem changes until interrupted
    Watch(WatchArgs),

    /// Inspect or clear the persistent cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Initialize a project-local .vutil.toml config
    Init(InitArgs),
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Workspace roots to scan (defaults to current directory)
    pub roots: Vec<PathBuf>,

    /// Ignore cached entries and re-parse every artifact
    #[arg(long)]
    pub force: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Workspace roots to scan (defaults to current directory)
    pub roots: Vec<PathBuf>,

    /// Only show classes in this category (e.g. spacing, display)
    #[arg(long)]
    pub category: Option<String>,

    /// Only show classes starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Workspace roots to watch (defaults to current directory)
    pub roots: Vec<PathBuf>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache location and stored entries
    Info,

    /// Remove all cached entries
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. notifications.not_detected)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .vutil.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing .vutil.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
