//! Command-line interface for ghup.
//!
//! The CLI is a thin operational shell around
//! [`PluginUpdater`](crate::update::PluginUpdater): it loads a TOML config,
//! opens the persistent file store (so cache entries and reactivation flags
//! survive across invocations the way they must in a real host), and
//! dispatches to one of two commands:
//!
//! - `check` - manual update trigger: invalidates the cache, asks GitHub,
//!   reports the outcome
//! - `status` - cache-friendly version report
//!
//! # Examples
//!
//! ```bash
//! # Check against the version recorded in ghup.toml
//! ghup check
//!
//! # Check against an explicit installed version
//! ghup check --current 2.2.1
//!
//! # Quick report from cache
//! ghup status
//! ```

pub mod check;
pub mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{self, UpdaterConfig};
use crate::core::UpdateError;
use crate::store::FileStore;
use crate::update::PluginUpdater;

/// Top-level CLI structure.
#[derive(Parser)]
#[command(
    name = "ghup",
    about = "GitHub-release update engine for plugin hosts",
    version,
    author,
    long_about = "ghup checks a GitHub repository's releases for plugin updates, \
                  resolves a downloadable package URL, and reports whether the \
                  installed version is current."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the updater config file (default: ./ghup.toml).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the persistent store file (default: ~/.ghup/store.json).
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check for an update now, bypassing the cache.
    Check(check::CheckArgs),

    /// Show current and latest known versions.
    Status(status::StatusArgs),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("ghup.toml"));
        let config = UpdaterConfig::load_from(&config_path).await?;

        let store_path = self
            .store
            .clone()
            .or_else(config::default_store_path)
            .context("Could not determine a store path; pass --store")?;
        let store = Arc::new(FileStore::new(store_path));

        let updater = PluginUpdater::new(config, store)?;

        match self.command {
            Commands::Check(args) => check::execute(args, &updater).await,
            Commands::Status(args) => status::execute(args, &updater).await,
        }
    }

    fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let default_filter = if self.verbose {
            "ghup=debug"
        } else if self.quiet {
            "error"
        } else {
            "ghup=info"
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Resolves the installed version from a CLI override or the config file.
///
/// The engine never caches this value; the CLI reads it fresh from its
/// inputs on every run for the same reason - the installed plugin is the
/// ground truth.
fn installed_version(current: Option<&str>, config: &UpdaterConfig) -> Result<String> {
    if let Some(version) = current {
        return Ok(version.to_string());
    }
    config
        .plugin
        .version
        .clone()
        .ok_or_else(|| {
            UpdateError::Config {
                message: "installed version not set; add plugin.version to the config \
                          or pass --current"
                    .to_string(),
            }
            .into()
        })
}
