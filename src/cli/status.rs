use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use crate::update::PluginUpdater;
use crate::version;

/// Arguments for the status command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Installed version to compare against (overrides the config file).
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,
}

/// Execute the status command.
///
/// Unlike `check`, status is cache-friendly: a live cache entry answers
/// without touching the network, and a network failure degrades to "unable
/// to check" rather than an error exit.
pub async fn execute(args: StatusArgs, updater: &PluginUpdater) -> Result<()> {
    let installed = super::installed_version(args.current.as_deref(), updater.config())?;

    if let Some(entry) = updater.cached_entry() {
        print_versions(&installed, &entry.descriptor.version);
        println!(
            "{}",
            format!("(last checked {})", entry.fetched_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
        );
        return Ok(());
    }

    match updater.fetch_descriptor(false).await {
        Ok(descriptor) => print_versions(&installed, &descriptor.version),
        Err(err) => {
            debug!("Status check failed: {}", err);
            println!("Current version: {installed}");
            println!("{}", "(Unable to check for latest version)".yellow());
        }
    }

    Ok(())
}

fn print_versions(installed: &str, latest: &str) {
    if version::is_newer(latest, installed) {
        println!("Current version: {}", installed.yellow());
        println!(
            "Latest version:  {} {}",
            latest.green().bold(),
            "(update available)".green()
        );
    } else {
        println!("Current version: {installed} {}", "(up to date)".green());
    }
}
