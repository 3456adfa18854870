use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use crate::update::PluginUpdater;

/// Arguments for the manual update check.
///
/// `check` is the user-initiated trigger: it drops the cached release
/// information and always asks GitHub, so the answer reflects the current
/// state of the repository rather than the cache. Failures surface as a
/// single generic message - transport details go to the debug log only.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Installed version to compare against (overrides the config file).
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,

    /// Print the full release notes instead of a short excerpt.
    #[arg(long)]
    pub changelog: bool,
}

/// Execute the check command.
pub async fn execute(args: CheckArgs, updater: &PluginUpdater) -> Result<()> {
    let installed = super::installed_version(args.current.as_deref(), updater.config())?;

    println!("{}", "Checking for updates...".cyan());

    match updater.check_now(&installed).await {
        Ok(Some(descriptor)) => {
            println!(
                "{}",
                format!("Update available: {} -> {}", installed, descriptor.version).green()
            );

            let package = updater.resolve_package_url(&descriptor).await;
            println!("Package: {package}");

            if !descriptor.changelog.trim().is_empty() {
                println!();
                if args.changelog {
                    println!("{}", descriptor.changelog.trim_end());
                } else {
                    for line in descriptor.changelog.lines().take(8) {
                        println!("  {line}");
                    }
                }
            }
        }
        Ok(None) => {
            println!(
                "{}",
                format!("You are on the latest version ({installed})").green()
            );
        }
        Err(err) => {
            debug!("Manual update check failed: {}", err);
            bail!("{}", err.user_message());
        }
    }

    Ok(())
}
