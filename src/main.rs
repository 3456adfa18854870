//! ghup CLI entry point
//!
//! Parses command-line arguments and executes the selected command:
//! - `check` - manual update check against GitHub releases
//! - `status` - report current and latest known versions

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use ghup::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{}", format!("Error: {e:#}").red());
            std::process::exit(1);
        }
    }
}
