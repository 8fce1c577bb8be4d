//! bds-update entry point
//!
//! Parses arguments, runs the selected flow, and renders failures with
//! suggestions. Exit codes: 0 on success, 1 on any failure or declined EULA,
//! 2 for invalid arguments.

use anyhow::Result;
use bds_updater::cli;
use bds_updater::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
