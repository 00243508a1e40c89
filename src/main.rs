//! pam - save, run and browse SQL queries from the terminal
//!
//! The logic lives in the library; this only wires up logging and the CLI.

use anyhow::Result;
use clap::Parser;
use pam::commands::{Cli, dispatch};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = pam::logging::init() {
        eprintln!("warning: could not open log file: {e}");
    }

    let cli = Cli::parse();
    log::debug!("running {:?}", cli.command);
    dispatch(cli).await?;
    Ok(())
}
