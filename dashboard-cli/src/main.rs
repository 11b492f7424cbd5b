//! Binary crate for the `weather-dashboard` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Drawing the dashboard in the terminal
//! - Launching the backend server

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod terminal;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    cmd.init_tracing();
    cmd.run().await
}
