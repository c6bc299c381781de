//! Kubeguard CLI application
//!
//! Serves a single `kubectl` tool to MCP clients over stdin/stdout. Every
//! command string is validated, screened for shell injection and checked for
//! interactivity before it reaches a shell.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/kubeguard-cli
//! ```

#![allow(clippy::collapsible_if)]

mod args;
mod commands;
mod router;
mod signal_handler;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    router::route(cli).await
}
