//! CLI argument definitions using clap
//!
//! - kubeguard                    # Serve MCP over stdio (default)
//! - kubeguard version            # Version and build information
//! - kubeguard tools              # Registered tool schemas as JSON
//! - kubeguard check "<command>"  # Offline verdict for one command

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "kubeguard.json";

#[derive(Parser, Debug)]
#[command(name = "kubeguard")]
#[command(about = "Kubeguard - guarded kubectl execution for language models over MCP")]
#[command(
    long_about = r#"Kubeguard - guarded kubectl execution for language models over MCP

USAGE:
  kubeguard                              # Serve MCP over stdin/stdout
  kubeguard --kubeconfig ~/.kube/dev     # Serve against a specific cluster
  kubeguard check "kubectl get pods"     # Check a command without running it
  kubeguard tools                        # Show the tool schema

Logs go to stderr; stdout carries the protocol stream."#
)]
#[command(version)]
pub struct Cli {
    /// Path to the kubeconfig handed to kubectl
    #[arg(long, env = "KUBEGUARD_KUBECONFIG")]
    pub kubeconfig: Option<String>,

    /// Path to configuration file (JSON, TOML or YAML)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the kubectl tool over MCP on stdin/stdout
    Serve,

    /// Print version, commit and build date
    Version,

    /// Print the registered tool schemas as JSON
    Tools,

    /// Validate a command offline and print the verdict
    Check {
        /// Full command string, e.g. "kubectl get pods -A"
        command: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
}
