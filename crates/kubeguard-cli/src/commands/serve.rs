//! Serve command implementation

use crate::signal_handler::SignalHandler;
use anyhow::Context;
use kubeguard_core::config::Config;
use kubeguard_core::mcp::{McpServer, McpServerOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Shared working directory for every kubectl call
pub fn work_dir() -> PathBuf {
    std::env::temp_dir().join("kubeguard")
}

/// Create the working directory, failing startup if that is impossible
pub fn prepare_work_dir(path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create work directory {}", path.display()))
}

/// Serve MCP over stdio until stdin closes or a signal arrives
pub async fn serve(config: &Config, kubeconfig: String) -> anyhow::Result<()> {
    let workdir = work_dir();
    prepare_work_dir(&workdir)?;

    let registry = kubeguard_tools::default_registry().context("failed to register tools")?;
    let options = McpServerOptions::from_config(config, kubeconfig, workdir);

    info!(
        name = %options.name,
        version = %options.version,
        kubeconfig = %options.kubeconfig,
        workdir = %options.workdir.display(),
        max_concurrent_ops = options.max_concurrent_ops,
        "starting MCP server on stdio"
    );

    let server = McpServer::new(registry, options);
    let mut signals = SignalHandler::new(server.shutdown_token());
    signals
        .start()
        .context("failed to install signal handlers")?;

    let result = server.serve_stdio().await;
    signals.stop();
    result.context("MCP transport failed")?;

    info!("MCP server stopped");
    Ok(())
}
