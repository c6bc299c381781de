//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use anyhow::Context;
use kubeguard_core::config::{Config, load_from_file};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Some(Commands::Version) => {
            commands::version::show_version();
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Tools) => {
            commands::tools::show_tools()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check { command, json }) => {
            init_logging(cli.verbose);
            let verdict = commands::check::evaluate(command);
            commands::check::print_verdict(&verdict, *json)?;
            Ok(if verdict.allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Commands::Serve) | None => route_serve(cli).await,
    }
}

async fn route_serve(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_from_file(&cli.config_file).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config_file.display()
        )
    })?;
    init_logging(cli.verbose || config.debug);

    let kubeconfig = select_kubeconfig(cli.kubeconfig.as_deref(), &config);
    commands::serve::serve(&config, kubeconfig).await?;
    Ok(ExitCode::SUCCESS)
}

/// Flag (or its env var) first, then the config file, then kubectl's default
pub fn select_kubeconfig(flag: Option<&str>, config: &Config) -> String {
    match flag {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => config.kubeconfig_path(),
    }
}

/// Log to stderr; stdout belongs to the protocol stream
///
/// `RUST_LOG` wins when set.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
