//! File-based configuration loading

use crate::config::model::Config;
use crate::error::{KubeguardError, KubeguardResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// The format follows the extension: `.toml`, `.yaml`/`.yml`, anything else
/// is parsed as JSON. A missing file yields the defaults.
pub fn load_from_file(path: &Path) -> KubeguardResult<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        KubeguardError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let parse_error = |format: &str, e: &dyn std::fmt::Display| {
        KubeguardError::config_with_context(
            format!("Failed to parse {} config: {}", format, e),
            format!("Deserializing {} configuration from '{}'", format, path.display()),
        )
    };

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error("TOML", &e))?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", &e))?
        }
        _ => serde_json::from_str(&content).map_err(|e| parse_error("JSON", &e))?,
    };

    Ok(config)
}
