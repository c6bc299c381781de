//! Command validation gate

use super::policy;
use super::scanner::{self, InjectionPattern};
use thiserror::Error;

/// Why a command was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("command cannot be empty")]
    Empty,

    #[error("only kubectl commands are allowed, got: {0}")]
    NotKubectl(String),

    #[error("command contains potentially dangerous pattern: {0}")]
    Injection(InjectionPattern),

    #[error("kubectl command must include a subcommand (e.g., 'kubectl get pods')")]
    MissingSubcommand,

    #[error("invalid or restricted kubectl subcommand: {0}")]
    Subcommand(String),
}

/// Decide whether a command may run
///
/// Pure; the checks run in a fixed order so the same input always yields
/// the same error: empty input, base command, injection scan, subcommand
/// presence, allowlist.
pub fn validate(command: &str) -> Result<(), ValidationError> {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Err(ValidationError::Empty);
    };

    let base = super::base_name(first);
    if base != "kubectl" {
        return Err(ValidationError::NotKubectl(base.to_string()));
    }

    if let Some(pattern) = scanner::find_injection(command) {
        return Err(ValidationError::Injection(pattern));
    }

    let Some(verb) = tokens.get(1) else {
        return Err(ValidationError::MissingSubcommand);
    };
    if !policy::is_allowed(verb) {
        return Err(ValidationError::Subcommand(verb.to_string()));
    }

    Ok(())
}
