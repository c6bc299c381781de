//! Offline verdict for a single command
//!
//! Runs the same gate the tool applies before spawning, without spawning.

use colored::Colorize;
use kubeguard_core::tools::ModifiesResource;
use kubeguard_tools::kubectl::{check_interactive, classify_mutation, validate};
use serde::Serialize;
use tracing::debug;

/// Outcome of checking one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub command: String,
    pub allowed: bool,
    /// Rejection message, in the form the tool would report it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub modifies_resource: ModifiesResource,
}

pub fn evaluate(command: &str) -> Verdict {
    let modifies_resource = classify_mutation(command);
    let reason = match validate(command) {
        Err(e) => Some(format!("Security violation: {}", e)),
        Ok(()) => check_interactive(command).err().map(|e| e.to_string()),
    };
    debug!(command, ?reason, %modifies_resource, "checked command");

    Verdict {
        command: command.to_string(),
        allowed: reason.is_none(),
        reason,
        modifies_resource,
    }
}

pub fn print_verdict(verdict: &Verdict, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
        return Ok(());
    }

    match &verdict.reason {
        None => println!("{} {}", "allowed:".green().bold(), verdict.command),
        Some(reason) => {
            println!("{} {}", "rejected:".red().bold(), verdict.command);
            println!("  {}", reason);
        }
    }
    println!("  modifies resource: {}", verdict.modifies_resource);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_command_allowed() {
        let verdict = evaluate("kubectl get pods -A");
        assert!(verdict.allowed);
        assert_eq!(verdict.reason, None);
        assert_eq!(verdict.modifies_resource, ModifiesResource::No);
    }

    #[test]
    fn test_mutating_command_allowed_and_labelled() {
        let verdict = evaluate("kubectl delete pod web-0");
        assert!(verdict.allowed);
        assert_eq!(verdict.modifies_resource, ModifiesResource::Yes);
    }

    #[test]
    fn test_injection_rejected() {
        let verdict = evaluate("kubectl get pods; rm -rf /");
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Security violation: command contains potentially dangerous pattern: ;")
        );
    }

    #[test]
    fn test_interactive_rejected() {
        let verdict = evaluate("kubectl exec web -it -- ps");
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("interactive mode not supported for kubectl, please use non-interactive commands")
        );
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(evaluate("kubectl get svc")).unwrap();
        assert_eq!(value["allowed"], true);
        assert_eq!(value["modifies_resource"], "no");
        assert!(value.get("reason").is_none());
    }
}
