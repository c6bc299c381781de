//! Detection of commands that need a TTY

use kubeguard_core::tools::ToolError;

pub const INTERACTIVE_MESSAGE: &str =
    "interactive mode not supported for kubectl, please use non-interactive commands";

/// Reject `exec -it`, `port-forward` and `edit`
///
/// Only kubectl commands are inspected; empty or foreign input passes, since
/// the validator owns those rejections.
pub fn check_interactive(command: &str) -> Result<(), ToolError> {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Ok(());
    };
    if super::base_name(first) != "kubectl" {
        return Ok(());
    }

    let padded = format!(" {} ", tokens.join(" "));
    let exec_tty = padded.contains(" exec ") && padded.contains(" -it");
    let port_forward = padded.contains(" port-forward ");
    let edit = padded.contains(" edit ");

    if exec_tty || port_forward || edit {
        return Err(ToolError::Interactive(INTERACTIVE_MESSAGE.to_string()));
    }
    Ok(())
}

pub fn is_interactive(command: &str) -> bool {
    check_interactive(command).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_with_tty_rejected() {
        let err = check_interactive("kubectl exec pod -it -- bash").unwrap_err();
        assert_eq!(err.to_string(), INTERACTIVE_MESSAGE);
        assert!(is_interactive("kubectl exec -it web-0 -- sh"));
    }

    #[test]
    fn test_exec_without_tty_allowed() {
        assert!(check_interactive("kubectl exec pod -- ps aux").is_ok());
        assert!(check_interactive("kubectl exec pod -i -- cat").is_ok());
    }

    #[test]
    fn test_port_forward_and_edit_rejected() {
        assert!(is_interactive("kubectl port-forward svc/web 8080:80"));
        assert!(is_interactive("kubectl edit deployment web"));
        assert!(is_interactive("kubectl edit"));
        assert!(is_interactive("kubectl\tport-forward\tpod/db 5432"));
    }

    #[test]
    fn test_words_inside_tokens_ignored() {
        assert!(!is_interactive("kubectl get configmap credit-limits"));
        assert!(!is_interactive("kubectl logs edit-server"));
    }

    #[test]
    fn test_partial_input_tolerated() {
        assert!(check_interactive("").is_ok());
        assert!(check_interactive("   ").is_ok());
        assert!(check_interactive("oc edit deployment web").is_ok());
        assert!(check_interactive("kubectl").is_ok());
    }

    #[test]
    fn test_path_qualified_kubectl_inspected() {
        assert!(is_interactive("/usr/local/bin/kubectl edit svc web"));
    }
}
