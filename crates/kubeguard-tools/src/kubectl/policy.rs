//! Closed allowlist of kubectl subcommands

use std::fmt;
use std::str::FromStr;

/// A kubectl subcommand the tool will run
///
/// Anything not listed here is rejected, including real kubectl verbs such
/// as `run`, `edit` or `cp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Get,
    Describe,
    Logs,
    Exec,
    Top,
    Explain,
    Create,
    Apply,
    Delete,
    Patch,
    Replace,
    Scale,
    Rollout,
    Annotate,
    Label,
    Config,
    ClusterInfo,
    Version,
    ApiVersions,
    ApiResources,
    Diff,
    PortForward,
    Proxy,
    Auth,
    Certificate,
    Cordon,
    Uncordon,
    Drain,
    Taint,
    Wait,
}

impl Subcommand {
    pub const ALL: [Subcommand; 30] = [
        Self::Get,
        Self::Describe,
        Self::Logs,
        Self::Exec,
        Self::Top,
        Self::Explain,
        Self::Create,
        Self::Apply,
        Self::Delete,
        Self::Patch,
        Self::Replace,
        Self::Scale,
        Self::Rollout,
        Self::Annotate,
        Self::Label,
        Self::Config,
        Self::ClusterInfo,
        Self::Version,
        Self::ApiVersions,
        Self::ApiResources,
        Self::Diff,
        Self::PortForward,
        Self::Proxy,
        Self::Auth,
        Self::Certificate,
        Self::Cordon,
        Self::Uncordon,
        Self::Drain,
        Self::Taint,
        Self::Wait,
    ];

    /// The verb as typed on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Describe => "describe",
            Self::Logs => "logs",
            Self::Exec => "exec",
            Self::Top => "top",
            Self::Explain => "explain",
            Self::Create => "create",
            Self::Apply => "apply",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Replace => "replace",
            Self::Scale => "scale",
            Self::Rollout => "rollout",
            Self::Annotate => "annotate",
            Self::Label => "label",
            Self::Config => "config",
            Self::ClusterInfo => "cluster-info",
            Self::Version => "version",
            Self::ApiVersions => "api-versions",
            Self::ApiResources => "api-resources",
            Self::Diff => "diff",
            Self::PortForward => "port-forward",
            Self::Proxy => "proxy",
            Self::Auth => "auth",
            Self::Certificate => "certificate",
            Self::Cordon => "cordon",
            Self::Uncordon => "uncordon",
            Self::Drain => "drain",
            Self::Taint => "taint",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subcommand {
    type Err = ();

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sub| sub.as_str() == s)
            .ok_or(())
    }
}

/// Whether a verb is on the allowlist
pub fn is_allowed(verb: &str) -> bool {
    verb.parse::<Subcommand>().is_ok()
}
