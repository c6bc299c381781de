//! Typed per-call execution context

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A required context field was not supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("kubeconfig not provided in context")]
    MissingKubeconfig,

    #[error("workdir not provided in context")]
    MissingWorkdir,
}

/// Everything a tool needs to run one call
///
/// The working directory is created once per server process and shared by
/// every call. The kubeconfig may be `Some("")`, meaning kubectl should fall
/// back to its own default lookup.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    workdir: Option<PathBuf>,
    kubeconfig: Option<String>,
    cancellation: CancellationToken,
    timeout: Option<Duration>,
}

impl ExecutionContext {
    /// Context with both required fields populated
    pub fn new(workdir: impl Into<PathBuf>, kubeconfig: impl Into<String>) -> Self {
        Self {
            workdir: Some(workdir.into()),
            kubeconfig: Some(kubeconfig.into()),
            ..Self::default()
        }
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn with_kubeconfig(mut self, kubeconfig: impl Into<String>) -> Self {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn workdir(&self) -> Result<&Path, ContextError> {
        self.workdir.as_deref().ok_or(ContextError::MissingWorkdir)
    }

    pub fn kubeconfig(&self) -> Result<&str, ContextError> {
        self.kubeconfig
            .as_deref()
            .ok_or(ContextError::MissingKubeconfig)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_missing_fields() {
        let ctx = ExecutionContext::default();
        assert_eq!(ctx.kubeconfig(), Err(ContextError::MissingKubeconfig));
        assert_eq!(ctx.workdir().unwrap_err(), ContextError::MissingWorkdir);
        assert_eq!(
            ContextError::MissingWorkdir.to_string(),
            "workdir not provided in context"
        );
    }

    #[test]
    fn test_empty_kubeconfig_is_present() {
        let ctx = ExecutionContext::new("/tmp/kubeguard", "");
        assert_eq!(ctx.kubeconfig(), Ok(""));
        assert_eq!(ctx.workdir().unwrap(), Path::new("/tmp/kubeguard"));
        assert!(ctx.timeout().is_none());
    }
}
