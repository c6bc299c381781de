//! Guarded kubectl tool
//!
//! A command string goes through [`validate`] (base command, injection
//! scan, subcommand allowlist), then [`check_interactive`], and only then to
//! the [`Executor`]. [`classify_mutation`] labels commands for logging and
//! never blocks anything.

mod execution;
mod interactive;
mod mutation;
mod policy;
mod scanner;
mod validation;

pub use execution::Executor;
pub use interactive::{INTERACTIVE_MESSAGE, check_interactive, is_interactive};
pub use mutation::classify_mutation;
pub use policy::{Subcommand, is_allowed};
pub use scanner::{
    BASE_PATTERNS, INTERPRETER_PATTERNS, InjectionPattern, contains_injection, find_injection,
};
pub use validation::{ValidationError, validate};

use async_trait::async_trait;
use kubeguard_core::config::{HostEnvironment, SystemEnvironment};
use kubeguard_core::tools::{
    ExecResult, ExecutionContext, ModifiesResource, Tool, ToolCall, ToolError, ToolParameter,
    ToolSchema,
};
use std::path::Path;
use tracing::{instrument, warn};

pub const TOOL_NAME: &str = "kubectl";

const DESCRIPTION: &str = "Execute kubectl commands to interact with your Kubernetes cluster. \
Use this tool to query cluster state, manage resources, and perform administrative tasks.

Note: Interactive commands (kubectl exec -it, kubectl edit, kubectl port-forward) are not supported. \
Use non-interactive alternatives instead.

Examples: kubectl get pods, kubectl describe deployment my-app, kubectl logs my-pod, \
kubectl exec my-pod -- ps aux";

const COMMAND_DESCRIPTION: &str = "The complete kubectl command to execute (include 'kubectl' prefix).

Examples:
- kubectl get pods
- kubectl describe deployment my-app
- kubectl logs my-pod --tail=50
- kubectl exec my-pod -- ps aux

Note: Interactive commands (exec -it, edit, port-forward) are not supported.";

const MODIFIES_RESOURCE_DESCRIPTION: &str =
    "Whether the command modifies cluster resources: \"yes\", \"no\", or \"unknown\"";

/// File name of the first token, so `/usr/bin/kubectl` counts as `kubectl`
pub(crate) fn base_name(token: &str) -> &str {
    Path::new(token)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(token)
}

/// The `kubectl` tool
#[derive(Debug, Clone)]
pub struct KubectlTool<E = SystemEnvironment> {
    executor: Executor<E>,
}

impl KubectlTool {
    pub fn new() -> Self {
        Self {
            executor: Executor::new(),
        }
    }
}

impl Default for KubectlTool {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HostEnvironment> KubectlTool<E> {
    /// Tool backed by a custom executor
    pub fn with_executor(executor: Executor<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Executor<E> {
        &self.executor
    }
}

#[async_trait]
impl<E: HostEnvironment + 'static> Tool for KubectlTool<E> {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("command", COMMAND_DESCRIPTION),
                ToolParameter::optional_string("modifies_resource", MODIFIES_RESOURCE_DESCRIPTION)
                    .with_enum(ModifiesResource::ALL.iter().map(|m| m.as_str())),
            ],
        )
    }

    #[instrument(skip(self, ctx, call), fields(call_id = %call.id))]
    async fn run(&self, ctx: &ExecutionContext, call: &ToolCall) -> ExecResult {
        let kubeconfig = match ctx.kubeconfig() {
            Ok(kubeconfig) => kubeconfig,
            Err(e) => return ExecResult::rejected(e.to_string()),
        };
        let workdir = match ctx.workdir() {
            Ok(workdir) => workdir,
            Err(e) => return ExecResult::rejected(e.to_string()),
        };

        let command = match call.argument("command") {
            None => return ExecResult::rejected("kubectl command not provided or is nil"),
            Some(value) => match value.as_str() {
                Some(command) => command,
                None => return ExecResult::rejected("kubectl command must be a string"),
            },
        };

        if let Err(e) = validate(command) {
            warn!(error = %e, "security violation");
            return ExecResult::rejected(format!("Security violation: {}", e));
        }

        self.executor
            .execute_until(
                command,
                workdir,
                kubeconfig,
                ctx.cancellation(),
                ctx.timeout(),
            )
            .await
    }

    fn is_interactive(&self, call: &ToolCall) -> Result<(), ToolError> {
        match call.get_str("command") {
            Some(command) => check_interactive(command),
            None => Ok(()),
        }
    }

    fn check_modifies_resource(&self, call: &ToolCall) -> ModifiesResource {
        call.get_str("command")
            .map(classify_mutation)
            .unwrap_or(ModifiesResource::Unknown)
    }
}
