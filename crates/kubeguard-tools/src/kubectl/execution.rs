//! Guarded kubectl execution

use super::interactive::check_interactive;
use super::validation::validate;
use kubeguard_core::config::{HostEnvironment, PathResolver, SystemEnvironment};
use kubeguard_core::tools::ExecResult;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Runs validated kubectl commands through a shell
///
/// Every failure comes back as an [`ExecResult`] with `error` set; nothing
/// here returns `Err` or panics on a misbehaving child.
#[derive(Debug, Clone)]
pub struct Executor<E = SystemEnvironment> {
    shell: PathBuf,
    shell_args: Vec<String>,
    resolver: PathResolver<E>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// `bash -c` on POSIX (located on `PATH`, else `/bin/bash`), `%COMSPEC% /c` on Windows
    pub fn new() -> Self {
        let (shell, flag) = default_shell();
        Self {
            shell,
            shell_args: vec![flag.to_string()],
            resolver: PathResolver::system(),
        }
    }
}

impl<E: HostEnvironment> Executor<E> {
    /// Replace the interpreter; the command string is appended after `args`
    pub fn with_shell<I, S>(mut self, shell: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shell = shell.into();
        self.shell_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the kubeconfig resolver
    pub fn with_resolver<F: HostEnvironment>(self, resolver: PathResolver<F>) -> Executor<F> {
        Executor {
            shell: self.shell,
            shell_args: self.shell_args,
            resolver,
        }
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Run a command to completion
    pub async fn execute(&self, command: &str, workdir: &Path, kubeconfig: &str) -> ExecResult {
        self.execute_until(command, workdir, kubeconfig, &CancellationToken::new(), None)
            .await
    }

    /// Run a command until it exits, the token fires or the timeout elapses
    ///
    /// The command is validated again here, so this is safe to call without
    /// going through the tool. An empty `kubeconfig` leaves `KUBECONFIG`
    /// unset for the child.
    #[instrument(
        skip(self, workdir, kubeconfig, cancellation),
        fields(command_preview = %command.chars().take(50).collect::<String>())
    )]
    pub async fn execute_until(
        &self,
        command: &str,
        workdir: &Path,
        kubeconfig: &str,
        cancellation: &CancellationToken,
        timeout: Option<Duration>,
    ) -> ExecResult {
        if let Err(e) = validate(command) {
            warn!(error = %e, "refusing to execute command");
            return ExecResult::rejected(format!("Security validation failed: {}", e));
        }
        if let Err(e) = check_interactive(command) {
            return ExecResult::rejected(e.to_string());
        }

        let invoked = self.describe_invocation(command);
        if cancellation.is_cancelled() {
            return ExecResult::rejected("command cancelled").with_command(invoked);
        }

        let mut cmd = Command::new(&self.shell);
        cmd.args(&self.shell_args)
            .arg(command)
            .current_dir(workdir)
            .env_remove(KUBECONFIG_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if !kubeconfig.is_empty() {
            match self.resolver.resolve(kubeconfig) {
                Ok(path) => {
                    debug!(kubeconfig = %path.display(), "injecting KUBECONFIG");
                    cmd.env(KUBECONFIG_ENV, path);
                }
                Err(e) => {
                    return ExecResult::rejected(format!(
                        "invalid kubeconfig path {:?}: {}",
                        kubeconfig, e
                    ))
                    .with_command(invoked);
                }
            }
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(shell = %self.shell.display(), error = %e, "failed to spawn shell");
                return ExecResult::rejected(e.to_string()).with_command(invoked);
            }
        };

        let started = Instant::now();
        debug!(pid = ?child.id(), "spawned shell");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let output = Mutex::new(Vec::new());

        let outcome = {
            let run = async {
                tokio::join!(drain(stdout, &output), drain(stderr, &output));
                child.wait().await
            };

            tokio::select! {
                status = run => Outcome::Exited(status),
                _ = cancellation.cancelled() => Outcome::Cancelled,
                _ = sleep_for(timeout) => Outcome::TimedOut,
            }
        };

        let mut result = ExecResult {
            command: invoked,
            ..Default::default()
        };

        match outcome {
            Outcome::Exited(Ok(status)) => {
                if !status.success() {
                    match status.code() {
                        Some(code) => {
                            result.exit_code = code;
                            result.error = format!("exit status {}", code);
                        }
                        None => {
                            result.exit_code = -1;
                            result.error = status.to_string();
                        }
                    }
                }
            }
            Outcome::Exited(Err(e)) => result.error = e.to_string(),
            Outcome::Cancelled => {
                kill(&mut child).await;
                result.error = "command cancelled".to_string();
            }
            Outcome::TimedOut => {
                kill(&mut child).await;
                result.error = format!(
                    "command timed out after {} seconds",
                    format_seconds(timeout.unwrap_or_default())
                );
            }
        }

        let bytes = output.into_inner().unwrap_or_else(PoisonError::into_inner);
        result.stdout = String::from_utf8_lossy(&bytes).into_owned();

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if result.is_error() {
            debug!(error = %result.error, exit_code = result.exit_code, elapsed_ms, "command failed");
        } else {
            debug!(elapsed_ms, "command finished");
        }
        result
    }

    fn describe_invocation(&self, command: &str) -> String {
        let mut parts = vec![self.shell.display().to_string()];
        parts.extend(self.shell_args.iter().cloned());
        parts.push(command.to_string());
        parts.join(" ")
    }
}

enum Outcome {
    Exited(std::io::Result<std::process::ExitStatus>),
    Cancelled,
    TimedOut,
}

/// Append everything from `reader` to `sink` as it arrives
async fn drain<R: AsyncRead + Unpin>(reader: Option<R>, sink: &Mutex<Vec<u8>>) {
    let Some(mut reader) = reader else {
        return;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => return,
            Ok(n) => sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(&chunk[..n]),
            Err(e) => {
                debug!(error = %e, "stopped reading child output");
                return;
            }
        }
    }
}

async fn sleep_for(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

async fn kill(child: &mut tokio::process::Child) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "failed to kill child");
    }
}

fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        duration.as_secs().to_string()
    } else {
        format!("{:.1}", duration.as_secs_f64())
    }
}

fn default_shell() -> (PathBuf, &'static str) {
    if cfg!(windows) {
        let comspec = std::env::var_os("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("cmd.exe"));
        (comspec, "/c")
    } else {
        let bash = which::which("bash").unwrap_or_else(|_| PathBuf::from("/bin/bash"));
        (bash, "-c")
    }
}
