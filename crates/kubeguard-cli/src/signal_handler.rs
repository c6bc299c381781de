//! Shutdown on SIGINT/SIGTERM
//!
//! The first signal cancels the server's root token, which in turn cancels
//! every in-flight kubectl call.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Signal handler tied to one cancellation token
pub struct SignalHandler {
    token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
    #[cfg(unix)]
    signals_handle: Option<signal_hook_tokio::Handle>,
}

impl SignalHandler {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            task_handle: None,
            #[cfg(unix)]
            signals_handle: None,
        }
    }

    /// Start listening for termination signals
    #[cfg(unix)]
    pub fn start(&mut self) -> std::io::Result<()> {
        use futures::stream::StreamExt;
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook_tokio::Signals;

        if self.task_handle.is_some() {
            return Ok(());
        }

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        self.signals_handle = Some(signals.handle());
        let token = self.token.clone();

        self.task_handle = Some(tokio::spawn(async move {
            if let Some(signal) = signals.next().await {
                let name = if signal == SIGTERM { "SIGTERM" } else { "SIGINT" };
                info!(signal = name, "shutting down");
                token.cancel();
            }
        }));
        Ok(())
    }

    /// Start listening for Ctrl-C
    #[cfg(not(unix))]
    pub fn start(&mut self) -> std::io::Result<()> {
        if self.task_handle.is_some() {
            return Ok(());
        }

        let token = self.token.clone();
        self.task_handle = Some(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
                token.cancel();
            }
        }));
        Ok(())
    }

    /// Stop listening; the token is left untouched
    pub fn stop(&mut self) {
        #[cfg(unix)]
        if let Some(handle) = self.signals_handle.take() {
            handle.close();
        }
        if let Some(task) = self.task_handle.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task_handle.is_some()
    }
}

impl Drop for SignalHandler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_stop() {
        let token = CancellationToken::new();
        let mut handler = SignalHandler::new(token.clone());
        assert!(!handler.is_active());

        handler.start().unwrap();
        assert!(handler.is_active());
        handler.start().unwrap();

        handler.stop();
        assert!(!handler.is_active());
        assert!(!token.is_cancelled());
    }
}
