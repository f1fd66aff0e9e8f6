use tokio::{sync::broadcast, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{ProxyErrorEvent, ProxyErrorKind};

/// Background task writing proxy errors to the log
///
/// Dropping the logger stops the task, even while other handles keep the channel open.
pub struct ProxyErrorLogger {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProxyErrorLogger {
    /// Spawns the logger on the current runtime
    ///
    /// Runs until [`ProxyErrorLogger::shutdown`] is called or every sender is dropped.
    pub fn spawn(mut events: broadcast::Receiver<ProxyErrorEvent>) -> Self {
        let cancel_token = CancellationToken::new();
        let cancel = cancel_token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = events.recv() => match received {
                        Ok(event) => log_event(&event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Proxy error logger fell behind, events dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }

            tracing::debug!("Proxy error logger stopped");
        });

        Self {
            cancel_token,
            handle,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the logger and waits for it to finish
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Err(e) = (&mut self.handle).await {
            tracing::error!(error = %e, "Proxy error logger panicked");
        }
    }

    /// Waits for the logger to stop on its own, i.e. after the channel closed
    pub async fn join(mut self) {
        if let Err(e) = (&mut self.handle).await {
            tracing::error!(error = %e, "Proxy error logger panicked");
        }
    }
}

impl Drop for ProxyErrorLogger {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

fn log_event(event: &ProxyErrorEvent) {
    match &event.error {
        ProxyErrorKind::Response(e) => tracing::error!(
            event = event.name(),
            host = %e.host,
            status = e.status,
            error = %e,
            "Caching proxy returned an error response"
        ),
        ProxyErrorKind::Unreachable(e) => tracing::error!(
            event = event.name(),
            host = %e.host,
            error = %e,
            "Caching proxy is unreachable"
        ),
    }
}
