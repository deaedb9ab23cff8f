use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `token` on Ctrl+C or SIGTERM
pub fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C signal, shutting down"),
            _ = terminate => info!("Received terminate signal, shutting down"),
            _ = token.cancelled() => return,
        }
        token.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn test_listener_does_not_cancel_without_signal() {
        let token = CancellationToken::new();
        spawn_shutdown_listener(token.clone());

        sleep(Duration::from_millis(50)).await;
        assert!(!token.is_cancelled());
        token.cancel();
    }

    #[tokio::test]
    async fn test_listener_exits_when_token_cancelled_elsewhere() {
        let token = CancellationToken::new();
        spawn_shutdown_listener(token.clone());
        token.cancel();

        let waited = timeout(Duration::from_millis(100), token.cancelled()).await;
        assert!(waited.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unix_terminate_signal_setup() {
        let mut stream = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();
        let result = timeout(Duration::from_millis(10), stream.recv()).await;
        assert!(result.is_err(), "Should timeout when no signal is sent");
    }
}
