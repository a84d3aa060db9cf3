//! HTTP server implementation

use crate::handlers::AppState;
use crate::router::build_router;
use crate::shutdown::ShutdownSignal;
use axum::Router;
use scriptweb_config::Config;
use scriptweb_core::{Error, Result};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Instant;

/// HTTP server
#[derive(Debug)]
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Build the server. Custom script files are read here.
    pub fn new(config: Config) -> Result<Self> {
        let state = AppState::from_config(&config)?;
        tracing::debug!(workflow = ?state.workflow(), "Script workflow ready");
        Ok(Self { config, state })
    }

    /// Get listen address
    pub fn listen_addr(&self) -> SocketAddr {
        self.config.server.listen
    }

    /// The router this server serves
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config.server)
    }

    /// Run until `shutdown` is triggered, then wait for in-flight requests
    /// for at most `server.shutdown_timeout`
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_addr())
            .await
            .map_err(|e| {
                Error::Runtime(format!("Failed to bind to {}: {}", self.listen_addr(), e))
            })?;

        tracing::info!(
            listen = %self.listen_addr(),
            environment = ?self.config.server.environment,
            variant = ?self.config.script.variant,
            "Server listening on http://{}",
            self.listen_addr()
        );

        let serve = axum::serve(listener, self.router())
            .with_graceful_shutdown({
                let shutdown = shutdown.clone();
                async move { shutdown.wait().await }
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                return result.map_err(|e| Error::Runtime(format!("Server error: {e}")));
            }
            _ = shutdown.wait() => {}
        }

        let shutdown_timeout = self.config.server.shutdown_timeout;
        let start = Instant::now();

        tracing::info!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Waiting for in-flight requests to complete"
        );

        match tokio::time::timeout(shutdown_timeout, &mut serve).await {
            Ok(result) => {
                result.map_err(|e| Error::Runtime(format!("Server error: {e}")))?;
                tracing::info!("All requests completed, shutting down cleanly");
            }
            Err(_) => {
                tracing::warn!("Shutdown timeout reached, forcing shutdown");
            }
        }

        tracing::info!(
            shutdown_duration_ms = start.elapsed().as_millis(),
            "Server stopped"
        );

        Ok(())
    }
}
