//! Mock Sys AI Box HTTP server.
//!
//! Serves the device flow API under `/api/v1` and the approval console,
//! all backed by one in-memory [`PairingStore`].

pub mod pairing;
pub mod transport;

use pairing::{PairingSettings, PairingStore};

use crate::config::Config;

/// Mock box server.
pub struct MockServer {
    store: PairingStore,
    config: Config,
}

impl MockServer {
    /// Create a new server with an empty pairing store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = PairingStore::new(PairingSettings::from(&config));
        Self { store, config }
    }

    /// Build the router without binding a socket.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        transport::create_router(self.store.clone(), self.config.clone())
    }

    /// Run the HTTP server until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the socket cannot be bound.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr()?;

        if let Some(interval) = self.config.cleanup_interval {
            tracing::info!(interval_secs = interval.as_secs(), "Starting stale pairing cleanup");
            self.store.start_cleanup_task(interval);
        }

        let router = self.router();

        tracing::info!("HTTP server listening on http://{}", addr);
        tracing::info!("Console: {}", self.config.verification_uri());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for MockServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServer").field("config", &self.config).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
