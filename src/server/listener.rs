//! Room server
//!
//! Binds the listener and serves the room API until shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::Result;
use crate::registry::{RegistryConfig, RoomRegistry};
use crate::server::config::ServerConfig;
use crate::server::routes::{self, AppState};

/// Room synchronization server
pub struct RoomServer {
    config: ServerConfig,
    registry: Arc<RoomRegistry>,
}

impl RoomServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry_config(config, RegistryConfig::default())
    }

    /// Create a new server with custom registry configuration
    pub fn with_registry_config(config: ServerConfig, registry_config: RegistryConfig) -> Self {
        Self {
            config,
            registry: Arc::new(RoomRegistry::with_config(registry_config)),
        }
    }

    /// Get a reference to the room registry
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server fails or the process exits.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Room server listening");

        axum::serve(listener, self.router()).await?;

        Ok(())
    }

    /// Run the server with graceful shutdown
    ///
    /// In-flight requests finish after `shutdown` resolves; event streams
    /// close, which releases their subscriptions.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Room server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Shutdown complete");

        Ok(())
    }

    fn router(&self) -> axum::Router {
        routes::router(AppState {
            registry: Arc::clone(&self.registry),
            keepalive_interval: self.config.keepalive_interval,
        })
    }
}
