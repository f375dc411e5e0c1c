//! Router HTTP listener
//!
//! Binds the TCP listener, serves the HTTP routes, and owns the lifetime of
//! the registry's sweep task.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::registry::{ChannelRegistry, RegistryConfig};
use crate::server::config::ServerConfig;
use crate::server::routes;

/// Stream redirection server
pub struct RouterServer {
    config: ServerConfig,
    registry: Arc<ChannelRegistry>,
}

impl RouterServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig, registry_config: RegistryConfig) -> Self {
        Self::with_registry(config, Arc::new(ChannelRegistry::with_config(registry_config)))
    }

    /// Create a new server around an existing registry
    pub fn with_registry(config: ServerConfig, registry: Arc<ChannelRegistry>) -> Self {
        Self { config, registry }
    }

    /// Get a reference to the channel registry
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Build the HTTP router for this server
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.registry), &self.config)
    }

    /// Run the server
    ///
    /// This method blocks until the listener fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.validate()?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.validate()?;
        let addr = listener.local_addr()?;
        tracing::info!(
            addr = %addr,
            sweep_interval_secs = self.registry.config().sweep_interval.as_secs_f64(),
            expiry_threshold_secs = self.registry.config().expiry_threshold.as_secs_f64(),
            "Router listening"
        );

        // Spawn sweep task for channel registry
        let sweep_handle = self.registry.spawn_sweep_task();

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await
            .map_err(Error::from);

        // Stop sweep task on shutdown
        sweep_handle.abort();

        result
    }

    fn validate(&self) -> Result<()> {
        if self.config.auth_key.is_empty() {
            return Err(Error::Config("an authorization key is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;
    use crate::registry::ChannelId;

    async fn send_raw(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_run_requires_key() {
        let config = ServerConfig::with_addr("127.0.0.1:0".parse().unwrap());
        let server = RouterServer::new(config, RegistryConfig::default());

        let result = server.run().await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let config = ServerConfig::with_addr(addr).auth_key("secretkey");
        let server = Arc::new(RouterServer::new(config, RegistryConfig::default()));
        server
            .registry()
            .register(ChannelId::new(1234), "http://foobar/1234")
            .await;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                server
                    .serve(listener, async {
                        let _ = shutdown_rx.await;
                    })
                    .await
            })
        };

        let response = send_raw(
            addr,
            "GET /v1/whep/endpoint/1234 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 307"), "{}", response);
        assert!(response.to_ascii_lowercase().contains("location: http://foobar/1234"));

        let body = "channel_id=1234";
        let request = format!(
            "POST /v1/state/end_stream HTTP/1.1\r\nHost: localhost\r\nAuthorization: secretkey\r\n\
             Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let response = send_raw(addr, &request).await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);

        let response = send_raw(
            addr,
            "GET /v1/whep/endpoint/1234 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404"), "{}", response);

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
