//! `TictacServer` builder and accept loop.
//!
//! This is the entry point for serving the game over TCP. It ties the
//! layers together: transport → protocol → registry → dispatcher → game.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tictac_protocol::{Codec, JsonCodec};
use tictac_service::{Registry, ServiceHost};
use tictac_transport::{TcpTransport, Transport};

use crate::handler::handle_connection;
use crate::{ServerConfig, TictacError};

/// Pause after a failed accept before trying again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared server state passed to each connection handler task.
///
/// The registry and host carry their own locks; nothing in here is locked
/// as a whole.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Arc<Registry>,
    pub(crate) host: Arc<ServiceHost>,
    pub(crate) codec: C,
    pub(crate) config: ServerConfig,
    pub(crate) stats: ServerStats,
}

/// Connection counters, readable while the server runs.
///
/// Cloning is cheap and every clone observes the same counters.
#[derive(Debug, Clone, Default)]
pub struct ServerStats {
    accepted: Arc<AtomicU64>,
    active: Arc<AtomicU64>,
}

impl ServerStats {
    /// Connections accepted since the server started.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Connections whose handler is still running.
    pub fn active(&self) -> u64 {
        self.active.load(Ordering::Relaxed)
    }

    pub(crate) fn connection_opened(&self) -> ActiveGuard {
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.active.fetch_add(1, Ordering::Relaxed);
        ActiveGuard {
            active: Arc::clone(&self.active),
        }
    }
}

/// Decrements the active count when a handler exits, however it exits.
pub(crate) struct ActiveGuard {
    active: Arc<AtomicU64>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Builder for configuring and starting a tictac server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> Result<(), tictac::TictacError> {
/// use tictac::TictacServer;
///
/// let server = TictacServer::builder()
///     .bind("127.0.0.1:5000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TictacServerBuilder {
    config: ServerConfig,
    registry: Option<Arc<Registry>>,
    host: Option<Arc<ServiceHost>>,
}

impl TictacServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: None,
            host: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the service every call is routed to.
    pub fn service_name(mut self, name: &str) -> Self {
        self.config.service_name = name.to_string();
        self
    }

    /// Sets the largest frame a connection may carry.
    pub fn max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.config.max_frame_len = max_frame_len;
        self
    }

    /// Drops connections that stay silent for longer than `timeout`.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = Some(timeout);
        self
    }

    /// Uses an existing registry instead of a fresh one.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses an existing service host, so in-process clients and remote
    /// clients play the same game.
    pub fn host(mut self, host: Arc<ServiceHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Binds the listener and pre-registers the configured service.
    ///
    /// Uses `JsonCodec` for frames.
    pub async fn build(self) -> Result<TictacServer<JsonCodec>, TictacError> {
        self.build_with_codec(JsonCodec).await
    }

    /// Like [`build`](Self::build), with a caller-chosen codec.
    pub async fn build_with_codec<C: Codec>(
        self,
        codec: C,
    ) -> Result<TictacServer<C>, TictacError> {
        let transport = TcpTransport::bind(&self.config.bind_addr)
            .await?
            .with_max_frame_len(self.config.max_frame_len);

        let registry = self.registry.unwrap_or_default();
        let host = self.host.unwrap_or_default();

        let name = &self.config.service_name;
        registry.rebind(name.as_str(), host.request_service(name));

        let state = Arc::new(ServerState {
            registry,
            host,
            codec,
            config: self.config,
            stats: ServerStats::default(),
        });

        Ok(TictacServer { transport, state })
    }
}

impl Default for TictacServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound tictac server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct TictacServer<C: Codec = JsonCodec> {
    transport: TcpTransport,
    state: Arc<ServerState<C>>,
}

impl TictacServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> TictacServerBuilder {
        TictacServerBuilder::new()
    }
}

impl<C: Codec> TictacServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.state.registry
    }

    pub fn host(&self) -> &Arc<ServiceHost> {
        &self.state.host
    }

    /// A handle on the connection counters that outlives `run`.
    pub fn stats(&self) -> ServerStats {
        self.state.stats.clone()
    }

    /// Runs the accept loop.
    ///
    /// Spawns one handler task per connection. A failing handler or a
    /// failed accept is logged and the loop carries on. Runs until the task
    /// is dropped or the process exits.
    pub async fn run(mut self) -> Result<(), TictacError> {
        tracing::info!(
            addr = ?self.local_addr().ok(),
            service = %self.state.config.service_name,
            "tictac server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                    // Errors like EMFILE repeat until something closes;
                    // pause before retrying.
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}
