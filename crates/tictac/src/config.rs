//! Server configuration.

use std::time::Duration;

use tictac_service::DEFAULT_SERVICE;
use tictac_transport::DEFAULT_MAX_FRAME_LEN;

/// Address the server listens on unless told otherwise.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Settings for a [`TictacServer`](crate::TictacServer).
///
/// Build one with `ServerConfig::default()` and override the fields you
/// care about, or go through
/// [`TictacServerBuilder`](crate::TictacServerBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address, e.g. `"127.0.0.1:0"` for an ephemeral port.
    pub bind_addr: String,

    /// Service every connection's calls are routed to.
    pub service_name: String,

    /// Largest frame either side of a connection may send, in bytes.
    pub max_frame_len: usize,

    /// How long a connection may sit between calls before the server
    /// drops it. `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            service_name: DEFAULT_SERVICE.to_string(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            idle_timeout: None,
        }
    }
}
