//! Server-side plumbing for tictac: the dispatcher that routes calls to
//! services, the handles clients hold, and the registry that caches them.
//!
//! ```text
//! Registry ──lookup──▶ ServiceHandle ──invoke──▶ Dispatcher ──▶ GameService
//!     ▲                      ▲
//!     └──rebind── ServiceHost::request_service (on a cache miss)
//! ```

mod dispatcher;
mod handle;
mod host;
mod registry;
mod service;

pub use dispatcher::Dispatcher;
pub use handle::ServiceHandle;
pub use host::{DEFAULT_SERVICE, ServiceHost};
pub use registry::{CacheEntry, Registry};
pub use service::{GameService, RESET_MESSAGE, Service};
