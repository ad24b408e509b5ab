//! Routes named method calls to registered services.
//!
//! The dispatcher is the server-side "skeleton" of the RMI layer: it takes a
//! service name, a method name and raw arguments, and turns them into a call
//! on a concrete service. Every failure along the way is a
//! [`RemoteError`] value, so a malformed request can never take a
//! connection handler down.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tictac_protocol::{GameCall, RemoteError, WireValue};

use crate::Service;

static NEXT_DISPATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// Holds the registered services and executes calls against them.
///
/// The service map has its own lock, separate from each game's lock. A
/// call clones the service's `Arc` out of the map and releases the map lock
/// before running, so a slow move never blocks a registration and a
/// registration never waits on a move.
pub struct Dispatcher {
    id: u64,
    services: RwLock<HashMap<String, Arc<dyn Service>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            id: NEXT_DISPATCHER_ID.fetch_add(1, Ordering::Relaxed),
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `service` under `name`, replacing any previous entry.
    pub fn register_service(
        &self,
        name: impl Into<String>,
        service: Arc<dyn Service>,
    ) {
        let name = name.into();
        tracing::info!(
            dispatcher = self.id,
            service = %name,
            kind = %service.describe(),
            "service registered"
        );
        self.services
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, service);
    }

    /// Returns the service registered under `name`.
    pub fn service(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Names of all registered services, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Handles one raw request.
    ///
    /// Resolution order: the service must exist (`ServiceNotFound`), the
    /// method must be known (`UnknownMethod`), the arguments must fit
    /// (`InvalidArguments`); only then does the game run.
    pub fn handle_request(
        &self,
        service_name: &str,
        method: &str,
        args: &[WireValue],
    ) -> Result<WireValue, RemoteError> {
        let service = self
            .service(service_name)
            .ok_or_else(|| RemoteError::service_not_found(service_name))?;
        let call = GameCall::parse(method, args)?;

        tracing::debug!(
            dispatcher = self.id,
            service = service_name,
            %method,
            "dispatching"
        );
        Self::run(&*service, service_name, call)
    }

    /// Handles one already-typed call. Used by in-process callers that
    /// never had a raw method name to begin with.
    pub fn dispatch(
        &self,
        service_name: &str,
        call: GameCall,
    ) -> Result<WireValue, RemoteError> {
        let service = self
            .service(service_name)
            .ok_or_else(|| RemoteError::service_not_found(service_name))?;
        Self::run(&*service, service_name, call)
    }

    fn run(
        service: &dyn Service,
        service_name: &str,
        call: GameCall,
    ) -> Result<WireValue, RemoteError> {
        let Some(game) = service.as_game() else {
            return Err(RemoteError::new(
                tictac_protocol::ErrorKind::UnknownMethod,
                format!(
                    "Error: Service '{service_name}' does not support '{}'.",
                    call.method()
                ),
            ));
        };
        game.execute(call)
    }

    /// One-line description used by registry diagnostics.
    pub fn describe(&self) -> String {
        let count = self
            .services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        format!("Dispatcher#{} ({count} service(s))", self.id)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("id", &self.id)
            .field("services", &self.service_names())
            .finish()
    }
}
