//! The service host: owns the dispatcher and hands out handles.

use std::sync::Arc;

use tictac_game::Scoreboard;

use crate::{Dispatcher, GameService, Registry, Service, ServiceHandle};

/// Name the game service is registered under.
pub const DEFAULT_SERVICE: &str = "TicTacToeGame";

/// Owns a [`Dispatcher`] with the game service registered on it, plus the
/// scoreboard that service records rounds on.
///
/// This is the object clients fall back to when the registry has no cached
/// handle.
#[derive(Debug)]
pub struct ServiceHost {
    dispatcher: Arc<Dispatcher>,
    scoreboard: Arc<Scoreboard>,
}

impl ServiceHost {
    /// Creates a host with one [`GameService`] under [`DEFAULT_SERVICE`].
    pub fn new() -> Self {
        let scoreboard = Arc::new(Scoreboard::new());
        let dispatcher = Arc::new(Dispatcher::new());
        dispatcher.register_service(
            DEFAULT_SERVICE,
            Arc::new(GameService::new(Arc::clone(&scoreboard))),
        );
        tracing::info!("service host initialized");
        Self {
            dispatcher,
            scoreboard,
        }
    }

    /// Returns a handle for `name` on this host's dispatcher.
    ///
    /// A handle is minted for any name. Asking for a service that isn't
    /// registered is not an error here; calls through the handle report
    /// `ServiceNotFound`.
    pub fn request_service(&self, name: &str) -> ServiceHandle {
        tracing::debug!(service = name, "service requested");
        ServiceHandle::new(name, Arc::clone(&self.dispatcher))
    }

    /// Looks `name` up in `registry`; on a miss, requests a handle from this
    /// host and caches it.
    pub fn resolve(&self, registry: &Registry, name: &str) -> ServiceHandle {
        if let Some(handle) = registry.lookup(name) {
            return handle;
        }
        tracing::debug!(service = name, "registry miss, requesting handle");
        let handle = self.request_service(name);
        registry.rebind(name, handle.clone());
        handle
    }

    /// Registers an additional service on the host's dispatcher.
    pub fn register(&self, name: &str, service: Arc<dyn Service>) {
        self.dispatcher.register_service(name, service);
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }
}

impl Default for ServiceHost {
    fn default() -> Self {
        Self::new()
    }
}
