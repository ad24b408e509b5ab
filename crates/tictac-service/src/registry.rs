//! The service registry: a name → handle cache.
//!
//! Clients consult the registry before asking the service host for a
//! handle. Entries never expire; they are replaced by `rebind` and dropped
//! only by `unbind` or `clear`. There is no TTL because handles never go
//! stale within one process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ServiceHandle;

/// One line of [`Registry::display_cache`] output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The registry key.
    pub service: String,
    /// The service name stored in the handle.
    pub location: String,
    /// Description of the dispatcher the handle points at.
    pub dispatcher: String,
}

/// Thread-safe cache of service handles.
///
/// One mutex guards the map. Every operation is a single short critical
/// section, so the lock is never held while a call runs.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, ServiceHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, ServiceHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached handle for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<ServiceHandle> {
        self.entries().get(name).cloned()
    }

    /// Binds `name` to `handle`, replacing any existing binding.
    pub fn rebind(&self, name: impl Into<String>, handle: ServiceHandle) {
        let name = name.into();
        tracing::info!(service = %name, "service bound in registry");
        self.entries().insert(name, handle);
    }

    /// Removes the binding for `name`. Does nothing if there is none.
    pub fn unbind(&self, name: &str) {
        if self.entries().remove(name).is_some() {
            tracing::info!(service = name, "service unbound from registry");
        }
    }

    /// Removes every binding.
    pub fn clear(&self) {
        self.entries().clear();
        tracing::info!("registry cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Lists the cached entries and logs them. Diagnostic only; the order
    /// is unspecified.
    pub fn display_cache(&self) -> Vec<CacheEntry> {
        let listing: Vec<CacheEntry> = self
            .entries()
            .iter()
            .map(|(service, handle)| CacheEntry {
                service: service.clone(),
                location: handle.name().to_string(),
                dispatcher: handle.dispatcher().describe(),
            })
            .collect();

        if listing.is_empty() {
            tracing::info!("registry cache is empty");
        }
        for entry in &listing {
            tracing::info!(
                service = %entry.service,
                location = %entry.location,
                dispatcher = %entry.dispatcher,
                "cached service"
            );
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Dispatcher;

    fn handle(name: &str) -> ServiceHandle {
        ServiceHandle::new(name, Arc::new(Dispatcher::new()))
    }

    #[test]
    fn test_lookup_on_never_bound_name_is_none() {
        assert!(Registry::new().lookup("TicTacToeGame").is_none());
    }

    #[test]
    fn test_rebind_then_lookup_returns_the_bound_handle() {
        let registry = Registry::new();
        let h = handle("TicTacToeGame");
        registry.rebind("TicTacToeGame", h.clone());
        assert_eq!(registry.lookup("TicTacToeGame"), Some(h));
    }

    #[test]
    fn test_rebind_overwrites() {
        let registry = Registry::new();
        let first = handle("TicTacToeGame");
        let second = handle("TicTacToeGame");
        registry.rebind("TicTacToeGame", first.clone());
        registry.rebind("TicTacToeGame", second.clone());

        let found = registry.lookup("TicTacToeGame").unwrap();
        assert_eq!(found, second);
        assert_ne!(found, first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unbind_then_lookup_is_none() {
        let registry = Registry::new();
        registry.rebind("TicTacToeGame", handle("TicTacToeGame"));
        registry.unbind("TicTacToeGame");
        assert!(registry.lookup("TicTacToeGame").is_none());

        // Unbinding again is a no-op.
        registry.unbind("TicTacToeGame");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let registry = Registry::new();
        registry.rebind("a", handle("a"));
        registry.rebind("b", handle("b"));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.display_cache().is_empty());
    }

    #[test]
    fn test_display_cache_lists_every_entry() {
        let registry = Registry::new();
        registry.rebind("a", handle("a"));
        registry.rebind("alias", handle("b"));

        let mut listing = registry.display_cache();
        listing.sort_by(|x, y| x.service.cmp(&y.service));
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].service, "a");
        assert_eq!(listing[1].service, "alias");
        assert_eq!(listing[1].location, "b");
        assert!(listing[1].dispatcher.starts_with("Dispatcher#"));
    }
}
