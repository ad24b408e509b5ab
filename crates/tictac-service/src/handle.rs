//! Service handles: a service name paired with the dispatcher that runs it.

use std::fmt;
use std::sync::Arc;

use tictac_protocol::{GameCall, RemoteError, WireValue};

use crate::Dispatcher;

/// A shareable reference to a service.
///
/// A handle is immutable; cloning it only bumps reference counts. Any
/// number of clients and registries can hold the same handle.
#[derive(Clone)]
pub struct ServiceHandle {
    name: Arc<str>,
    dispatcher: Arc<Dispatcher>,
}

impl ServiceHandle {
    pub fn new(name: impl Into<Arc<str>>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    /// The service name this handle resolves to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Invokes a raw method on the referenced service.
    pub fn invoke(
        &self,
        method: &str,
        args: &[WireValue],
    ) -> Result<WireValue, RemoteError> {
        self.dispatcher.handle_request(&self.name, method, args)
    }

    /// Invokes a typed call on the referenced service.
    pub fn call(&self, call: GameCall) -> Result<WireValue, RemoteError> {
        self.dispatcher.dispatch(&self.name, call)
    }
}

/// Two handles are equal when they name the same service on the *same*
/// dispatcher instance.
impl PartialEq for ServiceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && Arc::ptr_eq(&self.dispatcher, &other.dispatcher)
    }
}

impl Eq for ServiceHandle {}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("name", &self.name)
            .field("dispatcher", &self.dispatcher.describe())
            .finish()
    }
}
