use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::DispatcherConfig;
use crate::event::binding::{ListenerBinding, OwnerId};
use crate::event::discovery::{Discovery, StaticDiscovery};
use crate::event::dispatcher::EventDispatcher;
use crate::event::error::EventSystemError;
use crate::event::resolver::{Listener, ListenerResolver, ResolvedListener, TypeRef};
use crate::event::{Event, EventType};

/// Event manager interface
///
/// Registration happens at two levels: types (`register_events`, bindings
/// without an owner) and instances (`subscribe`, bindings owned by the
/// instance). Nothing expires on its own; a subscribed instance stays
/// registered until `unsubscribe` is called for it.
pub trait EventManager {
    /// Register the type-level handlers of every given type
    fn register_events(&self, types: &[TypeRef]);

    /// Remove the type-level handlers previously registered for the given types
    fn unregister_events(&self, types: &[TypeRef]);

    /// Register every handler of `listener`, owned by that instance
    fn subscribe<L: Listener>(&self, listener: &Arc<L>) -> bool;

    /// Remove all bindings owned by `listener`. Returns whether any were removed.
    fn unsubscribe<L: Listener>(&self, listener: &Arc<L>) -> bool;

    /// Dispatch `event` and hand it back, possibly mutated by handlers
    fn on_event<E: Event>(&self, event: E) -> E;

    /// Copy of the current event type to bindings mapping
    fn listeners(&self) -> HashMap<EventType, Vec<ListenerBinding>>;
}

/// Default implementation of EventManager
///
/// Clones share the same dispatcher and registry.
#[derive(Clone)]
pub struct DefaultEventManager {
    dispatcher: Arc<EventDispatcher>,
    discovery: Arc<dyn Discovery>,
}

impl fmt::Debug for DefaultEventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultEventManager")
         .field("dispatcher", &self.dispatcher)
         .finish_non_exhaustive()
    }
}

impl DefaultEventManager {
    /// Create a new manager with the default configuration
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::from_dispatcher(EventDispatcher::with_config(config))
    }

    /// Wrap an already configured dispatcher (e.g. one with a custom sink)
    pub fn from_dispatcher(dispatcher: EventDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            discovery: Arc::new(StaticDiscovery::new()),
        }
    }

    /// Use `discovery` for namespace registration
    pub fn with_discovery(mut self, discovery: Arc<dyn Discovery>) -> Self {
        self.discovery = discovery;
        self
    }

    /// Get a reference to the underlying dispatcher Arc
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Discover the types under `namespace` and register their type-level
    /// handlers. Discovery failures propagate; nothing is registered then.
    pub fn register_events_from_namespace(&self, namespace: &str) -> Result<(), EventSystemError> {
        let types = self.discovery.discover(namespace)?;
        self.register_events(&types);
        Ok(())
    }

    /// Dispatch `event` in place
    pub fn on_event_mut<E: Event>(&self, event: &mut E) {
        self.dispatcher.dispatch_in_place(event);
    }
}

impl EventManager for DefaultEventManager {
    fn register_events(&self, types: &[TypeRef]) {
        let resolved: Vec<ResolvedListener> =
            types.iter().flat_map(ListenerResolver::resolve_type).collect();
        let count = self.dispatcher.add_all(resolved);
        log::debug!("Registered {} type-level handler(s) from {} type(s)", count, types.len());
    }

    fn unregister_events(&self, types: &[TypeRef]) {
        for type_ref in types.iter().filter(|t| t.is_listener()) {
            if self.dispatcher.remove_declared(type_ref.id()) {
                log::debug!("Unregistered type-level handlers of {}", type_ref.name());
            }
        }
    }

    fn subscribe<L: Listener>(&self, listener: &Arc<L>) -> bool {
        let resolved = ListenerResolver::resolve_instance(listener);
        let count = self.dispatcher.add_all(resolved);
        log::debug!("Subscribed {} handler(s) of {}", count, std::any::type_name::<L>());
        true
    }

    fn unsubscribe<L: Listener>(&self, listener: &Arc<L>) -> bool {
        self.dispatcher.remove_owner(OwnerId::of(listener))
    }

    fn on_event<E: Event>(&self, event: E) -> E {
        self.dispatcher.dispatch(event)
    }

    fn listeners(&self) -> HashMap<EventType, Vec<ListenerBinding>> {
        self.dispatcher.listeners()
    }
}

impl Default for DefaultEventManager {
    fn default() -> Self {
        Self::new()
    }
}
