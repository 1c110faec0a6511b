use std::sync::Arc;

use crate::event::discovery::{Discovery, StaticDiscovery};
use crate::event::error::EventSystemError;
use crate::event::manager::{DefaultEventManager, EventManager};
use crate::event::resolver::TypeRef;
use crate::event::EventType;
use super::common::{HighSuffix, Tick, TickCounter};

fn catalogue() -> StaticDiscovery {
    let mut discovery = StaticDiscovery::new();
    discovery.register("app.listeners", TypeRef::of::<TickCounter>()).unwrap();
    discovery.register("app.listeners.greeting", TypeRef::of::<HighSuffix>()).unwrap();
    discovery.register("app.listeners", TypeRef::opaque::<String>()).unwrap();
    discovery
}

#[test]
fn test_register_from_namespace() {
    let manager = DefaultEventManager::new().with_discovery(Arc::new(catalogue()));

    manager.register_events_from_namespace("app.listeners").unwrap();

    // Only TickCounter declares an associated handler
    let listeners = manager.listeners();
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[&EventType::of::<Tick>()].len(), 1);
    assert_eq!(manager.on_event(Tick::default()).count, 1);
}

#[test]
fn test_unknown_namespace_registers_nothing() {
    let manager = DefaultEventManager::new().with_discovery(Arc::new(catalogue()));
    manager.register_events_from_namespace("other").unwrap();
    assert!(manager.listeners().is_empty());
}

#[test]
fn test_malformed_namespace_fails() {
    let manager = DefaultEventManager::new().with_discovery(Arc::new(catalogue()));

    let err = manager.register_events_from_namespace("app..listeners").unwrap_err();
    match err {
        EventSystemError::DiscoveryFailure { ref namespace, .. } => {
            assert_eq!(namespace, "app..listeners")
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("app..listeners"));
    assert!(manager.listeners().is_empty());
}

/// Discovery backed by something that can fail at runtime
struct Unavailable;

impl Discovery for Unavailable {
    fn discover(&self, namespace: &str) -> Result<Vec<TypeRef>, EventSystemError> {
        Err(EventSystemError::discovery(namespace, "catalogue unavailable"))
    }
}

#[test]
fn test_custom_discovery_failure_propagates() {
    let manager = DefaultEventManager::new().with_discovery(Arc::new(Unavailable));
    let err = manager.register_events_from_namespace("app").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Listener discovery failed for namespace 'app': catalogue unavailable"
    );
}

#[test]
fn test_namespace_registration_then_unregister() {
    let discovery = catalogue();
    let manager = DefaultEventManager::new().with_discovery(Arc::new(discovery.clone()));
    manager.register_events_from_namespace("app").unwrap();

    let types = discovery.discover("app").unwrap();
    manager.unregister_events(&types);
    assert!(manager.listeners().is_empty());
}
