//! Synchronous, priority-ordered, in-process event dispatch.
//!
//! Listener types declare their handlers through [`event::Listener`]; the
//! [`event::DefaultEventManager`] resolves them into bindings, keeps them in
//! priority order and runs them when an event is dispatched.
pub mod config;
pub mod error;
pub mod event;

// Re-export key public types/traits
pub use config::{CancellationPolicy, ConfigFormat, DispatcherConfig};
pub use error::{Error, Result};
pub use event::{
    Cancellable, DefaultEventManager, Event, EventDispatcher, EventManager, EventType,
    HandlerResult, Listener, ListenerPriority,
};

#[cfg(test)]
mod tests;
