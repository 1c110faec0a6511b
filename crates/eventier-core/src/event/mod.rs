pub mod binding;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod registry;
pub mod resolver;
pub mod sink;

use std::any::{Any, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Listener priority level.
///
/// Higher levels are dispatched first. Listeners sharing a level run in the
/// order they were registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerPriority {
    /// Dispatched last
    Lowest = 0,
    Low = 1,
    /// Default level for declared handlers
    #[default]
    Normal = 2,
    High = 3,
    /// Dispatched before everything else
    Highest = 4,
}

impl ListenerPriority {
    /// Numeric ordinal of this level
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Outcome of a single handler invocation
pub type HandlerResult = Result<(), Box<dyn StdError + Send + Sync>>;

/// Core event trait
///
/// `Hash` provides the fingerprint used to detect in-place mutation by a
/// handler, `Debug` renders the event in trace output.
pub trait Event: Any + Hash + fmt::Debug {
    /// Expose the cancellation capability, if this event has one
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }
}

/// Capability of events that can be cancelled by a handler
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn set_cancelled(&mut self, cancelled: bool);
}

/// Identity of a concrete event type
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: short_type_name(std::any::type_name::<E>()),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Unqualified type name, used in log output
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path from a type name, keeping generic arguments intact.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base_end = full.find('<').unwrap_or(full.len());
    match full[..base_end].rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// Re-export important types
pub use binding::{ListenerBinding, OwnerId};
pub use discovery::{Discovery, StaticDiscovery};
pub use dispatcher::EventDispatcher;
pub use error::EventSystemError;
pub use manager::{DefaultEventManager, EventManager};
pub use registry::ListenerRegistry;
pub use resolver::{Declarations, HandlerSpec, Listener, ListenerResolver, ResolvedListener, TypeRef};
pub use sink::{LogSink, Observation, ObservationSink};

// Test module declaration
#[cfg(test)]
mod tests;
