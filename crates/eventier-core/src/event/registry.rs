use std::any::TypeId;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use crate::event::binding::{ListenerBinding, OwnerId};
use crate::event::EventType;

/// Bindings for one event type, kept sorted by descending priority
struct EventListeners {
    event_type: EventType,
    bindings: Vec<ListenerBinding>,
}

/// Registry mapping event types to their priority-ordered bindings
///
/// Invariants:
/// - every key maps to a non-empty sequence; emptied keys are removed
/// - each sequence is sorted by descending priority, ties keep registration order
pub struct ListenerRegistry {
    listeners: HashMap<TypeId, EventListeners>,
}

// Manual Debug implementation
impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_types: Vec<&EventType> = self.listeners.values().map(|l| &l.event_type).collect();
        f.debug_struct("ListenerRegistry")
         .field("event_types", &event_types)
         .field("bindings_count", &self.binding_count())
         .finish()
    }
}

impl ListenerRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Append a binding and re-sort its sequence.
    ///
    /// No uniqueness check: adding the same binding twice yields two entries.
    pub fn add(&mut self, event_type: EventType, binding: ListenerBinding) {
        let entry = self.listeners.entry(event_type.id()).or_insert_with(|| EventListeners {
            event_type,
            bindings: Vec::new(),
        });
        entry.bindings.push(binding);
        // `sort_by_key` is stable, equal priorities keep insertion order
        entry.bindings.sort_by_key(|b| Reverse(b.priority()));
    }

    /// Remove a single binding by owner and handler identity
    pub fn remove(&mut self, event_type: &EventType, binding: &ListenerBinding) -> bool {
        let Some(entry) = self.listeners.get_mut(&event_type.id()) else {
            return false;
        };
        let Some(position) = entry.bindings.iter().position(|b| b == binding) else {
            return false;
        };
        entry.bindings.remove(position);
        if entry.bindings.is_empty() {
            self.listeners.remove(&event_type.id());
        }
        true
    }

    /// Remove every binding owned by `owner`, across all event types
    pub fn remove_owner(&mut self, owner: OwnerId) -> bool {
        self.remove_where(|b| b.owner() == Some(owner))
    }

    /// Remove the type-level bindings declared by the listener type `declared_by`
    pub fn remove_declared(&mut self, declared_by: TypeId) -> bool {
        self.remove_where(|b| b.is_type_level() && b.declared_by() == declared_by)
    }

    fn remove_where(&mut self, predicate: impl Fn(&ListenerBinding) -> bool) -> bool {
        let mut found = false;
        self.listeners.retain(|_, entry| {
            let len_before = entry.bindings.len();
            entry.bindings.retain(|b| !predicate(b));
            if entry.bindings.len() < len_before {
                found = true;
            }
            !entry.bindings.is_empty()
        });
        found
    }

    /// Bindings for an event type, in dispatch order
    pub fn get(&self, event_type: &EventType) -> Option<&[ListenerBinding]> {
        self.get_by_id(event_type.id())
    }

    pub fn get_by_id(&self, id: TypeId) -> Option<&[ListenerBinding]> {
        self.listeners.get(&id).map(|entry| entry.bindings.as_slice())
    }

    /// Copy of the whole mapping
    pub fn snapshot(&self) -> HashMap<EventType, Vec<ListenerBinding>> {
        self.listeners
            .values()
            .map(|entry| (entry.event_type, entry.bindings.clone()))
            .collect()
    }

    /// Number of event types with at least one binding
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Total number of bindings across all event types
    pub fn binding_count(&self) -> usize {
        self.listeners.values().map(|entry| entry.bindings.len()).sum()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
