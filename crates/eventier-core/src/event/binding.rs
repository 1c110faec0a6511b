use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::event::{HandlerResult, ListenerPriority};

/// Type-erased handler callable. Downcasts the event back to its concrete type.
pub(crate) type ErasedHandler = Arc<dyn Fn(&mut dyn Any) -> HandlerResult + Send + Sync>;

/// Non-owning link from a binding to its subscribed instance.
pub(crate) type OwnerRef = Weak<dyn Any + Send + Sync>;

/// Identity of a subscribed listener instance.
///
/// Derived from the address of the instance's `Arc` allocation. Every owned
/// binding holds a `Weak` to that allocation, so the address cannot be reused
/// by another instance while such a binding is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(usize);

impl OwnerId {
    pub fn of<L: ?Sized>(instance: &Arc<L>) -> Self {
        OwnerId(Arc::as_ptr(instance) as *const () as usize)
    }

    fn of_weak(owner: &OwnerRef) -> Self {
        OwnerId(Weak::as_ptr(owner) as *const () as usize)
    }
}

/// A handler bound to one event type, with its dispatch metadata
#[derive(Clone)]
pub struct ListenerBinding {
    owner: Option<OwnerId>,
    // Keeps the owner's allocation, and with it the owner id, reserved
    _anchor: Option<OwnerRef>,
    handler: ErasedHandler,
    name: Arc<str>,
    priority: ListenerPriority,
    listen_cancelled: bool,
    declared_by: TypeId,
}

impl ListenerBinding {
    pub(crate) fn new(
        owner: Option<OwnerRef>,
        handler: ErasedHandler,
        name: Arc<str>,
        priority: ListenerPriority,
        listen_cancelled: bool,
        declared_by: TypeId,
    ) -> Self {
        Self {
            owner: owner.as_ref().map(OwnerId::of_weak),
            _anchor: owner,
            handler,
            name,
            priority,
            listen_cancelled,
            declared_by,
        }
    }

    /// Owning instance, `None` for type-level registrations
    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Qualified handler name, e.g. `Greeter::on_greet`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> ListenerPriority {
        self.priority
    }

    pub fn listen_cancelled(&self) -> bool {
        self.listen_cancelled
    }

    /// `TypeId` of the listener type that declared this handler
    pub fn declared_by(&self) -> TypeId {
        self.declared_by
    }

    pub fn is_type_level(&self) -> bool {
        self.owner.is_none()
    }

    pub(crate) fn invoke(&self, event: &mut dyn Any) -> HandlerResult {
        (self.handler)(event)
    }
}

/// Bindings are equal when they share owner identity and handler identity.
impl PartialEq for ListenerBinding {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Eq for ListenerBinding {}

// Manual Debug implementation, the handler closure has none
impl fmt::Debug for ListenerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerBinding")
         .field("name", &self.name)
         .field("owner", &self.owner)
         .field("priority", &self.priority)
         .field("listen_cancelled", &self.listen_cancelled)
         .finish_non_exhaustive()
    }
}
