//! Listener declaration and resolution.
//!
//! A listener type states its handlers once, in [`Listener::declare`]. The
//! [`ListenerResolver`] turns those declarations into [`ListenerBinding`]s,
//! either for the type itself (associated handlers only, no owner) or for a
//! live instance (every handler, owned by that instance). Resolution never
//! touches the registry.
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::event::binding::{ErasedHandler, ListenerBinding, OwnerRef};
use crate::event::error::EventSystemError;
use crate::event::{short_type_name, Event, EventType, HandlerResult, ListenerPriority};

/// A type that declares event handlers
///
/// ```
/// use eventier_core::event::{Declarations, Event, Listener, ListenerPriority};
///
/// #[derive(Debug, Hash)]
/// struct Ping { hops: u32 }
/// impl Event for Ping {}
///
/// struct Relay;
///
/// impl Listener for Relay {
///     fn declare(declarations: &mut Declarations<Self>) {
///         declarations
///             .handler("on_ping")
///             .priority(ListenerPriority::High)
///             .method(|_relay: &Relay, ping: &mut Ping| {
///                 ping.hops += 1;
///                 Ok(())
///             });
///     }
/// }
/// ```
pub trait Listener: Send + Sync + Sized + 'static {
    fn declare(declarations: &mut Declarations<Self>);
}

type MethodHandler<L> = Arc<dyn Fn(&L, &mut dyn Any) -> HandlerResult + Send + Sync>;

enum Receiver<L> {
    /// Needs an instance of the listener
    Method(MethodHandler<L>),
    /// Type-level handler
    Associated(ErasedHandler),
}

struct Declared<L> {
    name: Arc<str>,
    event_type: EventType,
    priority: ListenerPriority,
    listen_cancelled: bool,
    receiver: Receiver<L>,
}

/// Handler table filled in by [`Listener::declare`]
pub struct Declarations<L> {
    entries: Vec<Declared<L>>,
}

impl<L: Listener> Declarations<L> {
    fn collect() -> Self {
        let mut declarations = Self { entries: Vec::new() };
        L::declare(&mut declarations);
        declarations
    }

    /// Start declaring a handler. Defaults: `Normal` priority, not listening
    /// while cancelled.
    pub fn handler(&mut self, name: &str) -> HandlerSpec<'_, L> {
        let name: Arc<str> = format!("{}::{}", short_type_name(std::any::type_name::<L>()), name).into();
        HandlerSpec {
            declarations: self,
            name,
            priority: ListenerPriority::default(),
            listen_cancelled: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Metadata of a handler being declared
pub struct HandlerSpec<'a, L> {
    declarations: &'a mut Declarations<L>,
    name: Arc<str>,
    priority: ListenerPriority,
    listen_cancelled: bool,
}

impl<L: Listener> HandlerSpec<'_, L> {
    pub fn priority(mut self, priority: ListenerPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn listen_cancelled(mut self, listen_cancelled: bool) -> Self {
        self.listen_cancelled = listen_cancelled;
        self
    }

    /// Finish with a handler that runs against a subscribed instance
    pub fn method<E, F>(self, handler: F)
    where
        E: Event,
        F: Fn(&L, &mut E) -> HandlerResult + Send + Sync + 'static,
    {
        let name = self.name.clone();
        let erased: MethodHandler<L> = Arc::new(move |this: &L, event: &mut dyn Any| {
            match event.downcast_mut::<E>() {
                Some(event) => handler(this, event),
                None => Err(mismatch::<E>(&name).into()),
            }
        });
        self.push::<E>(Receiver::Method(erased));
    }

    /// Finish with a type-level handler that needs no instance
    pub fn associated<E, F>(self, handler: F)
    where
        E: Event,
        F: Fn(&mut E) -> HandlerResult + Send + Sync + 'static,
    {
        let name = self.name.clone();
        let erased: ErasedHandler = Arc::new(move |event: &mut dyn Any| {
            match event.downcast_mut::<E>() {
                Some(event) => handler(event),
                None => Err(mismatch::<E>(&name).into()),
            }
        });
        self.push::<E>(Receiver::Associated(erased));
    }

    fn push<E: Event>(self, receiver: Receiver<L>) {
        self.declarations.entries.push(Declared {
            name: self.name,
            event_type: EventType::of::<E>(),
            priority: self.priority,
            listen_cancelled: self.listen_cancelled,
            receiver,
        });
    }
}

fn mismatch<E: Event>(handler: &str) -> EventSystemError {
    EventSystemError::EventTypeMismatch {
        handler: handler.to_string(),
        expected: std::any::type_name::<E>(),
    }
}

/// Reference to a candidate listener type, as produced by discovery
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    resolve: Option<fn() -> Vec<ResolvedListener>>,
}

impl TypeRef {
    /// A type that declares handlers
    pub fn of<L: Listener>() -> Self {
        let resolve: fn() -> Vec<ResolvedListener> = ListenerResolver::type_level::<L>;
        Self {
            id: TypeId::of::<L>(),
            name: short_type_name(std::any::type_name::<L>()),
            resolve: Some(resolve),
        }
    }

    /// A type that declares nothing; resolves to no bindings
    pub fn opaque<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
            resolve: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_listener(&self) -> bool {
        self.resolve.is_some()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
         .field("name", &self.name)
         .field("listener", &self.is_listener())
         .finish()
    }
}

/// A binding together with the event type it listens to
#[derive(Debug, Clone)]
pub struct ResolvedListener {
    event_type: EventType,
    binding: ListenerBinding,
}

impl ResolvedListener {
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn binding(&self) -> &ListenerBinding {
        &self.binding
    }

    pub fn into_parts(self) -> (EventType, ListenerBinding) {
        (self.event_type, self.binding)
    }
}

/// Turns listener types and instances into bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerResolver;

impl ListenerResolver {
    /// Type-level bindings of a candidate type; associated handlers only.
    pub fn resolve_type(type_ref: &TypeRef) -> Vec<ResolvedListener> {
        match type_ref.resolve {
            Some(resolve) => resolve(),
            None => Vec::new(),
        }
    }

    /// Every handler of `instance`, owned by it. Bindings keep only a weak
    /// reference to the instance.
    pub fn resolve_instance<L: Listener>(instance: &Arc<L>) -> Vec<ResolvedListener> {
        let owner: OwnerRef = Arc::<L>::downgrade(instance);
        Declarations::<L>::collect()
            .entries
            .into_iter()
            .map(|declared| {
                let handler: ErasedHandler = match declared.receiver {
                    Receiver::Method(method) => {
                        let weak = Arc::downgrade(instance);
                        let listener = declared.name.clone();
                        Arc::new(move |event: &mut dyn Any| match weak.upgrade() {
                            Some(this) => method(&*this, event),
                            None => Err(EventSystemError::OwnerDropped {
                                listener: listener.to_string(),
                            }
                            .into()),
                        })
                    }
                    Receiver::Associated(handler) => handler,
                };
                ResolvedListener {
                    event_type: declared.event_type,
                    binding: ListenerBinding::new(
                        Some(owner.clone()),
                        handler,
                        declared.name,
                        declared.priority,
                        declared.listen_cancelled,
                        TypeId::of::<L>(),
                    ),
                }
            })
            .collect()
    }

    fn type_level<L: Listener>() -> Vec<ResolvedListener> {
        Declarations::<L>::collect()
            .entries
            .into_iter()
            .filter_map(|declared| match declared.receiver {
                Receiver::Associated(handler) => Some(ResolvedListener {
                    event_type: declared.event_type,
                    binding: ListenerBinding::new(
                        None,
                        handler,
                        declared.name,
                        declared.priority,
                        declared.listen_cancelled,
                        TypeId::of::<L>(),
                    ),
                }),
                Receiver::Method(_) => None,
            })
            .collect()
    }
}
