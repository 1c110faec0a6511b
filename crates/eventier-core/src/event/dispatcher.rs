use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DispatcherConfig;
use crate::event::binding::{ListenerBinding, OwnerId};
use crate::event::error::EventSystemError;
use crate::event::registry::ListenerRegistry;
use crate::event::resolver::ResolvedListener;
use crate::event::sink::{LogSink, Observation, ObservationSink};
use crate::event::{Event, EventType, HandlerResult};

/// Synchronous event dispatcher
///
/// Owns the listener registry behind a lock. The lock guards registration,
/// removal and the snapshot taken at the start of each dispatch; it is never
/// held while a handler runs, so handlers may subscribe or unsubscribe
/// re-entrantly. Such changes take effect from the next dispatch.
pub struct EventDispatcher {
    registry: Mutex<ListenerRegistry>,
    config: DispatcherConfig,
    sink: Arc<dyn ObservationSink>,
}

// Manual Debug implementation for EventDispatcher
impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventDispatcher")
         .field("event_types_count", &registry.len())
         .field("bindings_count", &registry.binding_count())
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: Mutex::new(ListenerRegistry::new()),
            config,
            sink: Arc::new(LogSink),
        }
    }

    /// Replace the sink that receives dispatch observations
    pub fn with_sink(mut self, sink: Arc<dyn ObservationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn add(&self, resolved: ResolvedListener) {
        let (event_type, binding) = resolved.into_parts();
        self.registry.lock().add(event_type, binding);
    }

    /// Add several bindings under one lock. Returns how many were added.
    pub fn add_all(&self, resolved: impl IntoIterator<Item = ResolvedListener>) -> usize {
        let mut registry = self.registry.lock();
        let mut count = 0;
        for listener in resolved {
            let (event_type, binding) = listener.into_parts();
            registry.add(event_type, binding);
            count += 1;
        }
        count
    }

    pub fn remove(&self, event_type: &EventType, binding: &ListenerBinding) -> bool {
        self.registry.lock().remove(event_type, binding)
    }

    pub fn remove_owner(&self, owner: OwnerId) -> bool {
        self.registry.lock().remove_owner(owner)
    }

    pub fn remove_declared(&self, declared_by: TypeId) -> bool {
        self.registry.lock().remove_declared(declared_by)
    }

    /// Copy of the bindings for `E`, in dispatch order
    pub fn bindings_for<E: Event>(&self) -> Option<Vec<ListenerBinding>> {
        self.registry.lock().get(&EventType::of::<E>()).map(<[_]>::to_vec)
    }

    /// Copy of the whole registry mapping
    pub fn listeners(&self) -> HashMap<EventType, Vec<ListenerBinding>> {
        self.registry.lock().snapshot()
    }

    /// Number of event types with registered bindings
    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }

    pub fn clear(&self) {
        self.registry.lock().clear();
    }

    /// Run every matching handler against `event` and hand it back.
    pub fn dispatch<E: Event>(&self, mut event: E) -> E {
        self.dispatch_in_place(&mut event);
        event
    }

    /// Run every matching handler against `event` in priority order.
    ///
    /// Handler failures (errors and panics) are reported to the sink and never
    /// stop the remaining handlers.
    pub fn dispatch_in_place<E: Event>(&self, event: &mut E) {
        let event_type = EventType::of::<E>();
        let Some(bindings) = self.registry.lock().get(&event_type).map(<[_]>::to_vec) else {
            return;
        };
        let trace = self.config.trace;
        let event_name = event_type.name();

        if trace {
            self.sink.observe(Observation::Dispatching {
                event: event_name.to_string(),
                value: format!("{:?}", event),
            });
        }

        for binding in &bindings {
            let cancelled = event.as_cancellable().is_some_and(|c| c.is_cancelled());
            if cancelled && self.config.cancellation_policy.skips(binding.listen_cancelled()) {
                if trace {
                    self.sink.observe(Observation::Skipped {
                        handler: binding.name().to_string(),
                        event: event_name.to_string(),
                    });
                }
                continue;
            }

            let before = trace.then(|| (fingerprint(&*event), format!("{:?}", event)));
            match invoke(binding, event) {
                Ok(()) => {
                    let Some((before_hash, before_value)) = before else { continue };
                    let observation = if fingerprint(&*event) != before_hash {
                        Observation::Mutated {
                            handler: binding.name().to_string(),
                            event: event_name.to_string(),
                            before: before_value,
                            after: format!("{:?}", event),
                        }
                    } else {
                        Observation::Handled {
                            handler: binding.name().to_string(),
                            event: event_name.to_string(),
                        }
                    };
                    self.sink.observe(observation);
                }
                Err(e) => {
                    self.sink.observe(Observation::HandlerFailed {
                        handler: binding.name().to_string(),
                        event: event_name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        self.sink.observe(Observation::Completed {
            event: event_name.to_string(),
            listeners: bindings.len(),
        });
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn invoke<E: Event>(binding: &ListenerBinding, event: &mut E) -> HandlerResult {
    match panic::catch_unwind(AssertUnwindSafe(|| binding.invoke(&mut *event))) {
        Ok(result) => result,
        Err(payload) => Err(EventSystemError::HandlerPanicked {
            handler: binding.name().to_string(),
            message: panic_message(&*payload),
        }
        .into()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Hash snapshot used to detect in-place mutation
fn fingerprint<E: Hash + ?Sized>(event: &E) -> u64 {
    let mut hasher = DefaultHasher::new();
    event.hash(&mut hasher);
    hasher.finish()
}
