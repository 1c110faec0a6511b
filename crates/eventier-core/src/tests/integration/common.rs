#![cfg(test)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{CancellationPolicy, DispatcherConfig};
use crate::event::dispatcher::EventDispatcher;
use crate::event::manager::DefaultEventManager;
use crate::event::resolver::{Declarations, Listener};
use crate::event::sink::{Observation, ObservationSink};
use crate::event::{Cancellable, Event, ListenerPriority};

// ===== TEST EVENTS =====

/// Cancellable greeting, handlers append to `message`
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Greet {
    pub message: String,
    pub cancelled: bool,
}

impl Greet {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string(), cancelled: false }
    }

    pub fn cancelled(message: &str) -> Self {
        Self { message: message.to_string(), cancelled: true }
    }
}

impl Event for Greet {
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        Some(self)
    }
}

impl Cancellable for Greet {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Plain, non-cancellable event
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
pub struct Tick {
    pub count: u32,
}

impl Event for Tick {}

// ===== TEST LISTENERS =====

/// Appends its suffix to `Greet::message` at `Normal` priority
pub struct NormalSuffix {
    pub suffix: &'static str,
}

impl Listener for NormalSuffix {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations.handler("on_greet").method(|this: &Self, event: &mut Greet| {
            event.message.push_str(this.suffix);
            Ok(())
        });
    }
}

/// Appends its suffix to `Greet::message` at `High` priority
pub struct HighSuffix {
    pub suffix: &'static str,
}

impl Listener for HighSuffix {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations
            .handler("on_greet")
            .priority(ListenerPriority::High)
            .method(|this: &Self, event: &mut Greet| {
                event.message.push_str(this.suffix);
                Ok(())
            });
    }
}

/// Appends its suffix even when the greeting is cancelled, at `Lowest` priority
pub struct CancelledSuffix {
    pub suffix: &'static str,
}

impl Listener for CancelledSuffix {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations
            .handler("on_greet")
            .priority(ListenerPriority::Lowest)
            .listen_cancelled(true)
            .method(|this: &Self, event: &mut Greet| {
                event.message.push_str(this.suffix);
                Ok(())
            });
    }
}

/// Cancels the greeting at `Highest` priority
pub struct Canceller;

impl Listener for Canceller {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations
            .handler("cancel")
            .priority(ListenerPriority::Highest)
            .method(|_this: &Self, event: &mut Greet| {
                event.set_cancelled(true);
                Ok(())
            });
    }
}

/// Counts ticks with a type-level handler and a method handler
pub struct TickCounter;

impl Listener for TickCounter {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations.handler("count_static").associated(|tick: &mut Tick| {
            tick.count += 1;
            Ok(())
        });
        declarations
            .handler("count_method")
            .priority(ListenerPriority::Low)
            .method(|_this: &Self, tick: &mut Tick| {
                tick.count += 10;
                Ok(())
            });
    }
}

// ===== RECORDING SINK =====

/// Sink that keeps every observation for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    observations: Mutex<Vec<Observation>>,
}

impl RecordingSink {
    pub fn observations(&self) -> Vec<Observation> {
        self.observations.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Observation) -> bool) -> usize {
        self.observations.lock().iter().filter(|o| predicate(*o)).count()
    }
}

impl ObservationSink for RecordingSink {
    fn observe(&self, observation: Observation) {
        self.observations.lock().push(observation);
    }
}

/// Manager with trace enabled and a recording sink
pub fn traced_manager(policy: CancellationPolicy) -> (DefaultEventManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let config = DispatcherConfig::new().with_trace(true).with_cancellation_policy(policy);
    let dispatcher = EventDispatcher::with_config(config).with_sink(sink.clone());
    (DefaultEventManager::from_dispatcher(dispatcher), sink)
}
