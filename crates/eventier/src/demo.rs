//! Greeting scenario run by the binary.
//!
//! Three listeners append a suffix to a greeting: `-B` at high priority,
//! `-A` at normal priority and `-C` at lowest priority, the last one also
//! for cancelled greetings.
use std::sync::Arc;

use eventier_core::event::Declarations;
use eventier_core::{
    Cancellable, DefaultEventManager, DispatcherConfig, Event, EventManager, Listener,
    ListenerPriority,
};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Greet {
    pub message: String,
    pub cancelled: bool,
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

pub struct Greeter {
    suffix: String,
}

impl Listener for Greeter {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations.handler("append").method(|this: &Self, greet: &mut Greet| {
            greet.message.push_str(&this.suffix);
            Ok(())
        });
    }
}

pub struct EagerGreeter {
    suffix: String,
}

impl Listener for EagerGreeter {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations
            .handler("append")
            .priority(ListenerPriority::High)
            .method(|this: &Self, greet: &mut Greet| {
                greet.message.push_str(&this.suffix);
                Ok(())
            });
    }
}

/// Sees every greeting, cancelled or not, after everyone else
pub struct Witness {
    suffix: String,
}

impl Listener for Witness {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations
            .handler("append")
            .priority(ListenerPriority::Lowest)
            .listen_cancelled(true)
            .method(|this: &Self, greet: &mut Greet| {
                greet.message.push_str(&this.suffix);
                Ok(())
            });
    }
}

/// Subscribe the three greeters, dispatch one greeting and return it
pub fn run(config: DispatcherConfig, message: &str, cancelled: bool) -> Greet {
    let manager = DefaultEventManager::with_config(config);

    let greeter = Arc::new(Greeter { suffix: "-A".to_string() });
    let eager = Arc::new(EagerGreeter { suffix: "-B".to_string() });
    let witness = Arc::new(Witness { suffix: "-C".to_string() });
    manager.subscribe(&greeter);
    manager.subscribe(&eager);
    manager.subscribe(&witness);
    log::info!(
        "Dispatching greeting '{}' (cancelled: {}) to {} event type(s)",
        message,
        cancelled,
        manager.listeners().len()
    );

    let result = manager.on_event(Greet { message: message.to_string(), cancelled });

    manager.unsubscribe(&greeter);
    manager.unsubscribe(&eager);
    manager.unsubscribe(&witness);
    result
}
