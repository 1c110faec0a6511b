//! Dispatch observations and the sink that receives them.
//!
//! The dispatcher reports what it does as [`Observation`]s. Sinks are
//! fire-and-forget: `observe` returns nothing and must not block dispatch.
use std::fmt;

use log::Level;

/// Log target used by [`LogSink`]
pub const DISPATCH_LOG_TARGET: &str = "eventier::dispatch";

/// Something the dispatcher noticed while running handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Dispatch started for an event with registered handlers
    Dispatching { event: String, value: String },
    /// Handler skipped because the event was cancelled
    Skipped { handler: String, event: String },
    /// Handler changed the event's fingerprint
    Mutated { handler: String, event: String, before: String, after: String },
    /// Handler ran and left the event unchanged
    Handled { handler: String, event: String },
    /// Handler returned an error or panicked
    HandlerFailed { handler: String, event: String, message: String },
    /// Dispatch finished
    Completed { event: String, listeners: usize },
}

impl Observation {
    pub fn level(&self) -> Level {
        match self {
            Observation::HandlerFailed { .. } => Level::Error,
            Observation::Completed { .. } => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Dispatching { event, value } => {
                write!(f, "dispatching {} with value {}", event, value)
            }
            Observation::Skipped { handler, event } => {
                write!(f, "listener {} skipped because event {} was cancelled", handler, event)
            }
            Observation::Mutated { handler, event, before, after } => {
                write!(f, "listener {} changed event {} from {} to {}", handler, event, before, after)
            }
            Observation::Handled { handler, event } => {
                write!(f, "listener {} handled event {}", handler, event)
            }
            Observation::HandlerFailed { handler, event, message } => {
                write!(f, "failed to invoke listener {} for event {}: {}", handler, event, message)
            }
            Observation::Completed { event, listeners } => {
                write!(f, "event {} triggered a total of {} listeners", event, listeners)
            }
        }
    }
}

/// Receiver of dispatch observations
pub trait ObservationSink: Send + Sync {
    fn observe(&self, observation: Observation);
}

/// Default sink, forwards to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ObservationSink for LogSink {
    fn observe(&self, observation: Observation) {
        log::log!(target: DISPATCH_LOG_TARGET, observation.level(), "{}", observation);
    }
}
