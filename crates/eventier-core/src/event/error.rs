//! # Eventier Event System Errors
//!
//! Defines error types specific to the event system.
//!
//! [`EventSystemError`] covers the two failure domains of the core:
//! discovery failures, which propagate to the caller of a registration entry
//! point, and invocation failures, which the dispatcher records and recovers
//! from without surfacing them to the caller of `dispatch`.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Listener discovery failed for namespace '{namespace}': {reason}")]
    DiscoveryFailure {
        namespace: String,
        reason: String,
    },

    #[error("Listener '{listener}' was dropped without unsubscribing")]
    OwnerDropped {
        listener: String,
    },

    #[error("Handler '{handler}' expected event type '{expected}'")]
    EventTypeMismatch {
        handler: String,
        expected: &'static str,
    },

    #[error("Handler '{handler}' panicked: {message}")]
    HandlerPanicked {
        handler: String,
        message: String,
    },
}

impl EventSystemError {
    pub fn discovery(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        EventSystemError::DiscoveryFailure {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }
}
