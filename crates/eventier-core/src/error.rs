//! # Eventier Core Errors
//!
//! Crate-level error aggregate. Event system errors convert into
//! [`Error::EventSystem`]; the remaining variants cover loading and saving
//! dispatcher configuration.
use std::error::Error as StdError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::event::error::EventSystemError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("I/O error during operation '{operation}' on path {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },

    #[error("Unknown or unsupported config format for path: {path:?}")]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("Failed to serialize to {format}: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Failed to deserialize from {format}: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    pub(crate) fn serialization(format: &str, source: impl StdError + Send + Sync + 'static) -> Self {
        Error::Serialization { format: format.to_string(), source: Box::new(source) }
    }

    pub(crate) fn deserialization(format: &str, source: impl StdError + Send + Sync + 'static) -> Self {
        Error::Deserialization { format: format.to_string(), source: Box::new(source) }
    }
}

