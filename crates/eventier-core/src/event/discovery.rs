//! Namespace discovery.
//!
//! Turns a dotted namespace such as `app.listeners` into the listener types
//! found under it. The core only consumes [`Discovery`]; [`StaticDiscovery`]
//! is an in-memory catalogue that applications fill in at startup.
use std::collections::BTreeMap;

use crate::event::error::EventSystemError;
use crate::event::resolver::TypeRef;

/// Source of candidate listener types for a namespace
pub trait Discovery: Send + Sync {
    /// Types found under `namespace`, including its sub-namespaces.
    fn discover(&self, namespace: &str) -> Result<Vec<TypeRef>, EventSystemError>;
}

/// In-memory catalogue of listener types keyed by namespace
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    namespaces: BTreeMap<String, Vec<TypeRef>>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type under `namespace`
    pub fn register(&mut self, namespace: &str, type_ref: TypeRef) -> Result<(), EventSystemError> {
        validate_namespace(namespace)?;
        self.namespaces.entry(namespace.to_string()).or_default().push(type_ref);
        Ok(())
    }

    /// Builder form of [`StaticDiscovery::register`]
    pub fn with(mut self, namespace: &str, type_ref: TypeRef) -> Result<Self, EventSystemError> {
        self.register(namespace, type_ref)?;
        Ok(self)
    }

    /// Number of registered types across all namespaces
    pub fn type_count(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }
}

impl Discovery for StaticDiscovery {
    fn discover(&self, namespace: &str) -> Result<Vec<TypeRef>, EventSystemError> {
        validate_namespace(namespace)?;
        let nested = format!("{}.", namespace);
        let types: Vec<TypeRef> = self
            .namespaces
            .iter()
            .filter(|(name, _)| name.as_str() == namespace || name.starts_with(&nested))
            .flat_map(|(_, types)| types.iter().copied())
            .collect();
        log::debug!("Discovered {} type(s) under namespace '{}'", types.len(), namespace);
        Ok(types)
    }
}

/// A namespace is one or more non-empty identifier segments joined by '.'
fn validate_namespace(namespace: &str) -> Result<(), EventSystemError> {
    if namespace.is_empty() {
        return Err(EventSystemError::discovery(namespace, "namespace is empty"));
    }
    for segment in namespace.split('.') {
        if segment.is_empty() {
            return Err(EventSystemError::discovery(namespace, "namespace contains an empty segment"));
        }
        let valid = segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !segment.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(EventSystemError::discovery(
                namespace,
                format!("segment '{}' is not a valid identifier", segment),
            ));
        }
    }
    Ok(())
}
