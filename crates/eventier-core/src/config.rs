use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// How dispatch treats handlers when the event reports itself cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Skip every handler once the event is cancelled. `listen_cancelled`
    /// is recorded on bindings but not consulted.
    #[default]
    SkipAll,
    /// Skip only handlers that did not declare `listen_cancelled`
    HonorListenCancelled,
}

impl CancellationPolicy {
    /// Whether a binding is skipped for an event that is currently cancelled
    pub fn skips(self, listen_cancelled: bool) -> bool {
        match self {
            CancellationPolicy::SkipAll => true,
            CancellationPolicy::HonorListenCancelled => !listen_cancelled,
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Emit trace-level observations (skips, mutations, handled listeners)
    pub trace: bool,
    pub cancellation_policy: CancellationPolicy,
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_cancellation_policy(mut self, policy: CancellationPolicy) -> Self {
        self.cancellation_policy = policy;
        self
    }

    /// Load configuration from a file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedConfigFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read_config", path.to_path_buf()))?;
        Self::from_str_with_format(&content, format)
    }

    /// Parse configuration from in-memory text
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::deserialization("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Error::deserialization("YAML", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::deserialization("TOML", e)),
        }
    }

    /// Serialize configuration in the given format
    pub fn to_string_with_format(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::serialization("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| Error::serialization("YAML", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string(self)
                .map_err(|e| Error::serialization("TOML", e)),
        }
    }

    /// Write configuration to a file, picking the format from its extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedConfigFormat { path: path.to_path_buf() })?;
        let content = self.to_string_with_format(format)?;
        fs::write(path, content).map_err(|e| Error::io(e, "write_config", path.to_path_buf()))
    }
}
