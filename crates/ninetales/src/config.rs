//! Conversion configuration.
//!
//! Loaded from `ninetales.toml` or built in code. Every key is optional:
//!
//! ```toml
//! ordering = "keyword-only"   # or "strict"
//! mutable-defaults = "factory" # or "reject"
//! module = "app.models"
//! ```

use crate::types::Module;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Module generated types are defined in when none is configured.
pub const DEFAULT_MODULE: &str = "ninetales.generated";

/// What to do when a positional target receives a required field after a
/// defaulted one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Use the framework's keyword-only construction where it has one.
    #[default]
    KeywordOnly,
    /// Always reject, even where keyword-only construction exists.
    Strict,
}

/// What to do with mutable defaults on targets that forbid them by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutableDefaultPolicy {
    /// Emit empty containers through the builtin factory (`list`, `dict`, `set`).
    #[default]
    Factory,
    /// Reject every mutable default.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConvertConfig {
    pub ordering: OrderingPolicy,
    pub mutable_defaults: MutableDefaultPolicy,
    /// Module that materialized types are defined in.
    pub module: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingPolicy::default(),
            mutable_defaults: MutableDefaultPolicy::default(),
            module: DEFAULT_MODULE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConvertConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// The namespace a newly materialized record named `record` lives in.
    pub fn target_module(&self, record: &str) -> Arc<Module> {
        let mut module = Module::new(&self.module);
        module.define(record);
        Arc::new(module)
    }
}
