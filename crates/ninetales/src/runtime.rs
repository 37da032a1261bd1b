//! Runtime type registry.
//!
//! Materialized records are defined here under `(framework, name)`. A record
//! is only inserted once its adapter has fully built it, so a failed
//! materialization leaves the registry untouched.

use crate::adapters::NativeRecord;
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::RecordSchema;
use crate::registry::get_adapter;
use crate::traits::Framework;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Types defined by materialization.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    config: ConvertConfig,
    types: RwLock<HashMap<(Framework, String), Arc<NativeRecord>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self {
            config,
            types: RwLock::default(),
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Build `schema` as a `framework` record and define it.
    pub fn materialize(
        &self,
        framework: Framework,
        schema: &RecordSchema,
    ) -> Result<Arc<NativeRecord>, Error> {
        let record = get_adapter(framework).materialize(schema, &self.config)?;
        Ok(self.define(record))
    }

    /// Define a record, replacing any earlier definition with the same name.
    pub fn define(&self, record: NativeRecord) -> Arc<NativeRecord> {
        let key = (record.framework(), record.name().to_string());
        let record = Arc::new(record);
        let previous = self
            .types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&record));
        if previous.is_some() {
            tracing::warn!(
                record = record.name(),
                framework = %record.framework(),
                "redefining existing type"
            );
        }
        record
    }

    pub fn get(&self, framework: Framework, name: &str) -> Option<Arc<NativeRecord>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(framework, name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
