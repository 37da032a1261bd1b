//! `typing.TypedDict` adapter.
//!
//! Reads `__annotations__`, `__required_keys__` and `__optional_keys__`.
//! TypedDicts have no defaults: every extracted field is ABSENT and any
//! default is rejected on materialization. Keys that may be missing
//! (`total=False`, `NotRequired[...]`) have no counterpart in the IR.

use super::{NativeRecord, declared_type, mismatch, resolve_type};
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::{ABSENT, FieldDescriptor, RecordSchema};
use crate::render::PythonWriter;
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;

pub static TYPEDDICT_ADAPTER: TypedDictAdapter = TypedDictAdapter;

#[derive(Debug, Clone, PartialEq)]
pub struct TypedDictType {
    pub name: String,
    pub module: Arc<Module>,
    pub annotations: IndexMap<String, Annotation>,
    pub required_keys: BTreeSet<String>,
    pub optional_keys: BTreeSet<String>,
}

pub struct TypedDictAdapter;

impl Adapter for TypedDictAdapter {
    fn framework(&self) -> Framework {
        Framework::TypedDict
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::Unconstrained
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let NativeRecord::TypedDict(td) = record else {
            return Err(mismatch(Framework::TypedDict, record));
        };
        tracing::debug!(record = %td.name, "extracting typed dict");
        let fields = td
            .annotations
            .iter()
            .map(|(key, ann)| {
                if td.optional_keys.contains(key) {
                    return Err(Error::unsupported_member(
                        &td.name,
                        key,
                        "key is not required",
                    ));
                }
                Ok(FieldDescriptor::new(
                    key,
                    resolve_type(&td.module, &td.name, key, Some(ann))?,
                    ABSENT,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        RecordSchema::new(&td.name, fields)
    }

    fn materialize(
        &self,
        schema: &RecordSchema,
        config: &ConvertConfig,
    ) -> Result<NativeRecord, Error> {
        let mut annotations = IndexMap::with_capacity(schema.fields().len());
        for field in schema.fields() {
            if let Some(value) = field.default().value() {
                return Err(Error::unsupported_default(
                    schema.name(),
                    field.name(),
                    Framework::TypedDict,
                    value,
                    "TypedDict keys cannot have defaults",
                ));
            }
            annotations.insert(
                field.name().to_string(),
                Annotation::Resolved(declared_type(field.ty())),
            );
        }
        tracing::debug!(record = schema.name(), "materialized typed dict");
        Ok(NativeRecord::TypedDict(TypedDictType {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            required_keys: annotations.keys().cloned().collect(),
            optional_keys: BTreeSet::new(),
            annotations,
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::TypedDict(td) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        w.import("typing");
        let body: Vec<String> = td
            .annotations
            .iter()
            .map(|(key, ann)| {
                let ty = w.stored_annotation(ann);
                if td.optional_keys.contains(key) {
                    format!("{key}: typing.NotRequired[{ty}]")
                } else {
                    format!("{key}: {ty}")
                }
            })
            .collect();
        w.class(&[], &format!("class {}(typing.TypedDict)", td.name), &body);
        w.finish()
    }
}
