//! `typing.NamedTuple` adapter.
//!
//! Reads `_fields`, `__annotations__` and `_field_defaults`. A field with no
//! entry in `_field_defaults` has no default. Tuples are constructed
//! positionally and have no keyword-only mode, so a required field after a
//! defaulted one cannot be materialized at all.

use super::{NativeRecord, keyword_only_needed, mismatch, resolve_type};
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::{FieldDescriptor, RecordSchema};
use crate::render::PythonWriter;
use crate::sentinel::{self, NativeDefault, Sentinel};
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;

pub static NAMEDTUPLE_ADAPTER: NamedTupleAdapter = NamedTupleAdapter;

/// A named tuple class.
///
/// `collections.namedtuple` types have an empty `annotations` map.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTupleType {
    pub name: String,
    pub module: Arc<Module>,
    /// `_fields`
    pub fields: Vec<String>,
    /// `__annotations__`
    pub annotations: IndexMap<String, Annotation>,
    /// `_field_defaults`
    pub field_defaults: IndexMap<String, Value>,
}

pub struct NamedTupleAdapter;

impl Adapter for NamedTupleAdapter {
    fn framework(&self) -> Framework {
        Framework::NamedTuple
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::Positional
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let NativeRecord::NamedTuple(nt) = record else {
            return Err(mismatch(Framework::NamedTuple, record));
        };
        tracing::debug!(record = %nt.name, "extracting named tuple");
        let fields = nt
            .fields
            .iter()
            .map(|name| {
                let native = match nt.field_defaults.get(name) {
                    Some(value) => NativeDefault::Value(value.clone()),
                    None => NativeDefault::Token(Sentinel::NotPresent),
                };
                Ok(FieldDescriptor::new(
                    name,
                    resolve_type(&nt.module, &nt.name, name, nt.annotations.get(name))?,
                    sentinel::to_canonical(Framework::NamedTuple, &nt.name, name, &native)?,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        RecordSchema::new(&nt.name, fields)
    }

    fn materialize(
        &self,
        schema: &RecordSchema,
        config: &ConvertConfig,
    ) -> Result<NativeRecord, Error> {
        keyword_only_needed(Framework::NamedTuple, self.ordering(), schema, config)?;
        let mut annotations = IndexMap::new();
        let mut field_defaults = IndexMap::new();
        for field in schema.fields() {
            if let Some(ty) = field.ty() {
                annotations.insert(field.name().to_string(), Annotation::Resolved(ty.clone()));
            }
            if let NativeDefault::Value(value) =
                sentinel::to_native(Framework::NamedTuple, field.default())
            {
                field_defaults.insert(field.name().to_string(), value);
            }
        }
        tracing::debug!(record = schema.name(), "materialized named tuple");
        Ok(NativeRecord::NamedTuple(NamedTupleType {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            fields: schema.field_names().into_iter().map(String::from).collect(),
            annotations,
            field_defaults,
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::NamedTuple(nt) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        if nt.annotations.is_empty() && !nt.fields.is_empty() {
            w.import("collections");
            let names: Vec<String> = nt
                .fields
                .iter()
                .map(|f| Value::str(f.as_str()).to_python())
                .collect();
            let defaults: Vec<String> = nt
                .fields
                .iter()
                .filter_map(|f| nt.field_defaults.get(f))
                .map(Value::to_python)
                .collect();
            let mut call = format!(
                "{} = collections.namedtuple({}, [{}]",
                nt.name,
                Value::str(nt.name.as_str()).to_python(),
                names.join(", ")
            );
            if !defaults.is_empty() {
                call.push_str(&format!(", defaults=[{}]", defaults.join(", ")));
            }
            call.push(')');
            w.line(&call);
            return w.finish();
        }

        w.import("typing");
        let body: Vec<String> = nt
            .fields
            .iter()
            .map(|name| {
                let ty = match nt.annotations.get(name) {
                    Some(ann) => w.stored_annotation(ann),
                    None => w.annotation(None),
                };
                match nt.field_defaults.get(name) {
                    Some(value) => format!("{name}: {ty} = {}", value.to_python()),
                    None => format!("{name}: {ty}"),
                }
            })
            .collect();
        w.class(&[], &format!("class {}(typing.NamedTuple)", nt.name), &body);
        w.finish()
    }
}
