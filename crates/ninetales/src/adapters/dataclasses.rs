//! `dataclasses` adapter.
//!
//! Reads `dataclasses.fields(cls)`. `dataclasses.MISSING` means no default.
//! Order violations are materialized with `@dataclass(kw_only=True)`.
//! Mutable defaults are rejected by `dataclasses` itself, so empty containers
//! are emitted as `default_factory` and anything else is an error.

use super::{NativeRecord, declared_type, keyword_only_needed, mismatch, resolve_type};
use crate::config::{ConvertConfig, MutableDefaultPolicy};
use crate::error::Error;
use crate::ir::{FieldDescriptor, RecordSchema};
use crate::render::{DefaultExpr, PythonWriter, field_line};
use crate::sentinel::{self, Factory, NativeDefault};
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use std::sync::Arc;

/// Static instance for the registry.
pub static DATACLASSES_ADAPTER: DataclassesAdapter = DataclassesAdapter;

/// One `dataclasses.Field`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataclassField {
    pub name: String,
    /// `Field.type`; a string under `from __future__ import annotations`.
    pub ty: Annotation,
    /// `default`, or `default_factory` when that is set.
    pub default: NativeDefault,
    pub kw_only: bool,
    pub init: bool,
}

impl DataclassField {
    pub fn new(name: impl Into<String>, ty: impl Into<Annotation>, default: NativeDefault) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default,
            kw_only: false,
            init: true,
        }
    }
}

/// A dataclass.
#[derive(Debug, Clone, PartialEq)]
pub struct DataclassType {
    pub name: String,
    pub module: Arc<Module>,
    pub fields: Vec<DataclassField>,
    pub kw_only: bool,
}

pub struct DataclassesAdapter;

impl Adapter for DataclassesAdapter {
    fn framework(&self) -> Framework {
        Framework::Dataclasses
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::KeywordOnlyFallback
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let NativeRecord::Dataclass(class) = record else {
            return Err(mismatch(Framework::Dataclasses, record));
        };
        tracing::debug!(record = %class.name, "extracting dataclass");
        let fields = class
            .fields
            .iter()
            .map(|f| {
                if !f.init {
                    return Err(Error::unsupported_member(
                        &class.name,
                        &f.name,
                        "field is excluded from __init__",
                    ));
                }
                Ok(FieldDescriptor::new(
                    &f.name,
                    resolve_type(&class.module, &class.name, &f.name, Some(&f.ty))?,
                    sentinel::to_canonical(
                        Framework::Dataclasses,
                        &class.name,
                        &f.name,
                        &f.default,
                    )?,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        RecordSchema::new(&class.name, fields)
    }

    fn materialize(
        &self,
        schema: &RecordSchema,
        config: &ConvertConfig,
    ) -> Result<NativeRecord, Error> {
        let kw_only =
            keyword_only_needed(Framework::Dataclasses, self.ordering(), schema, config)?;
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let default = match sentinel::to_native(Framework::Dataclasses, field.default()) {
                    NativeDefault::Value(value) if value.is_mutable() => {
                        let factory = Factory::for_empty(&value)
                            .filter(|_| config.mutable_defaults == MutableDefaultPolicy::Factory);
                        match factory {
                            Some(factory) => NativeDefault::Factory(factory),
                            None => {
                                return Err(Error::unsupported_default(
                                    schema.name(),
                                    field.name(),
                                    Framework::Dataclasses,
                                    &value,
                                    "mutable defaults must be produced by a default_factory",
                                ));
                            }
                        }
                    }
                    other => other,
                };
                Ok(DataclassField::new(
                    field.name(),
                    declared_type(field.ty()),
                    default,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        tracing::debug!(record = schema.name(), kw_only, "materialized dataclass");
        Ok(NativeRecord::Dataclass(DataclassType {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            fields,
            kw_only,
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::Dataclass(class) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        w.import("dataclasses");
        let decorator = if class.kw_only {
            "dataclasses.dataclass(kw_only=True)"
        } else {
            "dataclasses.dataclass"
        };
        let body: Vec<String> = class
            .fields
            .iter()
            .map(|f| {
                let ty = w.stored_annotation(&f.ty);
                let mut args = Vec::new();
                if f.kw_only {
                    args.push(("kw_only", "True".to_string()));
                }
                if !f.init {
                    args.push(("init", "False".to_string()));
                }
                field_line(
                    &f.name,
                    &ty,
                    DefaultExpr::from_native(&f.default),
                    "dataclasses.field",
                    args,
                )
            })
            .collect();
        w.class(
            &[decorator.to_string()],
            &format!("class {}", class.name),
            &body,
        );
        w.finish()
    }
}
