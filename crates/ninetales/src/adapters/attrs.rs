//! `attrs` adapter.
//!
//! Reads the `attrs.fields(cls)` view of a class. `attrs.NOTHING` means no
//! default. A required attribute after a defaulted one is rejected by attrs
//! unless the class is `kw_only=True`, which is the path materialization
//! takes for such schemas.

use super::{NativeRecord, keyword_only_needed, mismatch, resolve_type};
use crate::config::{ConvertConfig, MutableDefaultPolicy};
use crate::error::Error;
use crate::ir::{FieldDescriptor, RecordSchema};
use crate::render::{DefaultExpr, PythonWriter, keywords};
use crate::sentinel::{self, Factory, NativeDefault};
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use std::sync::Arc;

/// Static instance for the registry.
pub static ATTRS_ADAPTER: AttrsAdapter = AttrsAdapter;

/// One `attrs.Attribute`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrsAttribute {
    pub name: String,
    /// `Attribute.type`; `None` for untyped `attr.ib()`s.
    pub ty: Option<Annotation>,
    pub default: NativeDefault,
    pub kw_only: bool,
    pub init: bool,
}

impl AttrsAttribute {
    pub fn new(name: impl Into<String>, ty: Option<Annotation>, default: NativeDefault) -> Self {
        Self {
            name: name.into(),
            ty,
            default,
            kw_only: false,
            init: true,
        }
    }
}

/// An attrs class.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrsClass {
    pub name: String,
    pub module: Arc<Module>,
    pub attributes: Vec<AttrsAttribute>,
    pub kw_only: bool,
}

pub struct AttrsAdapter;

impl Adapter for AttrsAdapter {
    fn framework(&self) -> Framework {
        Framework::Attrs
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::KeywordOnlyFallback
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let NativeRecord::Attrs(class) = record else {
            return Err(mismatch(Framework::Attrs, record));
        };
        tracing::debug!(record = %class.name, "extracting attrs class");
        let fields = class
            .attributes
            .iter()
            .map(|a| {
                if !a.init {
                    return Err(Error::unsupported_member(
                        &class.name,
                        &a.name,
                        "attribute is excluded from __init__",
                    ));
                }
                Ok(FieldDescriptor::new(
                    &a.name,
                    resolve_type(&class.module, &class.name, &a.name, a.ty.as_ref())?,
                    sentinel::to_canonical(Framework::Attrs, &class.name, &a.name, &a.default)?,
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
        let kw_only = keyword_only_needed(Framework::Attrs, self.ordering(), schema, config)?;
        let attributes = schema
            .fields()
            .iter()
            .map(|field| {
                let mut default = sentinel::to_native(Framework::Attrs, field.default());
                // Shared mutable defaults are legal in attrs but `Factory` is
                // what attrs code writes for empty containers.
                if let NativeDefault::Value(value) = &default {
                    if value.is_mutable() && config.mutable_defaults == MutableDefaultPolicy::Factory
                    {
                        if let Some(factory) = Factory::for_empty(value) {
                            default = NativeDefault::Factory(factory);
                        }
                    }
                }
                AttrsAttribute::new(
                    field.name(),
                    field.ty().cloned().map(Annotation::Resolved),
                    default,
                )
            })
            .collect();
        tracing::debug!(record = schema.name(), kw_only, "materialized attrs class");
        Ok(NativeRecord::Attrs(AttrsClass {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            attributes,
            kw_only,
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::Attrs(class) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        w.import("attrs");

        // attrs refuses to mix annotated and bare `attrs.field()` members,
        // so one untyped attribute switches the whole class to explicit form.
        let explicit = class.attributes.iter().any(|a| a.ty.is_none());
        let mut options = Vec::new();
        if class.kw_only {
            options.push(("kw_only", "True".to_string()));
        }
        if explicit {
            options.push(("auto_attribs", "False".to_string()));
        }
        let decorator = if options.is_empty() {
            "attrs.define".to_string()
        } else {
            format!("attrs.define({})", keywords(&options))
        };

        let mut body = Vec::new();
        for a in &class.attributes {
            let ty = a.ty.as_ref().map(|ann| w.stored_annotation(ann));
            let mut args = Vec::new();
            let default = DefaultExpr::from_native(&a.default).map(|d| match d {
                DefaultExpr::Value(value) => value,
                DefaultExpr::Factory(factory) => format!("attrs.Factory({factory})"),
            });
            if a.kw_only {
                args.push(("kw_only", "True".to_string()));
            }
            if !a.init {
                args.push(("init", "False".to_string()));
            }
            if explicit {
                if let Some(ty) = &ty {
                    args.insert(0, ("type", ty.clone()));
                }
                if let Some(default) = default {
                    args.push(("default", default));
                }
                body.push(format!("{} = attrs.field({})", a.name, keywords(&args)));
                continue;
            }
            let ty = ty.unwrap_or_default();
            body.push(match (default, args.is_empty()) {
                (None, true) => format!("{}: {ty}", a.name),
                (Some(default), true) => format!("{}: {ty} = {default}", a.name),
                (default, false) => {
                    if let Some(default) = default {
                        args.push(("default", default));
                    }
                    format!("{}: {ty} = attrs.field({})", a.name, keywords(&args))
                }
            });
        }
        w.class(&[decorator], &format!("class {}", class.name), &body);
        w.finish()
    }
}
