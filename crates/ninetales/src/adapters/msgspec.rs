//! `msgspec` adapter.
//!
//! Reads `msgspec.structs.fields(cls)`. `msgspec.NODEFAULT` means no default.
//! Structs are positional unless declared `kw_only=True`, which is how order
//! violations are materialized. msgspec copies empty `[]`, `{}` and `set()`
//! defaults per instance, but refuses any other mutable default.

use super::{NativeRecord, declared_type, keyword_only_needed, mismatch, resolve_type};
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::{FieldDescriptor, RecordSchema};
use crate::render::{DefaultExpr, PythonWriter, field_line};
use crate::sentinel::{self, NativeDefault};
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use crate::value::Value;
use std::sync::Arc;

pub static MSGSPEC_ADAPTER: MsgspecAdapter = MsgspecAdapter;

/// One `msgspec.structs.FieldInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    /// Name on the wire; equals `name` unless renamed.
    pub encode_name: String,
    pub ty: Annotation,
    /// `default`, or `default_factory` when that is set.
    pub default: NativeDefault,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: impl Into<Annotation>, default: NativeDefault) -> Self {
        let name = name.into();
        Self {
            encode_name: name.clone(),
            name,
            ty: ty.into(),
            default,
        }
    }
}

/// A `msgspec.Struct` subclass.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: String,
    pub module: Arc<Module>,
    pub fields: Vec<StructField>,
    pub kw_only: bool,
}

pub struct MsgspecAdapter;

impl Adapter for MsgspecAdapter {
    fn framework(&self) -> Framework {
        Framework::Msgspec
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::KeywordOnlyFallback
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let NativeRecord::Msgspec(st) = record else {
            return Err(mismatch(Framework::Msgspec, record));
        };
        tracing::debug!(record = %st.name, "extracting msgspec struct");
        let mut fields = Vec::with_capacity(st.fields.len());
        for f in &st.fields {
            if f.encode_name != f.name {
                tracing::debug!(
                    record = %st.name,
                    field = %f.name,
                    encode_name = %f.encode_name,
                    "dropping wire rename"
                );
            }
            fields.push(FieldDescriptor::new(
                &f.name,
                resolve_type(&st.module, &st.name, &f.name, Some(&f.ty))?,
                sentinel::to_canonical(Framework::Msgspec, &st.name, &f.name, &f.default)?,
            ));
        }
        RecordSchema::new(&st.name, fields)
    }

    fn materialize(
        &self,
        schema: &RecordSchema,
        config: &ConvertConfig,
    ) -> Result<NativeRecord, Error> {
        let kw_only = keyword_only_needed(Framework::Msgspec, self.ordering(), schema, config)?;
        let mut fields = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let default = sentinel::to_native(Framework::Msgspec, field.default());
            if let NativeDefault::Value(value) = &default {
                if value.is_mutable() && !value.is_empty_container() {
                    return Err(Error::unsupported_default(
                        schema.name(),
                        field.name(),
                        Framework::Msgspec,
                        value,
                        "only empty mutable defaults are copied per instance",
                    ));
                }
            }
            fields.push(StructField::new(
                field.name(),
                declared_type(field.ty()),
                default,
            ));
        }
        tracing::debug!(record = schema.name(), kw_only, "materialized msgspec struct");
        Ok(NativeRecord::Msgspec(StructType {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            fields,
            kw_only,
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::Msgspec(st) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        w.import("msgspec");
        let body: Vec<String> = st
            .fields
            .iter()
            .map(|f| {
                let ty = w.stored_annotation(&f.ty);
                let mut args = Vec::new();
                if f.encode_name != f.name {
                    args.push(("name", Value::str(f.encode_name.as_str()).to_python()));
                }
                field_line(
                    &f.name,
                    &ty,
                    DefaultExpr::from_native(&f.default),
                    "msgspec.field",
                    args,
                )
            })
            .collect();
        let header = if st.kw_only {
            format!("class {}(msgspec.Struct, kw_only=True)", st.name)
        } else {
            format!("class {}(msgspec.Struct)", st.name)
        };
        w.class(&[], &header, &body);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ABSENT, FieldDefault};
    use crate::sentinel::Sentinel;
    use crate::types::TypeRef;

    fn baz() -> NativeRecord {
        NativeRecord::Msgspec(StructType {
            name: "Baz".into(),
            module: Arc::new(Module::new("tests")),
            fields: vec![
                StructField::new("a", TypeRef::name("int"), NativeDefault::Token(Sentinel::NoDefault)),
                StructField::new(
                    "b",
                    TypeRef::optional(TypeRef::name("str")),
                    NativeDefault::value(Value::None),
                ),
            ],
            kw_only: false,
        })
    }

    #[test]
    fn test_extract_nodefault_is_absent_none_is_kept() {
        let schema = MSGSPEC_ADAPTER.extract(&baz()).unwrap();
        assert_eq!(schema.fields()[0].default(), &ABSENT);
        assert_eq!(schema.fields()[1].default(), &FieldDefault::Value(Value::None));
    }

    #[test]
    fn test_extract_foreign_sentinel_rejected() {
        let record = NativeRecord::Msgspec(StructType {
            name: "Baz".into(),
            module: Arc::new(Module::new("tests")),
            fields: vec![StructField::new(
                "a",
                TypeRef::name("int"),
                NativeDefault::Token(Sentinel::Missing),
            )],
            kw_only: false,
        });
        assert!(matches!(
            MSGSPEC_ADAPTER.extract(&record),
            Err(Error::UnsupportedMember { .. })
        ));
    }

    #[test]
    fn test_materialize_rejects_non_empty_mutable_default() {
        let schema = RecordSchema::new(
            "Tagged",
            vec![FieldDescriptor::with_default(
                "tags",
                TypeRef::name("list"),
                Value::List(vec![Value::Int(1)]),
            )],
        )
        .unwrap();
        let err = MSGSPEC_ADAPTER
            .materialize(&schema, &ConvertConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedDefault { framework: Framework::Msgspec, .. }
        ));
    }

    #[test]
    fn test_render_keyword_only() {
        let schema = RecordSchema::new(
            "Point",
            vec![
                FieldDescriptor::with_default("y", TypeRef::name("int"), 0),
                FieldDescriptor::required("x", TypeRef::name("int")),
            ],
        )
        .unwrap();
        let record = MSGSPEC_ADAPTER
            .materialize(&schema, &ConvertConfig::default())
            .unwrap();
        insta::assert_snapshot!(MSGSPEC_ADAPTER.render(&record), @r"
        import msgspec


        class Point(msgspec.Struct, kw_only=True):
            y: int = 0
            x: int
        ");
    }
}
