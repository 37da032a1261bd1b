//! `pydantic` adapter, for both the 1.x and 2.x reflection shapes.
//!
//! v2 exposes `model_fields: dict[str, FieldInfo]` and reports a missing
//! default as `PydanticUndefined`. v1 exposes `__fields__: dict[str,
//! ModelField]` where a required field's `default` is `None`, so a genuine
//! `None` default cannot be told apart from no default and extracts as
//! ABSENT. Models are constructed by keyword, so field order never matters.

use super::{NativeRecord, declared_type, mismatch, resolve_type};
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::{FieldDescriptor, RecordSchema};
use crate::render::{DefaultExpr, PythonWriter, field_line};
use crate::sentinel::{self, NativeDefault};
use crate::traits::{Adapter, Framework, OrderingRule};
use crate::types::{Annotation, Module};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;

pub static PYDANTIC_V1_ADAPTER: PydanticAdapter = PydanticAdapter::new(PydanticVersion::V1);
pub static PYDANTIC_V2_ADAPTER: PydanticAdapter = PydanticAdapter::new(PydanticVersion::V2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PydanticVersion {
    V1,
    V2,
}

impl PydanticVersion {
    pub fn framework(self) -> Framework {
        match self {
            PydanticVersion::V1 => Framework::PydanticV1,
            PydanticVersion::V2 => Framework::PydanticV2,
        }
    }
}

/// A `FieldInfo` (v2) or `ModelField` (v1).
#[derive(Debug, Clone, PartialEq)]
pub struct PydanticField {
    pub annotation: Option<Annotation>,
    pub default: NativeDefault,
}

impl PydanticField {
    pub fn new(annotation: impl Into<Annotation>, default: NativeDefault) -> Self {
        Self {
            annotation: Some(annotation.into()),
            default,
        }
    }
}

/// A `BaseModel` subclass.
#[derive(Debug, Clone, PartialEq)]
pub struct PydanticModel {
    pub name: String,
    pub module: Arc<Module>,
    pub version: PydanticVersion,
    pub fields: IndexMap<String, PydanticField>,
    /// `model_computed_fields` keys.
    pub computed_fields: Vec<String>,
}

pub struct PydanticAdapter {
    version: PydanticVersion,
}

impl PydanticAdapter {
    pub const fn new(version: PydanticVersion) -> Self {
        Self { version }
    }
}

impl Adapter for PydanticAdapter {
    fn framework(&self) -> Framework {
        self.version.framework()
    }

    fn ordering(&self) -> OrderingRule {
        OrderingRule::Unconstrained
    }

    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> {
        let model = match record {
            NativeRecord::Pydantic(model) if model.version == self.version => model,
            _ => return Err(mismatch(self.framework(), record)),
        };
        tracing::debug!(record = %model.name, framework = %self.framework(), "extracting pydantic model");
        if let Some(computed) = model.computed_fields.first() {
            return Err(Error::unsupported_member(
                &model.name,
                computed,
                "computed fields are derived, not stored",
            ));
        }
        let fields = model
            .fields
            .iter()
            .map(|(name, f)| {
                Ok(FieldDescriptor::new(
                    name,
                    resolve_type(&model.module, &model.name, name, f.annotation.as_ref())?,
                    sentinel::to_canonical(self.framework(), &model.name, name, &f.default)?,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        RecordSchema::new(&model.name, fields)
    }

    fn materialize(
        &self,
        schema: &RecordSchema,
        config: &ConvertConfig,
    ) -> Result<NativeRecord, Error> {
        let framework = self.framework();
        let mut fields = IndexMap::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let default = sentinel::to_native(framework, field.default());
            match &default {
                NativeDefault::Value(Value::Ellipsis) => {
                    return Err(Error::unsupported_default(
                        schema.name(),
                        field.name(),
                        framework,
                        &Value::Ellipsis,
                        "pydantic reads `...` as a required marker",
                    ));
                }
                NativeDefault::Value(Value::None) if self.version == PydanticVersion::V1 => {
                    tracing::warn!(
                        record = schema.name(),
                        field = field.name(),
                        "`None` default will read back as no default under pydantic v1"
                    );
                }
                _ => {}
            }
            fields.insert(
                field.name().to_string(),
                PydanticField::new(declared_type(field.ty()), default),
            );
        }
        tracing::debug!(record = schema.name(), %framework, "materialized pydantic model");
        Ok(NativeRecord::Pydantic(PydanticModel {
            name: schema.name().to_string(),
            module: config.target_module(schema.name()),
            version: self.version,
            fields,
            computed_fields: Vec::new(),
        }))
    }

    fn render(&self, record: &NativeRecord) -> String {
        let NativeRecord::Pydantic(model) = record else {
            return String::new();
        };
        let mut w = PythonWriter::new();
        w.import("pydantic");
        let body: Vec<String> = model
            .fields
            .iter()
            .map(|(name, f)| {
                let ty = match &f.annotation {
                    Some(ann) => w.stored_annotation(ann),
                    None => w.annotation(None),
                };
                field_line(
                    name,
                    &ty,
                    DefaultExpr::from_native(&f.default),
                    "pydantic.Field",
                    Vec::new(),
                )
            })
            .collect();
        w.class(&[], &format!("class {}(pydantic.BaseModel)", model.name), &body);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ABSENT, FieldDefault};
    use crate::sentinel::Sentinel;
    use crate::types::TypeRef;

    fn model(version: PydanticVersion, default: NativeDefault) -> NativeRecord {
        let mut fields = IndexMap::new();
        fields.insert(
            "x".to_string(),
            PydanticField::new(TypeRef::optional(TypeRef::name("int")), default),
        );
        NativeRecord::Pydantic(PydanticModel {
            name: "M".into(),
            module: Arc::new(Module::new("tests")),
            version,
            fields,
            computed_fields: Vec::new(),
        })
    }

    #[test]
    fn test_v2_keeps_none_default() {
        let record = model(PydanticVersion::V2, NativeDefault::value(Value::None));
        let schema = PYDANTIC_V2_ADAPTER.extract(&record).unwrap();
        assert_eq!(schema.fields()[0].default(), &FieldDefault::Value(Value::None));
    }

    #[test]
    fn test_v1_collapses_none_default() {
        let record = model(PydanticVersion::V1, NativeDefault::value(Value::None));
        let schema = PYDANTIC_V1_ADAPTER.extract(&record).unwrap();
        assert_eq!(schema.fields()[0].default(), &ABSENT);
    }

    #[test]
    fn test_undefined_is_absent() {
        for (adapter, version) in [
            (&PYDANTIC_V1_ADAPTER, PydanticVersion::V1),
            (&PYDANTIC_V2_ADAPTER, PydanticVersion::V2),
        ] {
            let record = model(version, NativeDefault::Token(Sentinel::PydanticUndefined));
            let schema = adapter.extract(&record).unwrap();
            assert_eq!(schema.fields()[0].default(), &ABSENT);
        }
    }

    #[test]
    fn test_version_mismatch() {
        let record = model(PydanticVersion::V1, NativeDefault::value(1));
        assert!(matches!(
            PYDANTIC_V2_ADAPTER.extract(&record),
            Err(Error::FrameworkMismatch {
                expected: Framework::PydanticV2,
                found: Framework::PydanticV1,
                ..
            })
        ));
    }

    #[test]
    fn test_computed_field_rejected() {
        let NativeRecord::Pydantic(mut m) = model(PydanticVersion::V2, NativeDefault::value(1))
        else {
            unreachable!()
        };
        m.computed_fields.push("area".into());
        let err = PYDANTIC_V2_ADAPTER.extract(&m.into()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMember { ref field, .. } if field == "area"));
    }

    #[test]
    fn test_ellipsis_default_rejected() {
        let schema = RecordSchema::new(
            "M",
            vec![FieldDescriptor::with_default(
                "x",
                TypeRef::name("int"),
                Value::Ellipsis,
            )],
        )
        .unwrap();
        let err = PYDANTIC_V2_ADAPTER
            .materialize(&schema, &ConvertConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDefault { value: Value::Ellipsis, .. }));
    }

    #[test]
    fn test_materialize_ignores_order() {
        let schema = RecordSchema::new(
            "Point",
            vec![
                FieldDescriptor::with_default("y", TypeRef::name("int"), 0),
                FieldDescriptor::required("x", TypeRef::name("int")),
            ],
        )
        .unwrap();
        let record = PYDANTIC_V2_ADAPTER
            .materialize(&schema, &ConvertConfig::default())
            .unwrap();
        insta::assert_snapshot!(PYDANTIC_V2_ADAPTER.render(&record), @r"
        import pydantic


        class Point(pydantic.BaseModel):
            y: int = 0
            x: int
        ");
    }
}
