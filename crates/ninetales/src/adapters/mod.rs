//! Framework adapters.
//!
//! Each submodule models one framework's reflection surface as plain data
//! (what `attrs.fields()`, `dataclasses.fields()` and friends report) and
//! implements [`Adapter`](crate::traits::Adapter) over it.

pub mod attrs;
pub mod dataclasses;
pub mod msgspec;
pub mod namedtuple;
pub mod pydantic;
pub mod typeddict;

pub use attrs::{ATTRS_ADAPTER, AttrsAdapter, AttrsAttribute, AttrsClass};
pub use dataclasses::{DATACLASSES_ADAPTER, DataclassField, DataclassType, DataclassesAdapter};
pub use msgspec::{MSGSPEC_ADAPTER, MsgspecAdapter, StructField, StructType};
pub use namedtuple::{NAMEDTUPLE_ADAPTER, NamedTupleAdapter, NamedTupleType};
pub use pydantic::{
    PYDANTIC_V1_ADAPTER, PYDANTIC_V2_ADAPTER, PydanticAdapter, PydanticField, PydanticModel,
    PydanticVersion,
};
pub use typeddict::{TYPEDDICT_ADAPTER, TypedDictAdapter, TypedDictType};

use crate::config::{ConvertConfig, OrderingPolicy};
use crate::error::Error;
use crate::ir::RecordSchema;
use crate::traits::{Framework, OrderingRule};
use crate::types::{Annotation, Module, TypeRef};
use std::sync::Arc;

/// A record type as one framework describes it.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeRecord {
    Attrs(AttrsClass),
    Dataclass(DataclassType),
    Msgspec(StructType),
    NamedTuple(NamedTupleType),
    Pydantic(PydanticModel),
    TypedDict(TypedDictType),
}

impl NativeRecord {
    pub fn framework(&self) -> Framework {
        match self {
            NativeRecord::Attrs(_) => Framework::Attrs,
            NativeRecord::Dataclass(_) => Framework::Dataclasses,
            NativeRecord::Msgspec(_) => Framework::Msgspec,
            NativeRecord::NamedTuple(_) => Framework::NamedTuple,
            NativeRecord::Pydantic(model) => model.version.framework(),
            NativeRecord::TypedDict(_) => Framework::TypedDict,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NativeRecord::Attrs(r) => &r.name,
            NativeRecord::Dataclass(r) => &r.name,
            NativeRecord::Msgspec(r) => &r.name,
            NativeRecord::NamedTuple(r) => &r.name,
            NativeRecord::Pydantic(r) => &r.name,
            NativeRecord::TypedDict(r) => &r.name,
        }
    }

    /// The module the record was defined in.
    pub fn module(&self) -> &Arc<Module> {
        match self {
            NativeRecord::Attrs(r) => &r.module,
            NativeRecord::Dataclass(r) => &r.module,
            NativeRecord::Msgspec(r) => &r.module,
            NativeRecord::NamedTuple(r) => &r.module,
            NativeRecord::Pydantic(r) => &r.module,
            NativeRecord::TypedDict(r) => &r.module,
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for NativeRecord {
                fn from(record: $ty) -> Self {
                    NativeRecord::$variant(record)
                }
            }
        )*
    };
}

impl_from_native! {
    AttrsClass => Attrs,
    DataclassType => Dataclass,
    StructType => Msgspec,
    NamedTupleType => NamedTuple,
    PydanticModel => Pydantic,
    TypedDictType => TypedDict,
}

fn mismatch(expected: Framework, record: &NativeRecord) -> Error {
    Error::FrameworkMismatch {
        expected,
        found: record.framework(),
        record: record.name().to_string(),
    }
}

/// Resolve a field's stored annotation against the defining module.
fn resolve_type(
    module: &Module,
    record: &str,
    field: &str,
    annotation: Option<&Annotation>,
) -> Result<Option<TypeRef>, Error> {
    annotation
        .map(|ann| {
            module
                .resolve_annotation(ann)
                .map_err(|source| Error::TypeResolution {
                    record: record.to_string(),
                    field: field.to_string(),
                    reference: match ann {
                        Annotation::Forward(reference) => reference.clone(),
                        Annotation::Resolved(ty) => ty.to_string(),
                    },
                    source,
                })
        })
        .transpose()
}

/// Decide whether `schema` must be built keyword-only for a target with
/// `rule`, or reject it.
fn keyword_only_needed(
    framework: Framework,
    rule: OrderingRule,
    schema: &RecordSchema,
    config: &ConvertConfig,
) -> Result<bool, Error> {
    let Some((field, after)) = schema.first_order_violation() else {
        return Ok(false);
    };
    match (rule, config.ordering) {
        (OrderingRule::Unconstrained, _) => Ok(false),
        (OrderingRule::KeywordOnlyFallback, OrderingPolicy::KeywordOnly) => {
            tracing::debug!(
                record = schema.name(),
                field = field.name(),
                %framework,
                "required field follows a default, building keyword-only"
            );
            Ok(true)
        }
        (OrderingRule::KeywordOnlyFallback, OrderingPolicy::Strict) | (OrderingRule::Positional, _) => {
            Err(Error::FieldOrder {
                record: schema.name().to_string(),
                field: field.name().to_string(),
                after: after.name().to_string(),
                framework,
            })
        }
    }
}

/// The annotation to declare for a schema field on frameworks that require one.
fn declared_type(ty: Option<&TypeRef>) -> TypeRef {
    ty.cloned().unwrap_or_else(|| TypeRef::name("typing.Any"))
}
