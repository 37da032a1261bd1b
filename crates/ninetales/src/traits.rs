//! Traits for framework adapters.

use crate::adapters::NativeRecord;
use crate::config::ConvertConfig;
use crate::error::Error;
use crate::ir::RecordSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record-definition framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "attrs")]
    Attrs,
    #[serde(rename = "dataclasses")]
    Dataclasses,
    #[serde(rename = "msgspec")]
    Msgspec,
    #[serde(rename = "namedtuple")]
    NamedTuple,
    /// Pydantic 1.x (`__fields__` / `ModelField`).
    #[serde(rename = "pydantic-v1")]
    PydanticV1,
    /// Pydantic 2.x (`model_fields` / `FieldInfo`).
    #[serde(rename = "pydantic-v2")]
    PydanticV2,
    #[serde(rename = "typeddict")]
    TypedDict,
}

impl Framework {
    pub const ALL: [Framework; 7] = [
        Framework::Attrs,
        Framework::Dataclasses,
        Framework::Msgspec,
        Framework::NamedTuple,
        Framework::PydanticV1,
        Framework::PydanticV2,
        Framework::TypedDict,
    ];

    /// Stable identifier (e.g., "attrs", "pydantic-v2").
    pub fn name(self) -> &'static str {
        match self {
            Framework::Attrs => "attrs",
            Framework::Dataclasses => "dataclasses",
            Framework::Msgspec => "msgspec",
            Framework::NamedTuple => "namedtuple",
            Framework::PydanticV1 => "pydantic-v1",
            Framework::PydanticV2 => "pydantic-v2",
            Framework::TypedDict => "typeddict",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a framework treats a required field after a defaulted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingRule {
    /// Construction is keyword-based; order never matters.
    Unconstrained,
    /// Positional by default; violating schemas are built keyword-only.
    KeywordOnlyFallback,
    /// Positional only; violating schemas are rejected.
    Positional,
}

/// A framework adapter: reads native record metadata into the IR and
/// builds native record metadata back from it.
///
/// # Implementing Custom Adapters
///
/// ```ignore
/// use ninetales::{Adapter, Framework, OrderingRule, register_adapter};
///
/// struct MyAdapter;
///
/// impl Adapter for MyAdapter {
///     fn framework(&self) -> Framework { Framework::Attrs }
///     fn ordering(&self) -> OrderingRule { OrderingRule::Unconstrained }
///     fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error> { /* ... */ }
///     fn materialize(&self, schema: &RecordSchema, config: &ConvertConfig) -> Result<NativeRecord, Error> { /* ... */ }
///     fn render(&self, record: &NativeRecord) -> String { /* ... */ }
/// }
///
/// // Registered adapters take precedence over built-ins
/// register_adapter(&MyAdapter);
/// ```
pub trait Adapter: Send + Sync {
    /// The framework this adapter reads and writes.
    fn framework(&self) -> Framework;

    /// Which construction path the adapter takes for order violations.
    fn ordering(&self) -> OrderingRule;

    /// Read a native record into a schema, in declaration order.
    fn extract(&self, record: &NativeRecord) -> Result<RecordSchema, Error>;

    /// Build a native record from a schema. Never reorders fields.
    fn materialize(&self, schema: &RecordSchema, config: &ConvertConfig)
    -> Result<NativeRecord, Error>;

    /// Emit the native record as Python source.
    fn render(&self, record: &NativeRecord) -> String;
}
