//! Record type translation between Python data-model frameworks.
//!
//! `ninetales` reads a record definition from one framework (attrs,
//! dataclasses, msgspec, NamedTuple, pydantic, TypedDict), reduces it to a
//! framework-neutral schema, and builds an equivalent definition in another.
//!
//! # Architecture
//!
//! ```text
//! Native metadata        IR                  Native metadata
//! ───────────────    ─────────────────    ───────────────────
//! attrs.fields()  ─┐                   ┌─> attrs class
//! dataclasses     ─┤                   ├─> dataclass
//! msgspec.Struct  ─┼─> RecordSchema ───┼─> msgspec.Struct
//! NamedTuple      ─┤   (ir.rs)         ├─> NamedTuple
//! BaseModel       ─┤                   ├─> BaseModel (v1 / v2)
//! TypedDict       ─┘                   └─> TypedDict
//! ```
//!
//! Each framework spells "no default" with its own token (`attrs.NOTHING`,
//! `dataclasses.MISSING`, ...). Inside the IR there is exactly one:
//! [`ABSENT`]. Translation happens only in [`sentinel`].
//!
//! # Example
//!
//! ```
//! use ninetales::{ABSENT, ConvertConfig, FieldDescriptor, Framework, RecordSchema, TypeRef};
//!
//! let schema = RecordSchema::new(
//!     "Point",
//!     vec![
//!         FieldDescriptor::with_default("y", TypeRef::name("int"), 0),
//!         FieldDescriptor::new("x", Some(TypeRef::name("int")), ABSENT),
//!     ],
//! )
//! .unwrap();
//!
//! // Positional frameworks fall back to keyword-only construction.
//! let adapter = ninetales::get_adapter(Framework::Dataclasses);
//! let record = adapter.materialize(&schema, &ConvertConfig::default()).unwrap();
//! assert!(adapter.render(&record).contains("@dataclasses.dataclass(kw_only=True)"));
//!
//! // NamedTuple has no such fallback.
//! let err = ninetales::get_adapter(Framework::NamedTuple)
//!     .materialize(&schema, &ConvertConfig::default())
//!     .unwrap_err();
//! assert!(matches!(err, ninetales::Error::FieldOrder { .. }));
//! ```

pub mod adapters;
pub mod config;
pub mod error;
pub mod ir;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod sentinel;
pub mod traits;
pub mod types;
pub mod value;

pub use adapters::NativeRecord;
pub use config::{ConfigError, ConvertConfig, MutableDefaultPolicy, OrderingPolicy};
pub use error::Error;
pub use ir::{ABSENT, FieldDefault, FieldDescriptor, RecordSchema};
pub use registry::{adapter_for_name, adapters, get_adapter, register_adapter};
pub use runtime::TypeRegistry;
pub use sentinel::{Factory, NativeDefault, Sentinel};
pub use traits::{Adapter, Framework, OrderingRule};
pub use types::{Annotation, Module, ResolveError, TypeRef};
pub use value::Value;

/// Extract `record` with its own framework's adapter and materialize the
/// result for `target`.
pub fn convert(
    record: &NativeRecord,
    target: Framework,
    config: &ConvertConfig,
) -> Result<NativeRecord, Error> {
    let schema = get_adapter(record.framework()).extract(record)?;
    tracing::debug!(
        record = schema.name(),
        from = %record.framework(),
        to = %target,
        "converting record"
    );
    get_adapter(target).materialize(&schema, config)
}
