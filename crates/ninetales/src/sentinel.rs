//! Translation between framework "no default" tokens and [`ABSENT`].
//!
//! Each framework spells "no default" differently. The two tables below are
//! the only place those spellings are interpreted: [`ABSENT_ON_READ`] maps
//! native metadata to the IR, [`ABSENT_ON_WRITE`] maps the IR back.

use crate::error::Error;
use crate::ir::{ABSENT, FieldDefault};
use crate::traits::Framework;
use crate::value::Value;
use std::fmt;

/// A framework's private "nothing here" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// `attrs.NOTHING`
    Nothing,
    /// `dataclasses.MISSING`
    Missing,
    /// `msgspec.NODEFAULT`
    NoDefault,
    /// `pydantic_core.PydanticUndefined` (v2) / `pydantic.fields.Undefined` (v1)
    PydanticUndefined,
    /// The field has no entry in a defaults mapping (`_field_defaults`).
    NotPresent,
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentinel::Nothing => "attrs.NOTHING",
            Sentinel::Missing => "dataclasses.MISSING",
            Sentinel::NoDefault => "msgspec.NODEFAULT",
            Sentinel::PydanticUndefined => "PydanticUndefined",
            Sentinel::NotPresent => "<not present>",
        })
    }
}

/// A callable that produces a default (`default_factory=`, `attrs.Factory`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    pub path: String,
}

impl Factory {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The value a builtin empty-container factory always produces.
    pub fn empty_value(&self) -> Option<Value> {
        match self.path.as_str() {
            "list" => Some(Value::List(Vec::new())),
            "dict" => Some(Value::Dict(Vec::new())),
            "set" => Some(Value::Set(Vec::new())),
            "tuple" => Some(Value::Tuple(Vec::new())),
            "frozenset" => Some(Value::FrozenSet(Vec::new())),
            _ => None,
        }
    }

    /// The builtin factory for an empty container value.
    pub fn for_empty(value: &Value) -> Option<Factory> {
        if !value.is_empty_container() {
            return None;
        }
        let path = match value {
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::FrozenSet(_) => "frozenset",
            _ => return None,
        };
        Some(Factory::new(path))
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A default slot as a framework's reflection API reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeDefault {
    Token(Sentinel),
    Value(Value),
    Factory(Factory),
}

impl NativeDefault {
    pub fn value(value: impl Into<Value>) -> Self {
        NativeDefault::Value(value.into())
    }

    pub fn factory(path: impl Into<String>) -> Self {
        NativeDefault::Factory(Factory::new(path))
    }
}

/// A native reading that means "no default".
#[derive(Debug, Clone, Copy, PartialEq)]
enum NoDefault {
    Token(Sentinel),
    /// A literal `None` default.
    NoneValue,
}

/// Native → canonical.
const ABSENT_ON_READ: &[(Framework, &[NoDefault])] = &[
    (Framework::Attrs, &[NoDefault::Token(Sentinel::Nothing)]),
    (Framework::Dataclasses, &[NoDefault::Token(Sentinel::Missing)]),
    (Framework::Msgspec, &[NoDefault::Token(Sentinel::NoDefault)]),
    (Framework::NamedTuple, &[NoDefault::Token(Sentinel::NotPresent)]),
    // Pydantic 1.x reports `default=None` for required fields, so a real
    // `None` default is indistinguishable from none at all.
    (
        Framework::PydanticV1,
        &[
            NoDefault::Token(Sentinel::PydanticUndefined),
            NoDefault::NoneValue,
        ],
    ),
    (
        Framework::PydanticV2,
        &[NoDefault::Token(Sentinel::PydanticUndefined)],
    ),
    (Framework::TypedDict, &[NoDefault::Token(Sentinel::NotPresent)]),
];

/// Canonical → native.
const ABSENT_ON_WRITE: &[(Framework, Sentinel)] = &[
    (Framework::Attrs, Sentinel::Nothing),
    (Framework::Dataclasses, Sentinel::Missing),
    (Framework::Msgspec, Sentinel::NoDefault),
    (Framework::NamedTuple, Sentinel::NotPresent),
    (Framework::PydanticV1, Sentinel::PydanticUndefined),
    (Framework::PydanticV2, Sentinel::PydanticUndefined),
    (Framework::TypedDict, Sentinel::NotPresent),
];

fn read_table(framework: Framework) -> &'static [NoDefault] {
    ABSENT_ON_READ
        .iter()
        .find(|(f, _)| *f == framework)
        .map(|(_, tokens)| *tokens)
        .unwrap_or(&[])
}

/// The token `framework` uses to mean "no default".
pub fn absent_token(framework: Framework) -> Sentinel {
    ABSENT_ON_WRITE
        .iter()
        .find(|(f, _)| *f == framework)
        .map(|(_, token)| *token)
        .unwrap_or(Sentinel::NotPresent)
}

/// Map a native default slot into the IR.
///
/// Fails on tokens that belong to another framework and on factories whose
/// result cannot be known without calling them.
pub fn to_canonical(
    framework: Framework,
    record: &str,
    field: &str,
    native: &NativeDefault,
) -> Result<FieldDefault, Error> {
    let table = read_table(framework);
    match native {
        NativeDefault::Token(token) if table.contains(&NoDefault::Token(*token)) => Ok(ABSENT),
        NativeDefault::Token(token) => Err(Error::unsupported_member(
            record,
            field,
            format!("{framework} metadata carries foreign sentinel {token}"),
        )),
        NativeDefault::Value(Value::None) if table.contains(&NoDefault::NoneValue) => {
            tracing::warn!(
                record,
                field,
                %framework,
                "`None` default collapses to ABSENT: framework does not distinguish it from no default"
            );
            Ok(ABSENT)
        }
        NativeDefault::Value(value) => Ok(FieldDefault::Value(value.clone())),
        NativeDefault::Factory(factory) => match factory.empty_value() {
            Some(value) => Ok(FieldDefault::Value(value)),
            None => Err(Error::unsupported_member(
                record,
                field,
                format!("default is computed by factory `{factory}`"),
            )),
        },
    }
}

/// Map an IR default into `framework`'s native slot.
pub fn to_native(framework: Framework, default: &FieldDefault) -> NativeDefault {
    match default {
        FieldDefault::Absent => NativeDefault::Token(absent_token(framework)),
        FieldDefault::Value(value) => NativeDefault::Value(value.clone()),
    }
}
