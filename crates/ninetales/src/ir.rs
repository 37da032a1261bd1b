//! Intermediate representation for record types.
//!
//! Every extraction adapter produces a [`RecordSchema`] and every
//! materialization adapter consumes one. No framework-specific sentinel
//! crosses this boundary: "no default" is always [`FieldDefault::Absent`].

use crate::error::Error;
use crate::types::TypeRef;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The default of a field, with one canonical "no default" marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldDefault {
    /// The field declares no default.
    Absent,
    /// The field defaults to this value (which may be `None`).
    Value(Value),
}

/// Canonical "no default" marker. Compares equal to any other `Absent`.
pub const ABSENT: FieldDefault = FieldDefault::Absent;

impl FieldDefault {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldDefault::Absent)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            FieldDefault::Absent => None,
            FieldDefault::Value(v) => Some(v),
        }
    }
}

impl From<Value> for FieldDefault {
    fn from(value: Value) -> Self {
        FieldDefault::Value(value)
    }
}

/// A normalized `(name, type, default)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    #[serde(rename = "type")]
    ty: Option<TypeRef>,
    default: FieldDefault,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: Option<TypeRef>, default: FieldDefault) -> Self {
        Self {
            name: name.into(),
            ty,
            default,
        }
    }

    /// A typed field with no default.
    pub fn required(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, Some(ty), ABSENT)
    }

    /// A typed field with a default value.
    pub fn with_default(name: impl Into<String>, ty: TypeRef, default: impl Into<Value>) -> Self {
        Self::new(name, Some(ty), FieldDefault::Value(default.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_absent()
    }
}

/// A named, ordered list of fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Build a schema, rejecting duplicate field names.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self, Error> {
        let name = name.into();
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateField {
                    record: name,
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// The first field without a default that follows a defaulted one,
    /// paired with the defaulted field it follows.
    pub fn first_order_violation(&self) -> Option<(&FieldDescriptor, &FieldDescriptor)> {
        let mut last_defaulted = None;
        for field in &self.fields {
            match (field.has_default(), last_defaulted) {
                (true, _) => last_defaulted = Some(field),
                (false, Some(defaulted)) => return Some((field, defaulted)),
                (false, None) => {}
            }
        }
        None
    }
}

// Deserialization goes through `new` so the uniqueness invariant holds for
// schemas read back from JSON.
impl<'de> Deserialize<'de> for RecordSchema {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            name: String,
            fields: Vec<FieldDescriptor>,
        }
        let raw = Raw::deserialize(deserializer)?;
        RecordSchema::new(raw.name, raw.fields).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeRef {
        TypeRef::name("int")
    }

    #[test]
    fn test_absent_equality_by_kind() {
        assert_eq!(ABSENT, FieldDefault::Absent);
        assert_ne!(ABSENT, FieldDefault::Value(Value::None));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = RecordSchema::new(
            "Point",
            vec![
                FieldDescriptor::required("x", int()),
                FieldDescriptor::required("x", int()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { field, .. } if field == "x"));
    }

    #[test]
    fn test_order_violation() {
        let schema = RecordSchema::new(
            "Point",
            vec![
                FieldDescriptor::with_default("y", int(), 0),
                FieldDescriptor::required("x", int()),
            ],
        )
        .unwrap();
        let (field, after) = schema.first_order_violation().unwrap();
        assert_eq!(field.name(), "x");
        assert_eq!(after.name(), "y");

        let ok = RecordSchema::new(
            "Point",
            vec![
                FieldDescriptor::required("x", int()),
                FieldDescriptor::with_default("y", int(), 0),
            ],
        )
        .unwrap();
        assert!(ok.first_order_violation().is_none());
    }

    #[test]
    fn test_descriptor_equality() {
        let a = FieldDescriptor::new("a", Some(int()), ABSENT);
        let b = FieldDescriptor::required("a", int());
        assert_eq!(a, b);
        assert_ne!(a, FieldDescriptor::new("a", Some(int()), Value::None.into()));
        assert_ne!(a, FieldDescriptor::new("a", None, ABSENT));
    }
}
