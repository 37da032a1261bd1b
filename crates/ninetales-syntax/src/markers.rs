//! The closed set of syntactic shapes that mark a record definition.
//!
//! Matching is by spelling only. A marker outside these tables is not a
//! record, however much it looks like one.

use ninetales::Framework;

/// Class decorators, bare or qualified.
const DECORATORS: &[(&str, Framework)] = &[
    ("dataclass", Framework::Dataclasses),
    ("dataclasses.dataclass", Framework::Dataclasses),
    ("define", Framework::Attrs),
    ("frozen", Framework::Attrs),
    ("mutable", Framework::Attrs),
    ("attrs.define", Framework::Attrs),
    ("attrs.frozen", Framework::Attrs),
    ("attrs.mutable", Framework::Attrs),
    ("attr.define", Framework::Attrs),
    ("attr.frozen", Framework::Attrs),
    ("attr.mutable", Framework::Attrs),
];

/// Base classes, bare or qualified. `BaseModel` is read in its 2.x shape.
const BASES: &[(&str, Framework)] = &[
    ("BaseModel", Framework::PydanticV2),
    ("pydantic.BaseModel", Framework::PydanticV2),
    ("Struct", Framework::Msgspec),
    ("msgspec.Struct", Framework::Msgspec),
    ("NamedTuple", Framework::NamedTuple),
    ("typing.NamedTuple", Framework::NamedTuple),
    ("TypedDict", Framework::TypedDict),
    ("typing.TypedDict", Framework::TypedDict),
    ("typing_extensions.TypedDict", Framework::TypedDict),
];

/// Bases that contribute no fields and may accompany a record marker.
const NEUTRAL_BASES: &[&str] = &[
    "object",
    "Generic",
    "typing.Generic",
    "ABC",
    "abc.ABC",
];

/// Per-field specifier calls.
const FIELD_SPECIFIERS: &[(&str, Framework)] = &[
    ("field", Framework::Dataclasses),
    ("dataclasses.field", Framework::Dataclasses),
    ("field", Framework::Attrs),
    ("attrs.field", Framework::Attrs),
    ("attr.field", Framework::Attrs),
    ("attr.ib", Framework::Attrs),
    ("field", Framework::Msgspec),
    ("msgspec.field", Framework::Msgspec),
    ("Field", Framework::PydanticV2),
    ("pydantic.Field", Framework::PydanticV2),
];

const ATTRS_FACTORIES: &[&str] = &["Factory", "attrs.Factory", "attr.Factory"];

const MAKE_DATACLASS: &[&str] = &["make_dataclass", "dataclasses.make_dataclass"];

/// Annotations that declare class attributes or markers rather than fields.
const NON_FIELD_ANNOTATIONS: &[&str] = &[
    "ClassVar",
    "typing.ClassVar",
    "InitVar",
    "dataclasses.InitVar",
    "KW_ONLY",
    "dataclasses.KW_ONLY",
];

/// TypedDict key qualifiers that make a key optional.
const NOT_REQUIRED: &[&str] = &[
    "NotRequired",
    "typing.NotRequired",
    "typing_extensions.NotRequired",
];

/// TypedDict key qualifiers that keep a key required under `total=False`.
const REQUIRED: &[&str] = &["Required", "typing.Required", "typing_extensions.Required"];

fn lookup(table: &[(&str, Framework)], name: &str) -> Option<Framework> {
    table.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

pub fn decorator_framework(name: &str) -> Option<Framework> {
    lookup(DECORATORS, name)
}

pub fn base_framework(name: &str) -> Option<Framework> {
    lookup(BASES, name)
}

pub fn is_neutral_base(name: &str) -> bool {
    NEUTRAL_BASES.contains(&name)
}

pub fn is_field_specifier(framework: Framework, name: &str) -> bool {
    FIELD_SPECIFIERS
        .iter()
        .any(|(n, f)| *f == framework && *n == name)
}

pub fn is_attrs_factory(name: &str) -> bool {
    ATTRS_FACTORIES.contains(&name)
}

pub fn is_make_dataclass(name: &str) -> bool {
    MAKE_DATACLASS.contains(&name)
}

pub fn is_non_field_annotation(name: &str) -> bool {
    NON_FIELD_ANNOTATIONS.contains(&name)
}

pub fn is_not_required(name: &str) -> bool {
    NOT_REQUIRED.contains(&name)
}

pub fn is_required(name: &str) -> bool {
    REQUIRED.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorators() {
        assert_eq!(decorator_framework("attr.frozen"), Some(Framework::Attrs));
        assert_eq!(
            decorator_framework("dataclasses.dataclass"),
            Some(Framework::Dataclasses)
        );
        assert_eq!(decorator_framework("attr.s"), None);
        assert_eq!(decorator_framework("my.dataclass"), None);
    }

    #[test]
    fn test_field_specifiers_are_per_framework() {
        assert!(is_field_specifier(Framework::Dataclasses, "field"));
        assert!(is_field_specifier(Framework::PydanticV2, "Field"));
        assert!(!is_field_specifier(Framework::PydanticV2, "field"));
        assert!(!is_field_specifier(Framework::Dataclasses, "attrs.field"));
        assert!(!is_field_specifier(Framework::NamedTuple, "field"));
    }

    #[test]
    fn test_non_field_annotations() {
        assert!(is_non_field_annotation("ClassVar"));
        assert!(is_non_field_annotation("dataclasses.KW_ONLY"));
        assert!(is_non_field_annotation("KW_ONLY"));
        assert!(!is_non_field_annotation("Required"));
        assert!(is_required("typing.Required"));
        assert!(!is_required("NotRequired"));
    }
}
