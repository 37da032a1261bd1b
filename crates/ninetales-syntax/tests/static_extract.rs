//! Reading record definitions from source without running it.

use ninetales::{
    ABSENT, ConvertConfig, Error, FieldDefault, FieldDescriptor, Framework, RecordSchema, TypeRef,
    Value, get_adapter,
};
use ninetales_syntax::{ExtractError, Span, extract_from_source, scan_source};

fn int() -> TypeRef {
    TypeRef::name("int")
}

fn list_of_str() -> TypeRef {
    TypeRef::generic("list", vec![TypeRef::name("str")])
}

fn value(v: impl Into<Value>) -> FieldDefault {
    FieldDefault::Value(v.into())
}

fn field(name: &str, ty: TypeRef, default: FieldDefault) -> FieldDescriptor {
    FieldDescriptor::new(name, Some(ty), default)
}

fn unsupported(source: &str) -> (String, String) {
    match extract_from_source(source) {
        Err(ExtractError::UnsupportedSyntax { node, rendered, .. }) => (node, rendered),
        other => panic!("expected UnsupportedSyntax, got {other:?}"),
    }
}

/// Frameworks the extractor recognizes; `BaseModel` reads as 2.x.
const STATIC_FRAMEWORKS: [Framework; 6] = [
    Framework::Attrs,
    Framework::Dataclasses,
    Framework::Msgspec,
    Framework::NamedTuple,
    Framework::PydanticV2,
    Framework::TypedDict,
];

#[test]
fn static_extraction_matches_runtime_extraction() {
    let config = ConvertConfig::default();
    let required_only = RecordSchema::new(
        "Movie",
        vec![
            FieldDescriptor::required("title", TypeRef::name("str")),
            FieldDescriptor::required("tags", list_of_str()),
            FieldDescriptor::required("year", TypeRef::optional(int())),
            FieldDescriptor::required(
                "rating",
                TypeRef::Literal {
                    origin: "typing.Literal".into(),
                    values: vec![Value::str("G"), Value::str("PG")],
                },
            ),
        ],
    )
    .unwrap();
    let with_defaults = RecordSchema::new(
        "Config",
        vec![
            FieldDescriptor::required("host", TypeRef::name("str")),
            FieldDescriptor::with_default("port", int(), 8080),
            FieldDescriptor::with_default("offset", int(), -3),
            FieldDescriptor::with_default("ratio", TypeRef::name("float"), 0.5),
            FieldDescriptor::with_default("name", TypeRef::name("str"), "it's"),
            FieldDescriptor::with_default("debug", TypeRef::name("bool"), false),
            FieldDescriptor::with_default("parent", TypeRef::optional(int()), Value::None),
            FieldDescriptor::with_default("plugins", list_of_str(), Value::List(vec![])),
        ],
    )
    .unwrap();

    for framework in STATIC_FRAMEWORKS {
        let adapter = get_adapter(framework);
        for schema in [&required_only, &with_defaults] {
            if framework == Framework::TypedDict && schema.fields().iter().any(|f| f.has_default()) {
                continue;
            }
            let native = adapter.materialize(schema, &config).unwrap();
            let source = adapter.render(&native);
            let runtime = adapter.extract(&native).unwrap();
            let extracted = extract_from_source(&source)
                .unwrap_or_else(|err| panic!("{framework}: {err}\n{source}"));
            assert_eq!(extracted, vec![runtime], "{framework}\n{source}");
        }
    }
}

#[test]
fn keyword_only_fallback_reads_back_in_declared_order() {
    let point = RecordSchema::new(
        "Point",
        vec![
            FieldDescriptor::with_default("y", int(), 0),
            FieldDescriptor::required("x", int()),
        ],
    )
    .unwrap();
    for framework in [
        Framework::Attrs,
        Framework::Dataclasses,
        Framework::Msgspec,
        Framework::PydanticV2,
    ] {
        let adapter = get_adapter(framework);
        let native = adapter.materialize(&point, &ConvertConfig::default()).unwrap();
        let source = adapter.render(&native);
        assert_eq!(
            extract_from_source(&source).unwrap(),
            vec![point.clone()],
            "{framework}\n{source}"
        );
    }
}

#[test]
fn explicit_attrs_form() {
    let schema = RecordSchema::new(
        "Bare",
        vec![
            FieldDescriptor::new("x", None, ABSENT),
            FieldDescriptor::with_default("y", int(), 0),
        ],
    )
    .unwrap();
    let adapter = get_adapter(Framework::Attrs);
    let native = adapter.materialize(&schema, &ConvertConfig::default()).unwrap();
    let source = adapter.render(&native);
    assert!(source.contains("auto_attribs=False"), "{source}");
    assert_eq!(extract_from_source(&source).unwrap(), vec![schema]);
}

const MIXED: &str = r#"from __future__ import annotations

import dataclasses
import typing
from typing import ClassVar, TypedDict

import attrs
import msgspec
import pydantic


@dataclasses.dataclass(frozen=True)
class Point:
    """A point."""

    origin: ClassVar[int] = 0
    x: int
    y: int = -1
    tags: list[str] = dataclasses.field(default_factory=list)

    def norm(self) -> float:
        return 0.0


@attrs.define
class Server:
    host: str
    port: int = attrs.field(default=8080)
    plugins: list[str] = attrs.Factory(list)


class Event(msgspec.Struct, kw_only=True):
    kind: typing.Literal["a", "b"]
    payload: dict[str, int] | None = None


class User(pydantic.BaseModel):
    model_config = pydantic.ConfigDict(frozen=True)

    id: int
    name: str = pydantic.Field("anon")
    email: str = pydantic.Field(...)
    parent: "User | None" = None


class Movie(TypedDict):
    title: str
    year: int


class Helper:
    x: int = 0
    def run(self): ...
"#;

#[test]
fn mixed_module() {
    let records = scan_source(MIXED).unwrap();
    let names: Vec<(&str, Framework)> = records
        .iter()
        .map(|r| (r.schema.name(), r.framework))
        .collect();
    assert_eq!(
        names,
        [
            ("Point", Framework::Dataclasses),
            ("Server", Framework::Attrs),
            ("Event", Framework::Msgspec),
            ("User", Framework::PydanticV2),
            ("Movie", Framework::TypedDict),
        ]
    );

    assert_eq!(
        records[0].schema.fields(),
        [
            field("x", int(), ABSENT),
            field("y", int(), value(-1)),
            field("tags", list_of_str(), value(Value::List(vec![]))),
        ]
    );
    assert_eq!(records[0].span, Span::new(12, 0));

    assert_eq!(
        records[1].schema.fields(),
        [
            field("host", TypeRef::name("str"), ABSENT),
            field("port", int(), value(8080)),
            field("plugins", list_of_str(), value(Value::List(vec![]))),
        ]
    );

    assert_eq!(
        records[2].schema.fields(),
        [
            field(
                "kind",
                TypeRef::Literal {
                    origin: "typing.Literal".into(),
                    values: vec![Value::str("a"), Value::str("b")],
                },
                ABSENT,
            ),
            field(
                "payload",
                TypeRef::optional(TypeRef::generic(
                    "dict",
                    vec![TypeRef::name("str"), int()],
                )),
                value(Value::None),
            ),
        ]
    );

    assert_eq!(
        records[3].schema.fields(),
        [
            field("id", int(), ABSENT),
            field("name", TypeRef::name("str"), value("anon")),
            field("email", TypeRef::name("str"), ABSENT),
            field("parent", TypeRef::optional(TypeRef::name("User")), value(Value::None)),
        ]
    );

    assert_eq!(records[4].schema.field_names(), ["title", "year"]);
}

#[test]
fn configuration_is_captured_not_applied() {
    let records = scan_source(MIXED).unwrap();
    let config = |i: usize| -> Vec<String> {
        records[i]
            .config
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect()
    };
    assert_eq!(config(0), ["frozen=True"]);
    assert!(config(1).is_empty());
    assert_eq!(config(2), ["kw_only=True"]);
    assert_eq!(config(3), ["model_config=pydantic.ConfigDict(frozen=True)"]);
}

#[test]
fn make_dataclass_functional_form() {
    let source = r#"
from dataclasses import field, make_dataclass

C = make_dataclass(
    "C",
    [("a", str), ("b", int, 5), ("c", int, field(default=5)), "d"],
    frozen=True,
)
"#;
    let records = scan_source(source).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].framework, Framework::Dataclasses);
    assert_eq!(records[0].config[0].name, "frozen");
    assert_eq!(
        records[0].schema,
        RecordSchema::new(
            "C",
            vec![
                field("a", TypeRef::name("str"), ABSENT),
                field("b", int(), value(5)),
                field("c", int(), value(5)),
                field("d", TypeRef::name("typing.Any"), ABSENT),
            ],
        )
        .unwrap()
    );
}

#[test]
fn forward_references_resolve_against_the_unit() {
    let source = r#"
import dataclasses
import datetime as dt

@dataclasses.dataclass
class Node:
    next: "Node | None"
    when: "dt.date"
    children: "list[Node]"
"#;
    let schemas = extract_from_source(source).unwrap();
    let types: Vec<String> = schemas[0]
        .fields()
        .iter()
        .map(|f| f.ty().map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(types, ["Node | None", "dt.date", "list[Node]"]);

    let err = extract_from_source(
        "import dataclasses\n\n@dataclasses.dataclass\nclass A:\n    x: \"Missing\"\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Engine(Error::TypeResolution { ref field, ref reference, .. })
            if field == "x" && reference == "Missing"
    ));
}

#[test]
fn unsupported_constructs_fail_loud() {
    let header = "import dataclasses\n\n@dataclasses.dataclass\n";

    let (node, rendered) = unsupported(&format!("{header}class A:\n    x: int = compute()\n"));
    assert_eq!((node.as_str(), rendered.as_str()), ("Call", "compute()"));

    let (node, _) = unsupported(&format!("{header}class A:\n    if True:\n        x: int\n"));
    assert_eq!(node, "if_statement");

    let (node, rendered) = unsupported(&format!("{header}class A:\n    x = 1\n"));
    assert_eq!((node.as_str(), rendered.as_str()), ("Assign", "x = 1"));

    let (node, rendered) = unsupported(&format!("{header}class A(Base):\n    x: int\n"));
    assert_eq!((node.as_str(), rendered.as_str()), ("Name", "Base"));

    let (node, _) = unsupported(&format!("{header}class A:\n    x: list[int] = []\n"));
    assert_eq!(node, "List");

    let (node, _) = unsupported(&format!("{header}class A:\n    x: int = field(**opts)\n"));
    assert_eq!(node, "Name");

    let (node, rendered) =
        unsupported("import pydantic\n\n@dataclasses.dataclass\nclass A(pydantic.BaseModel):\n    x: int\n");
    assert_eq!((node.as_str(), rendered.as_str()), ("Attribute", "pydantic.BaseModel"));
}

#[test]
fn unsupported_syntax_reports_position() {
    let err = extract_from_source(
        "import dataclasses\n\n@dataclasses.dataclass\nclass A:\n    x: int\n    y += 1\n",
    )
    .unwrap_err();
    match err {
        ExtractError::UnsupportedSyntax { span, .. } => assert_eq!(span, Span::new(6, 4)),
        other => panic!("expected UnsupportedSyntax, got {other:?}"),
    }
}

#[test]
fn typeddict_restrictions() {
    let err = extract_from_source(
        "from typing import NotRequired, TypedDict\n\nclass M(TypedDict):\n    title: str\n    year: NotRequired[int]\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Engine(Error::UnsupportedMember { ref field, .. }) if field == "year"
    ));

    let (node, rendered) =
        unsupported("import typing\n\nclass M(typing.TypedDict):\n    year: int = 0\n");
    assert_eq!((node.as_str(), rendered.as_str()), ("Constant", "0"));
}

#[test]
fn typeddict_total_false() {
    let err = extract_from_source(
        "from typing import TypedDict\n\nclass M(TypedDict, total=False):\n    title: str\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Engine(Error::UnsupportedMember { ref field, .. }) if field == "title"
    ));

    let schemas = extract_from_source(
        "from typing import Required, TypedDict\n\nclass M(TypedDict, total=False):\n    title: Required[str]\n",
    )
    .unwrap();
    assert_eq!(
        schemas[0].fields(),
        &[field("title", TypeRef::name("str"), ABSENT)]
    );
}

#[test]
fn kw_only_marker_is_skipped() {
    let source = "\
import dataclasses

@dataclasses.dataclass
class P:
    x: int
    _: dataclasses.KW_ONLY
    y: int = 0
";
    let schemas = extract_from_source(source).unwrap();
    assert_eq!(schemas[0].field_names(), ["x", "y"]);
}

#[test]
fn fields_excluded_from_init_are_unsupported() {
    let sources = [
        "import dataclasses\n\n@dataclasses.dataclass\nclass Order:\n    qty: int\n    total: int = dataclasses.field(init=False)\n",
        "import attrs\n\n@attrs.define\nclass Order:\n    qty: int\n    total: int = attrs.field(init=False)\n",
    ];
    for source in sources {
        let err = extract_from_source(source).unwrap_err();
        assert!(
            matches!(
                err,
                ExtractError::Engine(Error::UnsupportedMember { ref field, .. }) if field == "total"
            ),
            "{source}: {err:?}"
        );
    }
}

#[test]
fn duplicate_fields_are_engine_errors() {
    let err = extract_from_source(
        "import msgspec\n\nclass S(msgspec.Struct):\n    a: int\n    a: str\n",
    )
    .unwrap_err();
    assert!(matches!(err, ExtractError::Engine(Error::DuplicateField { .. })));
}

#[test]
fn syntax_errors_are_parse_errors() {
    assert!(matches!(
        extract_from_source("class A(:\n    x: int\n"),
        Err(ExtractError::Parse(_))
    ));
}

#[test]
fn schema_json_snapshot() {
    let schemas = extract_from_source(
        "import attrs\n\n@attrs.frozen\nclass Pair:\n    left: int\n    right: int = 0\n",
    )
    .unwrap();
    insta::assert_json_snapshot!(schemas[0], @r#"
    {
      "name": "Pair",
      "fields": [
        {
          "name": "left",
          "type": {
            "kind": "name",
            "path": "int"
          },
          "default": {
            "kind": "absent"
          }
        },
        {
          "name": "right",
          "type": {
            "kind": "name",
            "path": "int"
          },
          "default": {
            "kind": "value",
            "value": {
              "kind": "int",
              "value": 0
            }
          }
        }
      ]
    }
    "#);
}
