//! Static extraction of record definitions.
//!
//! Walks the top level of a [`Module`](ast::Module), recognizes record
//! definitions through the [`markers`] tables, and reads their fields
//! without evaluating anything. Whatever falls outside the recognized
//! subset is reported as [`ExtractError::UnsupportedSyntax`].

use crate::ast::{self, ClassDef, Expr, Keyword, Span, Stmt, UnaryOp};
use crate::error::ExtractError;
use crate::markers;
use ninetales::sentinel::{self, Factory, NativeDefault};
use ninetales::types::is_literal_origin;
use ninetales::{ABSENT, FieldDescriptor, Framework, RecordSchema, TypeRef, Value};
use serde::Serialize;

/// Name of the namespace forward references are resolved in.
const UNIT: &str = "<source>";

/// A configuration keyword as written (`frozen=True`, `kw_only=True`,
/// `total=False`, `model_config = ...`).
///
/// Options are kept for inspection only and never change the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigOption {
    pub name: String,
    pub value: Expr,
}

/// A recognized record definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRecord {
    pub framework: Framework,
    pub schema: RecordSchema,
    pub config: Vec<ConfigOption>,
    pub span: Span,
}

/// Every recognized record in `module`, in source order.
pub fn scan_module(module: &ast::Module) -> Result<Vec<StaticRecord>, ExtractError> {
    let ns = namespace(module);
    let mut records = Vec::new();
    for stmt in &module.body {
        let record = match stmt {
            Stmt::ClassDef(class) => scan_class(class, &ns)?,
            Stmt::Assign {
                targets,
                value,
                span,
            } => scan_functional(targets, value, *span, &ns)?,
            _ => None,
        };
        if let Some(record) = record {
            tracing::debug!(
                record = record.schema.name(),
                framework = %record.framework,
                fields = record.schema.fields().len(),
                "recognized record"
            );
            records.push(record);
        }
    }
    Ok(records)
}

/// The schema of every recognized record in `module`, in source order.
pub fn extract_from_module(module: &ast::Module) -> Result<Vec<RecordSchema>, ExtractError> {
    Ok(scan_module(module)?
        .into_iter()
        .map(|record| record.schema)
        .collect())
}

/// Names the unit binds at top level: imports, classes and assignments.
fn namespace(module: &ast::Module) -> ninetales::Module {
    let mut ns = ninetales::Module::new(UNIT);
    for stmt in &module.body {
        match stmt {
            Stmt::Import { names, .. } => {
                for alias in names {
                    match &alias.asname {
                        Some(asname) => ns.import(asname),
                        // `import a.b` binds `a`
                        None => ns.import(alias.name.split('.').next().unwrap_or(&alias.name)),
                    };
                }
            }
            Stmt::ImportFrom { names, .. } => {
                for alias in names.iter().filter(|a| a.name != "*") {
                    ns.define(alias.bound_name());
                }
            }
            Stmt::ClassDef(class) => {
                ns.define(&class.name);
            }
            Stmt::Assign { targets, .. } => {
                for target in targets {
                    if let Expr::Name(id) = target {
                        ns.define(id);
                    }
                }
            }
            Stmt::AnnAssign {
                target: Expr::Name(id),
                ..
            } => {
                ns.define(id);
            }
            _ => {}
        }
    }
    ns
}

fn scan_class(
    class: &ClassDef,
    ns: &ninetales::Module,
) -> Result<Option<StaticRecord>, ExtractError> {
    let mut framework = None;
    let mut config = Vec::new();

    for decorator in &class.decorators {
        let (callee, call) = match decorator {
            Expr::Call {
                func,
                args,
                keywords,
            } => (func.as_ref(), Some((args, keywords))),
            other => (other, None),
        };
        let Some(found) = callee
            .dotted_name()
            .and_then(|name| markers::decorator_framework(&name))
        else {
            continue;
        };
        if framework.is_some() {
            return Err(ExtractError::expr(decorator, class.span, "second record marker"));
        }
        if let Some((args, keywords)) = call {
            if let Some(arg) = args.first() {
                return Err(ExtractError::expr(
                    arg,
                    class.span,
                    "record decorators take keyword configuration only",
                ));
            }
            config.extend(config_options(keywords, class.span)?);
        }
        framework = Some(found);
    }

    for base in &class.bases {
        if let Some(found) = head_name(base).and_then(|name| markers::base_framework(&name)) {
            if framework.is_some() {
                return Err(ExtractError::expr(base, class.span, "second record marker"));
            }
            framework = Some(found);
        }
    }

    let Some(framework) = framework else {
        tracing::trace!(class = %class.name, "not a record definition");
        return Ok(None);
    };

    for base in &class.bases {
        let name = head_name(base);
        let known = name.as_deref().is_some_and(|name| {
            markers::base_framework(name).is_some() || markers::is_neutral_base(name)
        });
        if !known {
            return Err(ExtractError::expr(
                base,
                class.span,
                "base class may contribute fields",
            ));
        }
    }
    config.extend(config_options(&class.keywords, class.span)?);

    let total = match framework {
        Framework::TypedDict => typed_dict_total(class)?,
        _ => true,
    };
    let scanner = FieldScanner {
        framework,
        record: &class.name,
        ns,
        total,
    };
    let mut fields = Vec::new();
    for stmt in &class.body {
        match stmt {
            Stmt::AnnAssign {
                target,
                annotation,
                value,
                span,
            } => {
                if let Some(field) =
                    scanner.field(target, Some(annotation), value.as_ref(), *span)?
                {
                    fields.push(field);
                }
            }
            // `x = attrs.field(type=int)` in the explicit attrs form.
            Stmt::Assign {
                targets,
                value: value @ Expr::Call { func, keywords, .. },
                span,
            } if framework == Framework::Attrs
                && matches!(targets.as_slice(), [Expr::Name(_)])
                && func
                    .dotted_name()
                    .is_some_and(|name| markers::is_field_specifier(framework, &name)) =>
            {
                let annotation = keywords
                    .iter()
                    .find(|kw| kw.arg.as_deref() == Some("type"))
                    .map(|kw| &kw.value);
                fields.extend(scanner.field(&targets[0], annotation, Some(value), *span)?);
            }
            // Methods, nested classes, docstrings and placeholders.
            Stmt::FunctionDef { .. } | Stmt::ClassDef(_) | Stmt::Pass { .. } => {}
            Stmt::Expr {
                value: Expr::Constant(Value::Str(_) | Value::Ellipsis),
                ..
            } => {}
            Stmt::Assign { targets, value, .. }
                if framework == Framework::PydanticV2
                    && matches!(targets.as_slice(), [Expr::Name(id)] if id == "model_config") =>
            {
                config.push(ConfigOption {
                    name: "model_config".to_string(),
                    value: value.clone(),
                });
            }
            other => {
                return Err(ExtractError::stmt(
                    other,
                    "only annotated fields are read from a record body",
                ));
            }
        }
    }

    Ok(Some(StaticRecord {
        framework,
        schema: RecordSchema::new(&class.name, fields)?,
        config,
        span: class.span,
    }))
}

/// `Name = make_dataclass("Name", [...], **config)`
fn scan_functional(
    targets: &[Expr],
    value: &Expr,
    span: Span,
    ns: &ninetales::Module,
) -> Result<Option<StaticRecord>, ExtractError> {
    let Expr::Call {
        func,
        args,
        keywords,
    } = value
    else {
        return Ok(None);
    };
    if !func
        .dotted_name()
        .is_some_and(|name| markers::is_make_dataclass(&name))
    {
        return Ok(None);
    }
    if !matches!(targets, [Expr::Name(_)]) {
        return Err(ExtractError::expr(
            value,
            span,
            "make_dataclass result must be bound to one name",
        ));
    }
    let (name, items) = match args.as_slice() {
        [Expr::Constant(Value::Str(name)), Expr::List(items) | Expr::Tuple(items)] => {
            (name, items)
        }
        _ => {
            return Err(ExtractError::expr(
                value,
                span,
                "expected a literal name and a literal field list",
            ));
        }
    };

    let scanner = FieldScanner {
        framework: Framework::Dataclasses,
        record: name,
        ns,
        total: true,
    };
    let mut fields = Vec::new();
    for item in items {
        let field = match item {
            // make_dataclass annotates bare names as `typing.Any`.
            Expr::Constant(Value::Str(field)) => Some(FieldDescriptor::new(
                field,
                Some(TypeRef::name("typing.Any")),
                ABSENT,
            )),
            Expr::Tuple(parts) => match parts.as_slice() {
                [Expr::Constant(Value::Str(field)), ty] => {
                    scanner.field(&Expr::name(field), Some(ty), None, span)?
                }
                [Expr::Constant(Value::Str(field)), ty, default] => {
                    scanner.field(&Expr::name(field), Some(ty), Some(default), span)?
                }
                _ => {
                    return Err(ExtractError::expr(
                        item,
                        span,
                        "expected `(name, type)` or `(name, type, default)`",
                    ));
                }
            },
            other => {
                return Err(ExtractError::expr(other, span, "expected a field entry"));
            }
        };
        fields.extend(field);
    }

    Ok(Some(StaticRecord {
        framework: Framework::Dataclasses,
        schema: RecordSchema::new(name, fields)?,
        config: config_options(keywords, span)?,
        span,
    }))
}

fn config_options(keywords: &[Keyword], span: Span) -> Result<Vec<ConfigOption>, ExtractError> {
    keywords
        .iter()
        .map(|kw| match &kw.arg {
            Some(name) => Ok(ConfigOption {
                name: name.clone(),
                value: kw.value.clone(),
            }),
            None => Err(ExtractError::expr(
                &kw.value,
                span,
                "`**` configuration cannot be read statically",
            )),
        })
        .collect()
}

/// The name at the head of a base class or annotation: `Generic` for
/// `Generic[T]`, `ClassVar` for `"ClassVar[int]"`.
fn head_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Subscript { value, .. } => value.dotted_name(),
        Expr::Constant(Value::Str(text)) => {
            let head = text.split('[').next().unwrap_or_default().trim();
            (!head.is_empty()).then(|| head.to_string())
        }
        other => other.dotted_name(),
    }
}

/// The `total=` class keyword of a TypedDict.
fn typed_dict_total(class: &ClassDef) -> Result<bool, ExtractError> {
    match class.keywords.iter().find(|kw| kw.arg.as_deref() == Some("total")) {
        None => Ok(true),
        Some(Keyword {
            value: Expr::Constant(Value::Bool(total)),
            ..
        }) => Ok(*total),
        Some(kw) => Err(ExtractError::expr(
            &kw.value,
            class.span,
            "total must be a literal boolean",
        )),
    }
}

/// A literal value, or a symbolic reference for a (dotted) name.
fn constant(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Constant(value) => Some(value.clone()),
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } => match constant(operand)? {
            Value::Int(n) => n.checked_neg().map(Value::Int),
            Value::Float(x) => Some(Value::Float(-x)),
            _ => None,
        },
        Expr::UnaryOp {
            op: UnaryOp::Pos,
            operand,
        } => match constant(operand)? {
            value @ (Value::Int(_) | Value::Float(_)) => Some(value),
            _ => None,
        },
        Expr::Name(_) | Expr::Attribute { .. } => expr.dotted_name().map(Value::Symbol),
        Expr::Tuple(items) => items.iter().map(constant).collect::<Option<_>>().map(Value::Tuple),
        Expr::List(items) => items.iter().map(constant).collect::<Option<_>>().map(Value::List),
        Expr::Set(items) => items.iter().map(constant).collect::<Option<_>>().map(Value::Set),
        Expr::Dict(pairs) => pairs
            .iter()
            .map(|(k, v)| Some((constant(k)?, constant(v)?)))
            .collect::<Option<_>>()
            .map(Value::Dict),
        _ => None,
    }
}

/// Reads the fields of one record.
struct FieldScanner<'a> {
    framework: Framework,
    record: &'a str,
    ns: &'a ninetales::Module,
    /// TypedDict totality; keys are optional unless marked `Required`.
    total: bool,
}

impl FieldScanner<'_> {
    /// One field definition; `None` for class-level attributes.
    fn field(
        &self,
        target: &Expr,
        annotation: Option<&Expr>,
        value: Option<&Expr>,
        span: Span,
    ) -> Result<Option<FieldDescriptor>, ExtractError> {
        let Expr::Name(name) = target else {
            return Err(ExtractError::expr(
                target,
                span,
                "field target must be a simple name",
            ));
        };
        let head = annotation.and_then(head_name);
        if head.as_deref().is_some_and(markers::is_non_field_annotation) {
            return Ok(None);
        }
        let mut annotation = annotation;
        if self.framework == Framework::TypedDict {
            let required = head.as_deref().is_some_and(markers::is_required);
            let not_required = head.as_deref().is_some_and(markers::is_not_required);
            if not_required || (!self.total && !required) {
                return Err(ninetales::Error::UnsupportedMember {
                    record: self.record.to_string(),
                    field: name.clone(),
                    reason: "key is not required".to_string(),
                }
                .into());
            }
            if let Some(value) = value {
                return Err(ExtractError::expr(
                    value,
                    span,
                    "TypedDict keys cannot have defaults",
                ));
            }
            if let Some(Expr::Subscript { slice, .. }) = annotation.filter(|_| required) {
                annotation = Some(slice.as_ref());
            }
        }

        if value.is_some_and(|value| self.excluded_from_init(value)) {
            return Err(ninetales::Error::UnsupportedMember {
                record: self.record.to_string(),
                field: name.clone(),
                reason: "field is excluded from __init__".to_string(),
            }
            .into());
        }

        let ty = annotation
            .map(|annotation| self.type_ref(name, annotation, span))
            .transpose()?;
        let native = match value {
            Some(value) => self.native_default(value, span)?,
            None => self.absent(),
        };
        if let (Framework::Dataclasses, NativeDefault::Value(default), Some(value)) =
            (self.framework, &native, value)
        {
            if default.is_mutable() {
                return Err(ExtractError::expr(
                    value,
                    span,
                    "dataclasses rejects mutable defaults; use default_factory",
                ));
            }
        }
        let default = sentinel::to_canonical(self.framework, self.record, name, &native)?;
        Ok(Some(FieldDescriptor::new(name, ty, default)))
    }

    fn absent(&self) -> NativeDefault {
        NativeDefault::Token(sentinel::absent_token(self.framework))
    }

    fn type_ref(&self, field: &str, expr: &Expr, span: Span) -> Result<TypeRef, ExtractError> {
        match expr {
            Expr::Constant(Value::None) => Ok(TypeRef::NoneType),
            Expr::Constant(Value::Str(reference)) => {
                self.ns.resolve(reference).map_err(|source| {
                    ExtractError::from(ninetales::Error::TypeResolution {
                        record: self.record.to_string(),
                        field: field.to_string(),
                        reference: reference.clone(),
                        source,
                    })
                })
            }
            Expr::Name(_) | Expr::Attribute { .. } => expr
                .dotted_name()
                .map(TypeRef::name)
                .ok_or_else(|| ExtractError::expr(expr, span, "not a type name")),
            Expr::Subscript { value, slice } => {
                let origin = value.dotted_name().ok_or_else(|| {
                    ExtractError::expr(value, span, "subscripted type must be a name")
                })?;
                let items = match slice.as_ref() {
                    Expr::Tuple(items) => items.as_slice(),
                    single => std::slice::from_ref(single),
                };
                if is_literal_origin(&origin) {
                    let values = items
                        .iter()
                        .map(|item| {
                            constant(item).ok_or_else(|| {
                                ExtractError::expr(item, span, "Literal arguments must be constants")
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    return Ok(TypeRef::Literal { origin, values });
                }
                let args = items
                    .iter()
                    .map(|item| self.type_ref(field, item, span))
                    .collect::<Result<_, _>>()?;
                Ok(TypeRef::Generic { origin, args })
            }
            Expr::BitOr { left, right } => {
                let mut members = Vec::new();
                for side in [left, right] {
                    match self.type_ref(field, side, span)? {
                        TypeRef::Union { members: inner } => members.extend(inner),
                        other => members.push(other),
                    }
                }
                Ok(TypeRef::Union { members })
            }
            other => Err(ExtractError::expr(other, span, "not a type expression")),
        }
    }

    fn native_default(&self, expr: &Expr, span: Span) -> Result<NativeDefault, ExtractError> {
        if let Expr::Call {
            func,
            args,
            keywords,
        } = expr
        {
            let callee = func.dotted_name().unwrap_or_default();
            if markers::is_field_specifier(self.framework, &callee) {
                return self.specifier(expr, args, keywords, span);
            }
            if self.framework == Framework::Attrs && markers::is_attrs_factory(&callee) {
                return self.attrs_factory(expr, args, keywords, span);
            }
        }
        self.literal_default(expr, span)
    }

    /// `field(init=False)` and the attrs equivalents.
    fn excluded_from_init(&self, expr: &Expr) -> bool {
        let Expr::Call { func, keywords, .. } = expr else {
            return false;
        };
        matches!(self.framework, Framework::Attrs | Framework::Dataclasses)
            && func
                .dotted_name()
                .is_some_and(|callee| markers::is_field_specifier(self.framework, &callee))
            && keywords.iter().any(|kw| {
                kw.arg.as_deref() == Some("init") && kw.value == Expr::Constant(Value::Bool(false))
            })
    }

    fn literal_default(&self, expr: &Expr, span: Span) -> Result<NativeDefault, ExtractError> {
        match constant(expr) {
            // `x: int = ...` and `Field(...)` mark a required pydantic field.
            Some(Value::Ellipsis) if self.framework == Framework::PydanticV2 => Ok(self.absent()),
            Some(value) => Ok(NativeDefault::Value(value)),
            None => Err(ExtractError::expr(
                expr,
                span,
                "default must be a constant or a simple name",
            )),
        }
    }

    /// `field(...)`, `attrs.field(...)`, `msgspec.field(...)`, `Field(...)`.
    fn specifier(
        &self,
        call: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        span: Span,
    ) -> Result<NativeDefault, ExtractError> {
        let mut default = match args {
            [] => None,
            [value] if self.framework == Framework::PydanticV2 => {
                Some(self.literal_default(value, span)?)
            }
            [_, extra, ..] | [extra] => {
                return Err(ExtractError::expr(extra, span, "unexpected positional argument"));
            }
        };
        for kw in keywords {
            let Some(arg) = kw.arg.as_deref() else {
                return Err(ExtractError::expr(
                    &kw.value,
                    span,
                    "`**` arguments cannot be read statically",
                ));
            };
            let native = match (arg, &kw.value) {
                (
                    "default",
                    factory @ Expr::Call {
                        func,
                        args,
                        keywords,
                    },
                ) if self.framework == Framework::Attrs
                    && func
                        .dotted_name()
                        .is_some_and(|name| markers::is_attrs_factory(&name)) =>
                {
                    self.attrs_factory(factory, args, keywords, span)?
                }
                ("default", value) => self.literal_default(value, span)?,
                ("default_factory", value) => self.factory(value, span)?,
                ("factory", value) if self.framework == Framework::Attrs => {
                    self.factory(value, span)?
                }
                _ => continue,
            };
            if default.replace(native).is_some() {
                return Err(ExtractError::expr(call, span, "default given more than once"));
            }
        }
        Ok(default.unwrap_or_else(|| self.absent()))
    }

    /// `attrs.Factory(list)`
    fn attrs_factory(
        &self,
        call: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        span: Span,
    ) -> Result<NativeDefault, ExtractError> {
        match (args, keywords) {
            ([factory], []) => self.factory(factory, span),
            _ => Err(ExtractError::expr(
                call,
                span,
                "expected `Factory(<callable>)`",
            )),
        }
    }

    fn factory(&self, expr: &Expr, span: Span) -> Result<NativeDefault, ExtractError> {
        expr.dotted_name()
            .map(|path| NativeDefault::Factory(Factory::new(path)))
            .ok_or_else(|| ExtractError::expr(expr, span, "factory must be a name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Module;
    use ninetales::FieldDefault;

    fn ann(target: &str, annotation: Expr, value: Option<Expr>) -> Stmt {
        Stmt::AnnAssign {
            target: Expr::name(target),
            annotation,
            value,
            span: Span::new(2, 4),
        }
    }

    fn class(name: &str, decorators: Vec<Expr>, bases: Vec<Expr>, body: Vec<Stmt>) -> Stmt {
        Stmt::ClassDef(ClassDef {
            name: name.into(),
            bases,
            keywords: vec![],
            decorators,
            body,
            span: Span::new(1, 0),
        })
    }

    fn keyword(arg: &str, value: Expr) -> Keyword {
        Keyword {
            arg: Some(arg.into()),
            value,
        }
    }

    #[test]
    fn test_bare_and_configured_decorators() {
        let module = Module::new(vec![
            class(
                "A",
                vec![Expr::name("dataclass")],
                vec![],
                vec![ann("x", Expr::name("int"), None)],
            ),
            class(
                "B",
                vec![Expr::call(
                    Expr::dotted("attrs.define"),
                    vec![],
                    vec![keyword("frozen", Expr::constant(true))],
                )],
                vec![],
                vec![ann("y", Expr::name("str"), Some(Expr::constant("s")))],
            ),
        ]);
        let records = scan_module(&module).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].framework, Framework::Dataclasses);
        assert_eq!(records[1].framework, Framework::Attrs);
        assert_eq!(records[1].config[0].name, "frozen");
        assert_eq!(
            records[1].schema.fields()[0].default(),
            &FieldDefault::Value(Value::str("s"))
        );
    }

    #[test]
    fn test_unrecognized_class_is_skipped() {
        let module = Module::new(vec![class(
            "Plain",
            vec![Expr::dotted("functools.total_ordering")],
            vec![Expr::name("Base")],
            vec![Stmt::Other {
                kind: "if_statement".into(),
                text: "if x: pass".into(),
                span: Span::new(2, 4),
            }],
        )]);
        assert!(scan_module(&module).unwrap().is_empty());
    }

    #[test]
    fn test_attribute_target_is_unsupported() {
        let module = Module::new(vec![class(
            "A",
            vec![Expr::name("dataclass")],
            vec![],
            vec![Stmt::AnnAssign {
                target: Expr::attribute(Expr::name("self"), "x"),
                annotation: Expr::name("int"),
                value: None,
                span: Span::new(2, 4),
            }],
        )]);
        let err = scan_module(&module).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnsupportedSyntax { ref node, ref rendered, .. }
                if node == "Attribute" && rendered == "self.x"
        ));
    }

    #[test]
    fn test_arbitrary_default_is_unsupported() {
        let module = Module::new(vec![class(
            "A",
            vec![Expr::name("dataclass")],
            vec![],
            vec![ann(
                "x",
                Expr::name("int"),
                Some(Expr::call(Expr::name("compute"), vec![], vec![])),
            )],
        )]);
        let err = scan_module(&module).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedSyntax { ref node, .. } if node == "Call"));
    }

    #[test]
    fn test_negative_constant_default() {
        let value = Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::constant(1)),
        };
        assert_eq!(constant(&value), Some(Value::Int(-1)));
    }

    #[test]
    fn test_classvar_is_not_a_field() {
        let module = Module::new(vec![class(
            "A",
            vec![Expr::name("dataclass")],
            vec![],
            vec![
                ann(
                    "count",
                    Expr::subscript(Expr::name("ClassVar"), Expr::name("int")),
                    Some(Expr::constant(0)),
                ),
                ann("x", Expr::name("int"), None),
            ],
        )]);
        let schemas = extract_from_module(&module).unwrap();
        assert_eq!(schemas[0].field_names(), ["x"]);
    }

    #[test]
    fn test_kw_only_marker_is_not_a_field() {
        let module = Module::new(vec![class(
            "A",
            vec![Expr::name("dataclass")],
            vec![],
            vec![
                ann("x", Expr::name("int"), None),
                ann("_", Expr::attribute(Expr::name("dataclasses"), "KW_ONLY"), None),
                ann("y", Expr::name("int"), Some(Expr::constant(0))),
            ],
        )]);
        let schemas = extract_from_module(&module).unwrap();
        assert_eq!(schemas[0].field_names(), ["x", "y"]);
    }
}
