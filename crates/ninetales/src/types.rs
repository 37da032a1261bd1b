//! Type references and forward-reference resolution.
//!
//! The engine never interprets a field's type; it only carries a [`TypeRef`]
//! from the source framework to the target. Frameworks that store lazy
//! annotations (strings, `ForwardRef`) hand us an [`Annotation::Forward`],
//! which must be resolved against the defining [`Module`] before the type can
//! enter the IR.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Builtin names every module can see without importing.
const BUILTINS: &[&str] = &[
    "bool",
    "bytearray",
    "bytes",
    "complex",
    "dict",
    "float",
    "frozenset",
    "int",
    "list",
    "object",
    "set",
    "str",
    "tuple",
    "type",
];

/// A resolved reference to a field's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A plain or dotted name: `int`, `datetime.date`.
    Name { path: String },
    /// A subscripted generic: `list[int]`, `typing.Optional[str]`.
    Generic { origin: String, args: Vec<TypeRef> },
    /// `A | B`
    Union { members: Vec<TypeRef> },
    /// `None` in annotation position.
    NoneType,
    /// `Literal["a", 1]`; arguments are values, not types.
    Literal { origin: String, values: Vec<Value> },
}

impl TypeRef {
    pub fn name(path: impl Into<String>) -> Self {
        TypeRef::Name { path: path.into() }
    }

    pub fn generic(origin: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            origin: origin.into(),
            args,
        }
    }

    pub fn union(members: Vec<TypeRef>) -> Self {
        TypeRef::Union { members }
    }

    /// Shorthand for the common `X | None`.
    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Union {
            members: vec![inner, TypeRef::NoneType],
        }
    }

    /// The name at the head of this reference, if any.
    pub fn head(&self) -> Option<&str> {
        match self {
            TypeRef::Name { path } => Some(path),
            TypeRef::Generic { origin, .. } | TypeRef::Literal { origin, .. } => Some(origin),
            TypeRef::Union { .. } | TypeRef::NoneType => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Name { path } => f.write_str(path),
            TypeRef::Generic { origin, args } => {
                write!(f, "{origin}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
            TypeRef::Union { members } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            TypeRef::NoneType => f.write_str("None"),
            TypeRef::Literal { origin, values } => {
                write!(f, "{origin}[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A type as a framework stores it: either eager or a lazy string.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Resolved(TypeRef),
    Forward(String),
}

impl Annotation {
    pub fn forward(reference: impl Into<String>) -> Self {
        Annotation::Forward(reference.into())
    }
}

impl From<TypeRef> for Annotation {
    fn from(ty: TypeRef) -> Self {
        Annotation::Resolved(ty)
    }
}

/// Failure to turn a forward reference into a [`TypeRef`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("name `{name}` is not defined in module `{module}`")]
    Undefined { module: String, name: String },

    #[error("malformed type expression at offset {offset}: {message}")]
    Malformed { offset: usize, message: String },

    #[error("`{name}` is bound to `{bound}`, which cannot be subscripted")]
    NotGeneric { name: String, bound: String },
}

/// The namespace of a defining module.
///
/// Bindings map simple names to the types they denote; imports record module
/// names (or aliases) under which dotted references are accepted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    bindings: IndexMap<String, TypeRef>,
    imports: BTreeSet<String>,
}

impl Module {
    /// A module with only the builtins in scope.
    pub fn new(name: impl Into<String>) -> Self {
        let bindings = BUILTINS
            .iter()
            .map(|b| (b.to_string(), TypeRef::name(*b)))
            .collect();
        Self {
            name: name.into(),
            bindings,
            imports: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind `name` to a type, shadowing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, ty: TypeRef) -> &mut Self {
        self.bindings.insert(name.into(), ty);
        self
    }

    /// Bind `name` to itself (a class defined or imported under that name).
    pub fn define(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.bindings.insert(name.clone(), TypeRef::name(name));
        self
    }

    /// Make a module name (or alias) available for dotted references.
    pub fn import(&mut self, module: impl Into<String>) -> &mut Self {
        self.imports.insert(module.into());
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeRef> {
        self.bindings.get(name)
    }

    pub fn is_imported(&self, module: &str) -> bool {
        self.imports.contains(module)
    }

    /// Resolve an annotation into a concrete type reference.
    pub fn resolve_annotation(&self, annotation: &Annotation) -> Result<TypeRef, ResolveError> {
        match annotation {
            Annotation::Resolved(ty) => Ok(ty.clone()),
            Annotation::Forward(reference) => self.resolve(reference),
        }
    }

    /// Parse a forward reference and bind every name in it.
    pub fn resolve(&self, reference: &str) -> Result<TypeRef, ResolveError> {
        let parsed = TypeExprParser::new(reference).parse()?;
        self.bind_names(parsed)
    }

    fn bind_names(&self, ty: TypeRef) -> Result<TypeRef, ResolveError> {
        match ty {
            TypeRef::Name { path } => self.resolve_path(&path),
            TypeRef::Generic { origin, args } => {
                let origin = match self.resolve_path(&origin)? {
                    TypeRef::Name { path } => path,
                    other => {
                        return Err(ResolveError::NotGeneric {
                            name: origin,
                            bound: other.to_string(),
                        });
                    }
                };
                let args = args
                    .into_iter()
                    .map(|arg| self.bind_names(arg))
                    .collect::<Result<_, _>>()?;
                Ok(TypeRef::Generic { origin, args })
            }
            TypeRef::Union { members } => {
                let members = members
                    .into_iter()
                    .map(|m| self.bind_names(m))
                    .collect::<Result<_, _>>()?;
                Ok(TypeRef::Union { members })
            }
            TypeRef::Literal { origin, values } => match self.resolve_path(&origin)? {
                TypeRef::Name { path } => Ok(TypeRef::Literal {
                    origin: path,
                    values,
                }),
                other => Err(ResolveError::NotGeneric {
                    name: origin,
                    bound: other.to_string(),
                }),
            },
            TypeRef::NoneType => Ok(TypeRef::NoneType),
        }
    }

    fn resolve_path(&self, path: &str) -> Result<TypeRef, ResolveError> {
        match path.split_once('.') {
            None => self.lookup(path).cloned().ok_or_else(|| ResolveError::Undefined {
                module: self.name.clone(),
                name: path.to_string(),
            }),
            Some((head, _)) if self.is_imported(head) || self.bindings.contains_key(head) => {
                Ok(TypeRef::name(path))
            }
            Some((head, _)) => Err(ResolveError::Undefined {
                module: self.name.clone(),
                name: head.to_string(),
            }),
        }
    }
}

/// Whether a subscript origin takes literal values rather than types.
pub fn is_literal_origin(origin: &str) -> bool {
    origin == "Literal" || origin.ends_with(".Literal")
}

/// Recursive-descent parser for the annotation subset found in forward
/// references: dotted names, subscripts, `|` unions, `None`, and literal
/// arguments to `Literal[...]`.
struct TypeExprParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> TypeExprParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> Result<TypeRef, ResolveError> {
        let ty = self.union()?;
        self.skip_ws();
        if self.pos < self.src.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    fn error(&self, message: &str) -> ResolveError {
        ResolveError::Malformed {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn union(&mut self) -> Result<TypeRef, ResolveError> {
        let mut members = vec![self.primary()?];
        while self.eat('|') {
            members.push(self.primary()?);
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeRef::Union { members }
        })
    }

    fn primary(&mut self) -> Result<TypeRef, ResolveError> {
        self.skip_ws();
        let path = self.dotted()?;
        if path == "None" {
            return Ok(TypeRef::NoneType);
        }
        if !self.eat('[') {
            return Ok(TypeRef::Name { path });
        }
        if is_literal_origin(&path) {
            let mut values = vec![self.literal()?];
            while self.eat(',') && !self.at_close() {
                values.push(self.literal()?);
            }
            self.expect_close()?;
            return Ok(TypeRef::Literal {
                origin: path,
                values,
            });
        }
        let mut args = vec![self.union()?];
        while self.eat(',') && !self.at_close() {
            args.push(self.union()?);
        }
        self.expect_close()?;
        Ok(TypeRef::Generic { origin: path, args })
    }

    /// Whether the next token closes a subscript (allows a trailing comma).
    fn at_close(&mut self) -> bool {
        self.skip_ws();
        self.rest().starts_with(']')
    }

    fn expect_close(&mut self) -> Result<(), ResolveError> {
        if self.eat(']') {
            Ok(())
        } else {
            Err(self.error("expected `]`"))
        }
    }

    fn dotted(&mut self) -> Result<String, ResolveError> {
        let start = self.pos;
        let mut expect_ident = true;
        for (i, c) in self.rest().char_indices() {
            let ok = if expect_ident {
                c.is_alphabetic() || c == '_' || (i > 0 && c.is_alphanumeric())
            } else {
                c.is_alphanumeric() || c == '_' || c == '.'
            };
            if !ok {
                break;
            }
            expect_ident = c == '.';
            self.pos = start + i + c.len_utf8();
        }
        let path = &self.src[start..self.pos];
        if path.is_empty() || path.ends_with('.') || path.contains("..") {
            self.pos = start;
            return Err(self.error("expected a name"));
        }
        Ok(path.to_string())
    }

    fn literal(&mut self) -> Result<Value, ResolveError> {
        self.skip_ws();
        let rest = self.rest();
        if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') {
            let body = &rest[1..];
            let end = body
                .find(quote)
                .ok_or_else(|| self.error("unterminated string"))?;
            self.pos += end + 2;
            return Ok(Value::Str(body[..end].to_string()));
        }
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '.' || c == '_'))
            .unwrap_or(rest.len());
        let token = &rest[..len];
        let value = match token {
            "True" => Value::Bool(true),
            "False" => Value::Bool(false),
            "None" => Value::None,
            _ => match token.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) if !token.is_empty() => Value::Symbol(token.to_string()),
                Err(_) => return Err(self.error("expected a literal")),
            },
        };
        self.pos += len;
        Ok(value)
    }
}
