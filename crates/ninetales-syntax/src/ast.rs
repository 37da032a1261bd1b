//! Python syntax tree consumed by the static extractor.
//!
//! Only the shapes that can occur in record definitions are modelled
//! precisely. Everything else lowers to an `Other` node that keeps the
//! original source text, so it can still be reported.

use ninetales::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a statement: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One source unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    ClassDef(ClassDef),
    FunctionDef {
        name: String,
        span: Span,
    },
    /// `target: annotation` or `target: annotation = value`
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
        span: Span,
    },
    /// `a = b = value`
    Assign {
        targets: Vec<Expr>,
        value: Expr,
        span: Span,
    },
    Expr {
        value: Expr,
        span: Span,
    },
    Pass {
        span: Span,
    },
    Import {
        names: Vec<Alias>,
        span: Span,
    },
    ImportFrom {
        module: String,
        names: Vec<Alias>,
        span: Span,
    },
    Other {
        kind: String,
        text: String,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::ClassDef(class) => class.span,
            Stmt::FunctionDef { span, .. }
            | Stmt::AnnAssign { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Expr { span, .. }
            | Stmt::Pass { span }
            | Stmt::Import { span, .. }
            | Stmt::ImportFrom { span, .. }
            | Stmt::Other { span, .. } => *span,
        }
    }

    /// Node kind name used in diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            Stmt::ClassDef(_) => "ClassDef",
            Stmt::FunctionDef { .. } => "FunctionDef",
            Stmt::AnnAssign { .. } => "AnnAssign",
            Stmt::Assign { .. } => "Assign",
            Stmt::Expr { .. } => "Expr",
            Stmt::Pass { .. } => "Pass",
            Stmt::Import { .. } => "Import",
            Stmt::ImportFrom { .. } => "ImportFrom",
            Stmt::Other { kind, .. } => kind,
        }
    }
}

/// `name` or `name as asname` in an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

impl Alias {
    /// The name the import binds in the importing module.
    pub fn bound_name(&self) -> &str {
        self.asname.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub decorators: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `arg=value` in a call or class header; `arg` is `None` for `**value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    Invert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    /// A literal scalar: `None`, booleans, numbers, strings, bytes, `...`.
    Constant(Value),
    /// `value[slice]`; several indices arrive as a `Tuple` slice.
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Set(Vec<Expr>),
    /// `left | right`
    BitOr {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Other {
        kind: String,
        text: String,
    },
}

impl Expr {
    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name(id.into())
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            keywords,
        }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn subscript(value: Expr, slice: Expr) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
        }
    }

    pub fn bit_or(left: Expr, right: Expr) -> Self {
        Expr::BitOr {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Parse `a.b.c` into nested attribute accesses.
    pub fn dotted(path: &str) -> Self {
        let mut parts = path.split('.');
        let head = Expr::name(parts.next().unwrap_or_default());
        parts.fold(head, |value, attr| Expr::attribute(value, attr))
    }

    /// `a.b.c` for a name or a chain of attribute accesses on a name.
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Expr::Name(id) => Some(id.clone()),
            Expr::Attribute { value, attr } => {
                value.dotted_name().map(|head| format!("{head}.{attr}"))
            }
            _ => None,
        }
    }

    /// Node kind name used in diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            Expr::Name(_) => "Name",
            Expr::Attribute { .. } => "Attribute",
            Expr::Call { .. } => "Call",
            Expr::Constant(_) => "Constant",
            Expr::Subscript { .. } => "Subscript",
            Expr::Tuple(_) => "Tuple",
            Expr::List(_) => "List",
            Expr::Dict(_) => "Dict",
            Expr::Set(_) => "Set",
            Expr::BitOr { .. } => "BinOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::Other { kind, .. } => kind,
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{arg}={}", self.value),
            None => write!(f, "**{}", self.value),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(id) => f.write_str(id),
            Expr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{func}(")?;
                join(f, args)?;
                for (i, kw) in keywords.iter().enumerate() {
                    if i > 0 || !args.is_empty() {
                        f.write_str(", ")?;
                    }
                    write!(f, "{kw}")?;
                }
                f.write_str(")")
            }
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Subscript { value, slice } => match slice.as_ref() {
                Expr::Tuple(items) if !items.is_empty() => {
                    write!(f, "{value}[")?;
                    join(f, items)?;
                    f.write_str("]")
                }
                slice => write!(f, "{value}[{slice}]"),
            },
            Expr::Tuple(items) => {
                f.write_str("(")?;
                join(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Expr::List(items) => {
                f.write_str("[")?;
                join(f, items)?;
                f.write_str("]")
            }
            Expr::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Expr::Set(items) => {
                f.write_str("{")?;
                join(f, items)?;
                f.write_str("}")
            }
            Expr::BitOr { left, right } => write!(f, "{left} | {right}"),
            Expr::UnaryOp { op, operand } => match op {
                UnaryOp::Neg => write!(f, "-{operand}"),
                UnaryOp::Pos => write!(f, "+{operand}"),
                UnaryOp::Not => write!(f, "not {operand}"),
                UnaryOp::Invert => write!(f, "~{operand}"),
            },
            Expr::Other { text, .. } => f.write_str(text),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::ClassDef(class) => {
                write!(f, "class {}", class.name)?;
                if !class.bases.is_empty() || !class.keywords.is_empty() {
                    f.write_str("(")?;
                    join(f, &class.bases)?;
                    for (i, kw) in class.keywords.iter().enumerate() {
                        if i > 0 || !class.bases.is_empty() {
                            f.write_str(", ")?;
                        }
                        write!(f, "{kw}")?;
                    }
                    f.write_str(")")?;
                }
                f.write_str(": ...")
            }
            Stmt::FunctionDef { name, .. } => write!(f, "def {name}(...): ..."),
            Stmt::AnnAssign {
                target,
                annotation,
                value,
                ..
            } => match value {
                Some(value) => write!(f, "{target}: {annotation} = {value}"),
                None => write!(f, "{target}: {annotation}"),
            },
            Stmt::Assign { targets, value, .. } => {
                for target in targets {
                    write!(f, "{target} = ")?;
                }
                write!(f, "{value}")
            }
            Stmt::Expr { value, .. } => write!(f, "{value}"),
            Stmt::Pass { .. } => f.write_str("pass"),
            Stmt::Import { names, .. } => {
                f.write_str("import ")?;
                write_aliases(f, names)
            }
            Stmt::ImportFrom { module, names, .. } => {
                write!(f, "from {module} import ")?;
                write_aliases(f, names)
            }
            Stmt::Other { text, .. } => f.write_str(text),
        }
    }
}

fn write_aliases(f: &mut fmt::Formatter<'_>, names: &[Alias]) -> fmt::Result {
    for (i, alias) in names.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&alias.name)?;
        if let Some(asname) = &alias.asname {
            write!(f, " as {asname}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_round_trip() {
        let expr = Expr::dotted("attrs.define");
        assert_eq!(expr.dotted_name().as_deref(), Some("attrs.define"));
        assert_eq!(expr.to_string(), "attrs.define");
    }

    #[test]
    fn test_render_call_and_subscript() {
        let call = Expr::call(
            Expr::dotted("dataclasses.field"),
            vec![],
            vec![Keyword {
                arg: Some("default_factory".into()),
                value: Expr::name("list"),
            }],
        );
        assert_eq!(call.to_string(), "dataclasses.field(default_factory=list)");

        let ann = Expr::subscript(
            Expr::name("dict"),
            Expr::Tuple(vec![Expr::name("str"), Expr::name("int")]),
        );
        assert_eq!(ann.to_string(), "dict[str, int]");
        assert_eq!(
            Expr::bit_or(Expr::name("int"), Expr::Constant(Value::None)).to_string(),
            "int | None"
        );
    }

    #[test]
    fn test_render_stmt() {
        let stmt = Stmt::AnnAssign {
            target: Expr::attribute(Expr::name("self"), "x"),
            annotation: Expr::name("int"),
            value: Some(Expr::constant(-1)),
            span: Span::new(3, 4),
        };
        assert_eq!(stmt.to_string(), "self.x: int = -1");
        assert_eq!(stmt.kind(), "AnnAssign");
        assert_eq!(stmt.span().to_string(), "3:4");
    }
}
