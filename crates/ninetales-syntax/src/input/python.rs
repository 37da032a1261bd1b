//! Tree-sitter based Python reader.

use crate::ast::{Alias, ClassDef, Expr, Keyword, Module, Span, Stmt, UnaryOp};
use crate::error::ExtractError;
use ninetales::Value;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source into the extractor's syntax tree.
pub fn read_python(source: &str) -> Result<Module, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ExtractError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_module(&tree)
}

fn missing(node: Node, field: &str) -> ExtractError {
    ExtractError::Parse(format!("{} missing {field}", node.kind()))
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn span(&self, node: Node) -> Span {
        let start = node.start_position();
        Span::new(start.row + 1, start.column)
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ExtractError> {
        node.child_by_field_name(name)
            .ok_or_else(|| missing(node, name))
    }

    /// Named children, without comments.
    fn children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    fn read_module(&self, tree: &Tree) -> Result<Module, ExtractError> {
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).map(|node| self.span(node)).unwrap_or_default();
            return Err(ExtractError::Parse(format!("syntax error at {at}")));
        }

        Ok(Module::new(self.read_block(root)?))
    }

    fn read_block(&self, node: Node) -> Result<Vec<Stmt>, ExtractError> {
        let mut stmts = Vec::new();
        for child in self.children(node) {
            stmts.push(self.read_stmt(child)?);
        }
        Ok(stmts)
    }

    fn read_stmt(&self, node: Node) -> Result<Stmt, ExtractError> {
        let span = self.span(node);
        let stmt = match node.kind() {
            "class_definition" => Stmt::ClassDef(self.read_class(node, Vec::new())?),
            "decorated_definition" => self.read_decorated(node)?,
            "function_definition" => Stmt::FunctionDef {
                name: self.node_text(self.field(node, "name")?).to_string(),
                span,
            },
            "expression_statement" => self.read_expression_statement(node)?,
            // Blocks hold these without an `expression_statement` wrapper.
            "assignment" => self.read_assignment(node, span)?,
            "string"
            | "concatenated_string"
            | "ellipsis"
            | "call"
            | "identifier"
            | "attribute"
            | "subscript"
            | "integer"
            | "float"
            | "true"
            | "false"
            | "none"
            | "binary_operator"
            | "unary_operator"
            | "parenthesized_expression"
            | "list"
            | "set"
            | "dictionary" => Stmt::Expr {
                value: self.read_expr(node)?,
                span,
            },
            "pass_statement" => Stmt::Pass { span },
            "import_statement" => Stmt::Import {
                names: self.read_aliases(node)?,
                span,
            },
            "import_from_statement" => Stmt::ImportFrom {
                module: self.node_text(self.field(node, "module_name")?).to_string(),
                names: self.read_aliases(node)?,
                span,
            },
            "future_import_statement" => Stmt::ImportFrom {
                module: "__future__".to_string(),
                names: self.read_aliases(node)?,
                span,
            },
            kind => Stmt::Other {
                kind: kind.to_string(),
                text: self.node_text(node).to_string(),
                span,
            },
        };
        Ok(stmt)
    }

    fn read_decorated(&self, node: Node) -> Result<Stmt, ExtractError> {
        let mut decorators = Vec::new();
        for child in self.children(node) {
            if child.kind() == "decorator" {
                let expr = self
                    .children(child)
                    .into_iter()
                    .next()
                    .ok_or_else(|| missing(child, "expression"))?;
                decorators.push(self.read_expr(expr)?);
            }
        }
        let definition = self.field(node, "definition")?;
        match definition.kind() {
            "class_definition" => {
                let mut class = self.read_class(definition, decorators)?;
                // The decorator line starts the statement.
                class.span = self.span(node);
                Ok(Stmt::ClassDef(class))
            }
            _ => self.read_stmt(definition),
        }
    }

    fn read_class(&self, node: Node, decorators: Vec<Expr>) -> Result<ClassDef, ExtractError> {
        let name = self.node_text(self.field(node, "name")?).to_string();
        let (bases, keywords) = match node.child_by_field_name("superclasses") {
            Some(list) => self.read_arguments(list)?,
            None => (Vec::new(), Vec::new()),
        };
        let body = self.read_block(self.field(node, "body")?)?;
        Ok(ClassDef {
            name,
            bases,
            keywords,
            decorators,
            body,
            span: self.span(node),
        })
    }

    fn read_expression_statement(&self, node: Node) -> Result<Stmt, ExtractError> {
        let span = self.span(node);
        let children = self.children(node);
        // `a, b` as a statement
        if children.len() > 1 {
            let items = children
                .into_iter()
                .map(|child| self.read_expr(child))
                .collect::<Result<_, _>>()?;
            return Ok(Stmt::Expr {
                value: Expr::Tuple(items),
                span,
            });
        }
        let child = children
            .into_iter()
            .next()
            .ok_or_else(|| missing(node, "expression"))?;
        match child.kind() {
            "assignment" => self.read_assignment(child, span),
            "augmented_assignment" | "yield" => Ok(Stmt::Other {
                kind: child.kind().to_string(),
                text: self.node_text(child).to_string(),
                span,
            }),
            _ => Ok(Stmt::Expr {
                value: self.read_expr(child)?,
                span,
            }),
        }
    }

    /// `x: T`, `x: T = v`, `x = v`, `a = b = v`.
    fn read_assignment(&self, node: Node, span: Span) -> Result<Stmt, ExtractError> {
        let target = self.read_expr(self.field(node, "left")?)?;
        let right = node.child_by_field_name("right");

        if let Some(annotation) = node.child_by_field_name("type") {
            let value = right.map(|value| self.read_expr(value)).transpose()?;
            return Ok(Stmt::AnnAssign {
                target,
                annotation: self.read_expr(annotation)?,
                value,
                span,
            });
        }

        let mut targets = vec![target];
        let mut value = right.ok_or_else(|| missing(node, "right"))?;
        while value.kind() == "assignment" {
            if value.child_by_field_name("type").is_some() {
                return Ok(Stmt::Other {
                    kind: "assignment".to_string(),
                    text: self.node_text(node).to_string(),
                    span,
                });
            }
            targets.push(self.read_expr(self.field(value, "left")?)?);
            value = self.field(value, "right")?;
        }
        Ok(Stmt::Assign {
            targets,
            value: self.read_expr(value)?,
            span,
        })
    }

    fn read_aliases(&self, node: Node) -> Result<Vec<Alias>, ExtractError> {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        let mut aliases = Vec::new();
        for name in names {
            aliases.push(match name.kind() {
                "aliased_import" => Alias {
                    name: self.node_text(self.field(name, "name")?).to_string(),
                    asname: Some(self.node_text(self.field(name, "alias")?).to_string()),
                },
                _ => Alias {
                    name: self.node_text(name).to_string(),
                    asname: None,
                },
            });
        }
        if self
            .children(node)
            .iter()
            .any(|child| child.kind() == "wildcard_import")
        {
            aliases.push(Alias {
                name: "*".to_string(),
                asname: None,
            });
        }
        Ok(aliases)
    }

    /// Positional and keyword arguments of a call or class header.
    fn read_arguments(&self, node: Node) -> Result<(Vec<Expr>, Vec<Keyword>), ExtractError> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for child in self.children(node) {
            match child.kind() {
                "keyword_argument" => keywords.push(Keyword {
                    arg: Some(self.node_text(self.field(child, "name")?).to_string()),
                    value: self.read_expr(self.field(child, "value")?)?,
                }),
                "dictionary_splat" => {
                    let value = self
                        .children(child)
                        .into_iter()
                        .next()
                        .ok_or_else(|| missing(child, "expression"))?;
                    keywords.push(Keyword {
                        arg: None,
                        value: self.read_expr(value)?,
                    });
                }
                _ => args.push(self.read_expr(child)?),
            }
        }
        Ok((args, keywords))
    }

    fn read_items(&self, node: Node) -> Result<Vec<Expr>, ExtractError> {
        self.children(node)
            .into_iter()
            .map(|child| self.read_expr(child))
            .collect()
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ExtractError> {
        match node.kind() {
            "identifier" => Ok(Expr::name(self.node_text(node))),

            "attribute" | "member_type" => {
                let object = node
                    .child_by_field_name("object")
                    .or_else(|| node.named_child(0))
                    .ok_or_else(|| missing(node, "object"))?;
                let attr = node
                    .child_by_field_name("attribute")
                    .or_else(|| node.named_child(1))
                    .ok_or_else(|| missing(node, "attribute"))?;
                Ok(Expr::attribute(self.read_expr(object)?, self.node_text(attr)))
            }

            "call" => {
                let func = self.read_expr(self.field(node, "function")?)?;
                let arguments = self.field(node, "arguments")?;
                if arguments.kind() != "argument_list" {
                    return Ok(self.other(node));
                }
                let (args, keywords) = self.read_arguments(arguments)?;
                Ok(Expr::call(func, args, keywords))
            }

            "subscript" => {
                let value = self.read_expr(self.field(node, "value")?)?;
                let mut cursor = node.walk();
                let indices: Vec<Node> =
                    node.children_by_field_name("subscript", &mut cursor).collect();
                let mut slice = indices
                    .into_iter()
                    .map(|index| self.read_expr(index))
                    .collect::<Result<Vec<_>, _>>()?;
                let slice = match slice.len() {
                    1 => slice.remove(0),
                    _ => Expr::Tuple(slice),
                };
                Ok(Expr::subscript(value, slice))
            }

            // Annotation positions wrap their expression in `type`.
            "type" => match self.children(node).as_slice() {
                [inner] => self.read_expr(*inner),
                _ => Ok(self.other(node)),
            },

            "generic_type" => {
                let children = self.children(node);
                let (Some(head), Some(params)) = (children.first(), children.get(1)) else {
                    return Ok(self.other(node));
                };
                let mut args = self.read_items(*params)?;
                let slice = match args.len() {
                    1 => args.remove(0),
                    _ => Expr::Tuple(args),
                };
                Ok(Expr::subscript(self.read_expr(*head)?, slice))
            }

            "union_type" => match self.children(node).as_slice() {
                [left, right] => Ok(Expr::bit_or(
                    self.read_expr(*left)?,
                    self.read_expr(*right)?,
                )),
                _ => Ok(self.other(node)),
            },

            "binary_operator" => {
                let operator = self.field(node, "operator")?;
                if self.node_text(operator) != "|" {
                    return Ok(self.other(node));
                }
                Ok(Expr::bit_or(
                    self.read_expr(self.field(node, "left")?)?,
                    self.read_expr(self.field(node, "right")?)?,
                ))
            }

            "unary_operator" => {
                let op = match self.node_text(self.field(node, "operator")?) {
                    "-" => UnaryOp::Neg,
                    "+" => UnaryOp::Pos,
                    "~" => UnaryOp::Invert,
                    _ => return Ok(self.other(node)),
                };
                let operand = self.read_expr(self.field(node, "argument")?)?;
                Ok(Expr::UnaryOp {
                    op,
                    operand: Box::new(operand),
                })
            }

            "not_operator" => {
                let operand = self.read_expr(self.field(node, "argument")?)?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }

            "parenthesized_expression" => match self.children(node).as_slice() {
                [inner] => self.read_expr(*inner),
                _ => Ok(self.other(node)),
            },

            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                Ok(Expr::Tuple(self.read_items(node)?))
            }
            "list" | "list_pattern" => Ok(Expr::List(self.read_items(node)?)),
            "set" => Ok(Expr::Set(self.read_items(node)?)),
            "dictionary" => {
                let mut pairs = Vec::new();
                for pair in self.children(node) {
                    if pair.kind() != "pair" {
                        return Ok(self.other(node));
                    }
                    pairs.push((
                        self.read_expr(self.field(pair, "key")?)?,
                        self.read_expr(self.field(pair, "value")?)?,
                    ));
                }
                Ok(Expr::Dict(pairs))
            }

            "true" => Ok(Expr::constant(true)),
            "false" => Ok(Expr::constant(false)),
            "none" => Ok(Expr::Constant(Value::None)),
            "ellipsis" => Ok(Expr::Constant(Value::Ellipsis)),

            "integer" => Ok(parse_int(self.node_text(node))
                .map(Expr::Constant)
                .unwrap_or_else(|| self.other(node))),
            "float" => Ok(parse_float(self.node_text(node))
                .map(Expr::Constant)
                .unwrap_or_else(|| self.other(node))),
            "string" => Ok(parse_string(self.node_text(node))
                .map(Expr::Constant)
                .unwrap_or_else(|| self.other(node))),
            "concatenated_string" => {
                let parts = self
                    .children(node)
                    .into_iter()
                    .map(|part| parse_string(self.node_text(part)))
                    .collect::<Option<Vec<_>>>();
                Ok(parts
                    .and_then(concat_strings)
                    .map(Expr::Constant)
                    .unwrap_or_else(|| self.other(node)))
            }

            _ => Ok(self.other(node)),
        }
    }

    fn other(&self, node: Node) -> Expr {
        Expr::Other {
            kind: node.kind().to_string(),
            text: self.node_text(node).to_string(),
        }
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn parse_int(text: &str) -> Option<Value> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let parsed = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else {
        digits.parse()
    };
    parsed.ok().map(Value::Int)
}

/// Complex literals (`1j`) are not constants the IR can hold.
fn parse_float(text: &str) -> Option<Value> {
    if text.ends_with(['j', 'J']) {
        return None;
    }
    text.replace('_', "").parse().ok().map(Value::Float)
}

/// Decode one string or bytes literal; f-strings yield `None`.
fn parse_string(text: &str) -> Option<Value> {
    let quote_at = text.find(['\'', '"'])?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains(['f', 't']) {
        return None;
    }
    let quoted = &text[quote_at..];
    let delimiter = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        &quoted[..1]
    };
    let body = quoted
        .strip_prefix(delimiter)?
        .strip_suffix(delimiter)?;

    let raw = prefix.contains('r');
    let bytes = prefix.contains('b');
    let units = if raw {
        body.chars().map(u32::from).collect()
    } else {
        unescape(body, bytes)?
    };

    if bytes {
        units
            .into_iter()
            .map(|unit| u8::try_from(unit).ok())
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes)
    } else {
        units
            .into_iter()
            .map(char::from_u32)
            .collect::<Option<String>>()
            .map(Value::Str)
    }
}

/// Backslash escapes as code points (or byte values).
fn unescape(body: &str, bytes: bool) -> Option<Vec<u32>> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(u32::from(c));
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(u32::from(escaped)),
            'n' => out.push(0x0a),
            't' => out.push(0x09),
            'r' => out.push(0x0d),
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'v' => out.push(0x0b),
            '0'..='7' => {
                let mut digits = String::from(escaped);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                out.push(u32::from_str_radix(&digits, 8).ok()?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' if !bytes => out.push(hex_escape(&mut chars, 4)?),
            'U' if !bytes => out.push(hex_escape(&mut chars, 8)?),
            // `\N{...}` needs the Unicode name table.
            'N' if !bytes => return None,
            other => {
                out.push(u32::from('\\'));
                out.push(u32::from(other));
            }
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut impl Iterator<Item = char>, width: usize) -> Option<u32> {
    let digits: String = chars.take(width).collect();
    if digits.len() != width {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}

/// Adjacent literals concatenate; mixing bytes and text is a syntax error.
fn concat_strings(parts: Vec<Value>) -> Option<Value> {
    let mut parts = parts.into_iter();
    let mut acc = parts.next()?;
    for part in parts {
        acc = match (acc, part) {
            (Value::Str(mut a), Value::Str(b)) => {
                a.push_str(&b);
                Value::Str(a)
            }
            (Value::Bytes(mut a), Value::Bytes(b)) => {
                a.extend(b);
                Value::Bytes(a)
            }
            _ => return None,
        };
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotated_assignment() {
        let module = read_python("x: int = 42").unwrap();
        assert_eq!(module.body.len(), 1);
        match &module.body[0] {
            Stmt::AnnAssign {
                target,
                annotation,
                value,
                span,
            } => {
                assert_eq!(target, &Expr::name("x"));
                assert_eq!(annotation, &Expr::name("int"));
                assert_eq!(value, &Some(Expr::constant(42)));
                assert_eq!(*span, Span::new(1, 0));
            }
            other => panic!("expected AnnAssign, got {other:?}"),
        }
    }

    #[test]
    fn test_decorated_class() {
        let source = "\
import dataclasses

@dataclasses.dataclass(frozen=True)
class Point(Base, metaclass=Meta):
    \"\"\"A point.\"\"\"
    x: int
    y: int = 0

    def norm(self):
        return 0
";
        let module = read_python(source).unwrap();
        assert!(matches!(&module.body[0], Stmt::Import { names, .. } if names[0].name == "dataclasses"));
        let Stmt::ClassDef(class) = &module.body[1] else {
            panic!("expected ClassDef");
        };
        assert_eq!(class.name, "Point");
        assert_eq!(class.span, Span::new(3, 0));
        assert_eq!(
            class.decorators[0].to_string(),
            "dataclasses.dataclass(frozen=True)"
        );
        assert_eq!(class.bases, vec![Expr::name("Base")]);
        assert_eq!(class.keywords[0].arg.as_deref(), Some("metaclass"));
        let kinds: Vec<&str> = class.body.iter().map(Stmt::kind).collect();
        assert_eq!(kinds, ["Expr", "AnnAssign", "AnnAssign", "FunctionDef"]);
    }

    #[test]
    fn test_class_body_statements() {
        let source = "class A:\n    \"doc\"\n    x: int\n    y = 1\n    ...\n";
        let module = read_python(source).unwrap();
        let Stmt::ClassDef(class) = &module.body[0] else {
            panic!("expected ClassDef");
        };
        assert!(matches!(
            &class.body[0],
            Stmt::Expr { value: Expr::Constant(Value::Str(doc)), .. } if doc == "doc"
        ));
        let Stmt::AnnAssign {
            target,
            annotation,
            value,
            span,
        } = &class.body[1]
        else {
            panic!("expected AnnAssign");
        };
        assert_eq!(*target, Expr::name("x"));
        assert_eq!(*annotation, Expr::name("int"));
        assert_eq!(*value, None);
        assert_eq!(*span, Span::new(3, 4));
        assert!(matches!(&class.body[2], Stmt::Assign { .. }));
        assert!(matches!(
            &class.body[3],
            Stmt::Expr { value: Expr::Constant(Value::Ellipsis), .. }
        ));
    }

    #[test]
    fn test_type_expressions() {
        let module = read_python("x: dict[str, list[int]] | None = None").unwrap();
        let Stmt::AnnAssign { annotation, .. } = &module.body[0] else {
            panic!("expected AnnAssign");
        };
        assert_eq!(annotation.to_string(), "dict[str, list[int]] | None");
    }

    #[test]
    fn test_chained_assignment() {
        let module = read_python("a = b = 1").unwrap();
        assert!(matches!(
            &module.body[0],
            Stmt::Assign { targets, value, .. }
                if targets.len() == 2 && value == &Expr::constant(1)
        ));
    }

    #[test]
    fn test_imports() {
        let module = read_python("import a.b as c\nfrom m import x, y as z\nfrom n import *").unwrap();
        let Stmt::Import { names, .. } = &module.body[0] else {
            panic!("expected Import");
        };
        assert_eq!(names[0].bound_name(), "c");
        let Stmt::ImportFrom { module: from, names, .. } = &module.body[1] else {
            panic!("expected ImportFrom");
        };
        assert_eq!(from, "m");
        let bound: Vec<&str> = names.iter().map(Alias::bound_name).collect();
        assert_eq!(bound, ["x", "z"]);
        assert!(matches!(&module.body[2], Stmt::ImportFrom { names, .. } if names[0].name == "*"));
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_int("1_000"), Some(Value::Int(1000)));
        assert_eq!(parse_int("0xff"), Some(Value::Int(255)));
        assert_eq!(parse_int("99999999999999999999"), None);
        assert_eq!(parse_float("2.5"), Some(Value::Float(2.5)));
        assert_eq!(parse_float("2j"), None);
        assert_eq!(parse_string("'a\\tb'"), Some(Value::str("a\tb")));
        assert_eq!(parse_string("r'a\\tb'"), Some(Value::str("a\\tb")));
        assert_eq!(parse_string("\"\"\"doc\"\"\""), Some(Value::str("doc")));
        assert_eq!(parse_string("b'\\x00a'"), Some(Value::Bytes(vec![0, b'a'])));
        assert_eq!(parse_string("f'{x}'"), None);
    }

    #[test]
    fn test_negative_default_and_containers() {
        let module = read_python("x = (-1, [2], {'k': 3}, {4})").unwrap();
        let Stmt::Assign { value, .. } = &module.body[0] else {
            panic!("expected Assign");
        };
        assert_eq!(value.to_string(), "(-1, [2], {'k': 3}, {4})");
    }

    #[test]
    fn test_unknown_statement_kept_as_other() {
        let module = read_python("if x:\n    pass").unwrap();
        assert!(matches!(
            &module.body[0],
            Stmt::Other { kind, .. } if kind == "if_statement"
        ));
    }

    #[test]
    fn test_syntax_error() {
        let err = read_python("class :\n").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
