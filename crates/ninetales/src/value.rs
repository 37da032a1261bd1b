//! Literal default values.
//!
//! A [`Value`] is the by-value payload of a field default. It covers the
//! Python literals a record field can carry plus symbolic references to
//! named module-level objects (enum members, constants).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// A literal default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// `None` used as a real default.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// `...`
    Ellipsis,
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
    /// Reference to a named object, e.g. `Color.RED` or `DEFAULT_PORT`.
    Symbol(String),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn symbol(path: impl Into<String>) -> Self {
        Value::Symbol(path.into())
    }

    /// Whether instances share state when used as a class-level default.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Value::List(_) | Value::Dict(_) | Value::Set(_))
    }

    /// Whether this is an empty container.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                items.is_empty()
            }
            Value::Dict(pairs) => pairs.is_empty(),
            _ => false,
        }
    }

    /// Render as a Python expression.
    pub fn to_python(&self) -> String {
        self.to_string()
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    // Python's repr prefers single quotes unless the string contains one.
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.is_nan() => f.write_str("float('nan')"),
            Value::Float(x) if x.is_infinite() => {
                if *x > 0.0 {
                    f.write_str("float('inf')")
                } else {
                    f.write_str("-float('inf')")
                }
            }
            Value::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write_str_literal(f, s),
            Value::Bytes(bytes) => {
                f.write_str("b'")?;
                for &b in bytes {
                    match b {
                        b'\\' => f.write_str("\\\\")?,
                        b'\'' => f.write_str("\\'")?,
                        b'\n' => f.write_str("\\n")?,
                        0x20..=0x7e => f.write_char(b as char)?,
                        _ => write!(f, "\\x{b:02x}")?,
                    }
                }
                f.write_char('\'')
            }
            Value::Ellipsis => f.write_str("..."),
            Value::Tuple(items) => {
                f.write_char('(')?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Value::List(items) => {
                f.write_char('[')?;
                write_seq(f, items)?;
                f.write_char(']')
            }
            Value::Dict(pairs) => {
                f.write_char('{')?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_char('}')
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_char('{')?;
                write_seq(f, items)?;
                f.write_char('}')
            }
            Value::FrozenSet(items) if items.is_empty() => f.write_str("frozenset()"),
            Value::FrozenSet(items) => {
                f.write_str("frozenset({")?;
                write_seq(f, items)?;
                f.write_str("})")
            }
            Value::Symbol(path) => f.write_str(path),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_rendering() {
        assert_eq!(Value::None.to_python(), "None");
        assert_eq!(Value::Bool(true).to_python(), "True");
        assert_eq!(Value::Int(-3).to_python(), "-3");
        assert_eq!(Value::Float(5.0).to_python(), "5.0");
        assert_eq!(Value::Float(0.25).to_python(), "0.25");
        assert_eq!(Value::str("it's").to_python(), "\"it's\"");
        assert_eq!(Value::str("a\nb").to_python(), "'a\\nb'");
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_python(), "(1,)");
        assert_eq!(Value::Set(vec![]).to_python(), "set()");
        assert_eq!(
            Value::Dict(vec![(Value::str("k"), Value::List(vec![]))]).to_python(),
            "{'k': []}"
        );
        assert_eq!(Value::Bytes(b"a\x00".to_vec()).to_python(), "b'a\\x00'");
        assert_eq!(Value::symbol("Color.RED").to_python(), "Color.RED");
    }

    #[test]
    fn test_mutability() {
        assert!(Value::List(vec![]).is_mutable());
        assert!(Value::Dict(vec![]).is_mutable());
        assert!(!Value::Tuple(vec![]).is_mutable());
        assert!(!Value::FrozenSet(vec![]).is_mutable());
        assert!(!Value::None.is_mutable());
    }

    #[test]
    fn test_empty_container() {
        assert!(Value::List(vec![]).is_empty_container());
        assert!(!Value::List(vec![Value::Int(1)]).is_empty_container());
        assert!(!Value::Str(String::new()).is_empty_container());
    }
}
