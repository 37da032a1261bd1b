//! Python source emission for native records.
//!
//! Adapters describe a class (header, decorators, body lines) and the
//! [`PythonWriter`] lays it out with imports and indentation.

use crate::sentinel::NativeDefault;
use crate::types::{Annotation, TypeRef};
use crate::value::Value;
use std::collections::BTreeSet;

/// Annotation used for fields without a declared type.
const ANY: &str = "typing.Any";

/// Emits a Python module defining one record class.
pub struct PythonWriter {
    imports: BTreeSet<String>,
    body: String,
    indent: usize,
}

impl Default for PythonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonWriter {
    pub fn new() -> Self {
        Self {
            imports: BTreeSet::new(),
            body: String::new(),
            indent: 0,
        }
    }

    /// Require `import <module>` at the top of the output.
    pub fn import(&mut self, module: &str) {
        self.imports.insert(module.to_string());
    }

    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.body.push_str("    ");
        }
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Write a class header and an indented body.
    ///
    /// An empty body is written as `pass`.
    pub fn class(&mut self, decorators: &[String], header: &str, body: &[String]) {
        for decorator in decorators {
            self.line(&format!("@{decorator}"));
        }
        self.line(&format!("{header}:"));
        self.indent += 1;
        if body.is_empty() {
            self.line("pass");
        }
        for line in body {
            self.line(line);
        }
        self.indent -= 1;
    }

    /// Render an annotation, recording any modules it references.
    pub fn annotation(&mut self, ty: Option<&TypeRef>) -> String {
        match ty {
            Some(ty) => {
                collect_modules(ty, &mut self.imports);
                ty.to_string()
            }
            None => {
                self.import("typing");
                ANY.to_string()
            }
        }
    }

    /// Render a stored annotation; forward references stay quoted.
    pub fn stored_annotation(&mut self, annotation: &Annotation) -> String {
        match annotation {
            Annotation::Resolved(ty) => self.annotation(Some(ty)),
            Annotation::Forward(reference) => Value::str(reference.as_str()).to_python(),
        }
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        for module in &self.imports {
            out.push_str("import ");
            out.push_str(module);
            out.push('\n');
        }
        if !self.imports.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&self.body);
        out
    }
}

/// `name=value` pairs joined for a call or class keyword list.
pub fn keywords(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// How a field's default is spelled in source.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExpr {
    Value(String),
    Factory(String),
}

impl DefaultExpr {
    pub fn from_native(default: &NativeDefault) -> Option<Self> {
        match default {
            NativeDefault::Token(_) => None,
            NativeDefault::Value(value) => Some(DefaultExpr::Value(value.to_python())),
            NativeDefault::Factory(factory) => Some(DefaultExpr::Factory(factory.to_string())),
        }
    }
}

/// One annotated class-body line.
///
/// Plain defaults are assigned directly; factories and extra arguments go
/// through the framework's field specifier (`dataclasses.field`, ...).
pub fn field_line(
    name: &str,
    ty: &str,
    default: Option<DefaultExpr>,
    specifier: &str,
    mut args: Vec<(&str, String)>,
) -> String {
    match default {
        Some(DefaultExpr::Value(value)) if args.is_empty() => {
            return format!("{name}: {ty} = {value}");
        }
        Some(DefaultExpr::Value(value)) => args.push(("default", value)),
        Some(DefaultExpr::Factory(factory)) => args.push(("default_factory", factory)),
        None => {}
    }
    if args.is_empty() {
        format!("{name}: {ty}")
    } else {
        format!("{name}: {ty} = {specifier}({})", keywords(&args))
    }
}

/// Record the top-level module of every dotted name in `ty`.
fn collect_modules(ty: &TypeRef, out: &mut BTreeSet<String>) {
    if let Some((module, _)) = ty.head().and_then(|h| h.split_once('.')) {
        out.insert(module.to_string());
    }
    match ty {
        TypeRef::Generic { args, .. } => args.iter().for_each(|a| collect_modules(a, out)),
        TypeRef::Union { members } => members.iter().for_each(|m| collect_modules(m, out)),
        TypeRef::Name { .. } | TypeRef::NoneType | TypeRef::Literal { .. } => {}
    }
}
