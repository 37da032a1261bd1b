//! Static extraction of Python record definitions.
//!
//! `ninetales-syntax` reads record definitions straight from source text,
//! without importing or executing anything, and produces the same
//! [`RecordSchema`](ninetales::RecordSchema) the runtime adapters do.
//!
//! # Architecture
//!
//! ```text
//! Source            Syntax tree         Schemas
//! ──────────    ─────────────────    ──────────────────
//! .py text  ───>  ast::Module  ───>  Vec<RecordSchema>
//!  (input/)         (ast.rs)           (extract.rs)
//! ```
//!
//! Recognition is purely syntactic: a class is a record when it carries one
//! of the decorators or bases listed in [`markers`]. Anything inside a
//! record that cannot be read without evaluation is an
//! [`ExtractError::UnsupportedSyntax`], never a guess.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "read-python")]
//! # {
//! use ninetales::{ABSENT, FieldDefault, Value};
//!
//! let schemas = ninetales_syntax::extract_from_source(
//!     "import dataclasses\n\n@dataclasses.dataclass\nclass Point:\n    x: int\n    y: int = 0\n",
//! )
//! .unwrap();
//! let fields = schemas[0].fields();
//! assert_eq!(fields[0].default(), &ABSENT);
//! assert_eq!(fields[1].default(), &FieldDefault::Value(Value::Int(0)));
//! # }
//! ```

pub mod ast;
pub mod error;
pub mod extract;
pub mod input;
pub mod markers;

pub use ast::{Module, Span};
pub use error::ExtractError;
pub use extract::{ConfigOption, StaticRecord, extract_from_module, scan_module};

#[cfg(feature = "read-python")]
pub use input::read_python;

/// Parse Python source and extract every record definition in it.
#[cfg(feature = "read-python")]
pub fn extract_from_source(source: &str) -> Result<Vec<ninetales::RecordSchema>, ExtractError> {
    extract_from_module(&read_python(source)?)
}

/// Parse Python source and return every recognized record with its
/// framework, captured configuration and position.
#[cfg(feature = "read-python")]
pub fn scan_source(source: &str) -> Result<Vec<StaticRecord>, ExtractError> {
    scan_module(&read_python(source)?)
}
