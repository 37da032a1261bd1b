//! Input readers: parse source text into the syntax tree.

#[cfg(feature = "read-python")]
pub mod python;

#[cfg(feature = "read-python")]
pub use python::read_python;
