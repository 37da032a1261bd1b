//! Static extraction errors.

use crate::ast::{Expr, Span, Stmt};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A construct outside the recognized subset.
    #[error("{span}: unsupported {node} `{rendered}`: {reason}")]
    UnsupportedSyntax {
        /// Kind of the offending node (`AnnAssign`, `Call`, ...).
        node: String,
        /// The node rendered back to source.
        rendered: String,
        span: Span,
        reason: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Engine(#[from] ninetales::Error),
}

impl ExtractError {
    pub(crate) fn stmt(stmt: &Stmt, reason: impl Into<String>) -> Self {
        ExtractError::UnsupportedSyntax {
            node: stmt.kind().to_string(),
            rendered: stmt.to_string(),
            span: stmt.span(),
            reason: reason.into(),
        }
    }

    pub(crate) fn expr(expr: &Expr, span: Span, reason: impl Into<String>) -> Self {
        ExtractError::UnsupportedSyntax {
            node: expr.kind().to_string(),
            rendered: expr.to_string(),
            span,
            reason: reason.into(),
        }
    }
}
