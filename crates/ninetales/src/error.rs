//! Errors raised by extraction and materialization.

use crate::traits::Framework;
use crate::types::ResolveError;
use crate::value::Value;

/// Error raised by an adapter. Nothing is registered when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source field's metadata cannot be reduced to name/type/default.
    #[error("{record}.{field}: unsupported member: {reason}")]
    UnsupportedMember {
        record: String,
        field: String,
        reason: String,
    },

    /// A forward reference could not be resolved in the defining module.
    #[error("{record}.{field}: cannot resolve type `{reference}`: {source}")]
    TypeResolution {
        record: String,
        field: String,
        reference: String,
        #[source]
        source: ResolveError,
    },

    /// A required field follows a defaulted one and the target only
    /// constructs positionally.
    #[error(
        "{record}: required field `{field}` follows defaulted field `{after}` and {framework} construction is positional"
    )]
    FieldOrder {
        record: String,
        field: String,
        after: String,
        framework: Framework,
    },

    /// A default value has no representation in the target framework.
    #[error("{record}.{field}: default `{value}` cannot be represented in {framework}: {reason}")]
    UnsupportedDefault {
        record: String,
        field: String,
        framework: Framework,
        value: Value,
        reason: String,
    },

    #[error("{record}: duplicate field `{field}`")]
    DuplicateField { record: String, field: String },

    #[error("expected a {expected} record, got {found} record `{record}`")]
    FrameworkMismatch {
        expected: Framework,
        found: Framework,
        record: String,
    },
}

impl Error {
    pub(crate) fn unsupported_member(
        record: &str,
        field: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::UnsupportedMember {
            record: record.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_default(
        record: &str,
        field: &str,
        framework: Framework,
        value: &Value,
        reason: impl Into<String>,
    ) -> Self {
        Error::UnsupportedDefault {
            record: record.to_string(),
            field: field.to_string(),
            framework,
            value: value.clone(),
            reason: reason.into(),
        }
    }
}
