use thiserror::Error;

use crate::parser::ParseError;
use crate::reflect::SourceUnavailable;

/// Every way a translation can fail. Translation is all-or-nothing: any of
/// these aborts the whole call without partial output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("'{kind}' nodes not implemented")]
    UnsupportedNodeKind { kind: &'static str },
    #[error("Unsupported {table} operator '{operator}'")]
    UnsupportedOperator {
        operator: String,
        table: &'static str,
    },
    #[error("Invalid {statement}: {reason}")]
    StructuralViolation {
        statement: &'static str,
        reason: &'static str,
    },
    #[error("Syntax tree nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
    #[error("Cannot translate object of type '{kind}'")]
    InputKind { kind: &'static str },
    #[error(transparent)]
    SourceUnavailable(#[from] SourceUnavailable),
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
