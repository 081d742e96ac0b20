//! Error types for the meili-query crate.

use thiserror::Error;

use crate::op::Op;

/// Errors that can occur when compiling filter or sort documents.
///
/// Every error is raised before any output is returned, so a failed compile
/// never yields a partial expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The document (or a logical group) does not have the required shape.
    #[error("{0}")]
    InvalidDocument(String),

    /// Operator token outside the supported set.
    #[error("Unsupported operator: {op}")]
    UnsupportedOperator { op: String },

    /// Operand does not satisfy the operator's type requirement.
    #[error("{op} must be {expected}")]
    TypeMismatch { op: Op, expected: &'static str },

    /// `$between` operand has the wrong length or mismatched bound types.
    #[error("{0}")]
    InvalidRange(&'static str),

    /// Geo predicate or geo sort with a missing or mistyped field.
    #[error("{0}")]
    InvalidGeoArgument(String),

    /// Unrecognized sort direction.
    #[error("Invalid direction: {direction}")]
    InvalidDirection { direction: String },

    /// Builder call with neither the comparison nor the callback shape.
    #[error("Invalid arguments")]
    InvalidArguments,
}

impl QueryError {
    /// Creates an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Creates an invalid geo argument error.
    pub fn geo(msg: impl Into<String>) -> Self {
        Self::InvalidGeoArgument(msg.into())
    }

    pub(crate) fn type_mismatch(op: Op, expected: &'static str) -> Self {
        Self::TypeMismatch { op, expected }
    }
}

/// Result type for meili-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_violated_constraint() {
        let err = QueryError::UnsupportedOperator {
            op: "$unsupported".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported operator: $unsupported");

        let err = QueryError::type_mismatch(Op::Gt, "a number or a date");
        assert_eq!(err.to_string(), "$gt must be a number or a date");

        let err = QueryError::InvalidDirection {
            direction: "sideways".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid direction: sideways");

        assert_eq!(QueryError::InvalidArguments.to_string(), "Invalid arguments");
    }
}
