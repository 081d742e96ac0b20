//! Comparison operators for field conditions.
//!
//! The [`Op`] enum is the closed set of operators a field condition may use.
//! Each operator has two surface spellings: the `$`-prefixed token used in
//! filter documents and the bare word or symbol used by
//! [`FilterBuilder`](crate::FilterBuilder). Both parse to the same variant.

use std::str::FromStr;

use crate::error::QueryError;

/// Comparison operator for a field condition.
///
/// Operators are grouped by the operands they accept:
/// - **Universal**: `Eq`, `Ne` - any scalar, `null` becomes a null check
/// - **Ordering**: `Gt`, `Gte`, `Lt`, `Lte` - numbers or dates
/// - **Set**: `In`, `Nin` - arrays of scalars
/// - **Flags**: `Exists`, `Empty` - booleans
/// - **Range**: `Between` - two bounds of the same type
/// - **String**: `Contains`, `NotContains`, `StartsWith`, `NotStartsWith`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Universal operators
    /// Equal.
    Eq,
    /// Not equal.
    Ne,

    // Ordering operators
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    // Set operators
    /// Value is one of the given set.
    In,
    /// Value is none of the given set.
    Nin,

    // Flag operators
    /// Field exists (or not, when the operand is `false`).
    Exists,
    /// Field is empty (or not, when the operand is `false`).
    Empty,

    /// Inclusive range between two bounds.
    Between,

    // String operators
    /// String contains substring.
    Contains,
    /// String does not contain substring.
    NotContains,
    /// String starts with prefix.
    StartsWith,
    /// String does not start with prefix.
    NotStartsWith,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 15] = [
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::Nin,
        Op::Exists,
        Op::Empty,
        Op::Between,
        Op::Contains,
        Op::NotContains,
        Op::StartsWith,
        Op::NotStartsWith,
    ];

    /// Parses an operator token in either spelling.
    ///
    /// ```
    /// use meili_query::Op;
    ///
    /// assert_eq!(Op::parse("$gte").unwrap(), Op::Gte);
    /// assert_eq!(Op::parse(">=").unwrap(), Op::Gte);
    /// assert!(Op::parse("$regex").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Op, QueryError> {
        let op = match token {
            "$eq" | "=" => Op::Eq,
            "$ne" | "!=" => Op::Ne,
            "$gt" | ">" => Op::Gt,
            "$gte" | ">=" => Op::Gte,
            "$lt" | "<" => Op::Lt,
            "$lte" | "<=" => Op::Lte,
            "$in" | "in" => Op::In,
            "$nin" | "nin" => Op::Nin,
            "$exists" | "exists" => Op::Exists,
            "$empty" | "empty" => Op::Empty,
            "$between" | "between" => Op::Between,
            "$contains" | "contains" => Op::Contains,
            "$notContains" | "notContains" => Op::NotContains,
            "$startsWith" | "startsWith" => Op::StartsWith,
            "$notStartsWith" | "notStartsWith" => Op::NotStartsWith,
            other => {
                return Err(QueryError::UnsupportedOperator {
                    op: other.to_string(),
                })
            }
        };
        Ok(op)
    }

    /// Returns the document-grammar token (`$eq`, `$gt`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "$eq",
            Op::Ne => "$ne",
            Op::Gt => "$gt",
            Op::Gte => "$gte",
            Op::Lt => "$lt",
            Op::Lte => "$lte",
            Op::In => "$in",
            Op::Nin => "$nin",
            Op::Exists => "$exists",
            Op::Empty => "$empty",
            Op::Between => "$between",
            Op::Contains => "$contains",
            Op::NotContains => "$notContains",
            Op::StartsWith => "$startsWith",
            Op::NotStartsWith => "$notStartsWith",
        }
    }

    /// Returns the builder-grammar token (`=`, `>`, `in`, ...).
    pub fn builder_token(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            // The remaining tokens are the document tokens without the `$`.
            other => &other.as_str()[1..],
        }
    }
}

impl FromStr for Op {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::parse(s)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
