//! Literal serialization.
//!
//! A [`Literal`] is a scalar operand ready to be written into a filter
//! expression.

use std::fmt;

use crate::value::{Number, Timestamp, Value};

/// Scalar operand of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null, only rendered inside `IN` lists; equality turns it into a null check.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// String literal, rendered double-quoted and JSON-escaped.
    String(String),
    /// Date literal, rendered as epoch milliseconds.
    Date(Timestamp),
}

impl Literal {
    /// Converts a scalar value. Returns `None` for arrays and objects.
    pub fn from_value(value: &Value) -> Option<Literal> {
        let literal = match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => Literal::Number(*n),
            Value::String(s) => Literal::String(s.clone()),
            Value::Date(ts) => Literal::Date(*ts),
            Value::Array(_) | Value::Object(_) => return None,
        };
        Some(literal)
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Literal::Date(ts) => write!(f, "{}", ts.as_millis()),
        }
    }
}

/// Writes `items` as a bracketed, comma-separated list: `[a, b, c]`.
pub(crate) fn write_list(f: &mut impl fmt::Write, items: &[Literal]) -> fmt::Result {
    f.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(']')
}
