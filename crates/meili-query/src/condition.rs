//! Field conditions.
//!
//! The value attached to a field key in a filter document takes one of three
//! shapes, classified once when the document is parsed:
//!
//! | document value | condition |
//! |---|---|
//! | scalar or date | [`Condition::Equals`] |
//! | array | [`Condition::In`] |
//! | operator object | [`Condition::Operators`] |

use crate::comparison::Comparison;
use crate::error::Result;
use crate::op::Op;
use crate::value::Value;

/// A classified field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Bare scalar: shorthand for `$eq`.
    Equals(Comparison),
    /// Bare array: shorthand for `$in`.
    In(Comparison),
    /// Operator object, in insertion order. Absent entries are already dropped.
    Operators(Vec<Comparison>),
}

impl Condition {
    /// Classifies and validates a raw document value.
    pub fn parse(value: &Value) -> Result<Condition> {
        match value {
            Value::Array(_) => Comparison::new(Op::In, value).map(Condition::In),
            Value::Object(map) => map
                .present()
                .map(|(token, operand)| Comparison::new(Op::parse(token)?, operand))
                .collect::<Result<Vec<_>>>()
                .map(Condition::Operators),
            _ => Comparison::new(Op::Eq, value).map(Condition::Equals),
        }
    }

    /// Returns the comparisons this condition stands for.
    pub fn comparisons(&self) -> &[Comparison] {
        match self {
            Condition::Equals(cmp) | Condition::In(cmp) => std::slice::from_ref(cmp),
            Condition::Operators(cmps) => cmps,
        }
    }

    /// Renders the condition for `field`, joining comparisons with ` AND `.
    ///
    /// An operator object whose entries are all absent renders as an empty
    /// string.
    pub fn render(&self, field: &str) -> String {
        self.comparisons()
            .iter()
            .map(|cmp| cmp.render(field))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Compiles the condition attached to `field` in a filter document.
///
/// ```
/// use meili_query::{compile_selector, Map, Value};
///
/// let condition = Value::Object(Map::new().insert("$gte", 18).insert("$lt", 30));
/// assert_eq!(compile_selector("age", &condition).unwrap(), "age >= 18 AND age < 30");
/// ```
pub fn compile_selector(field: &str, condition: &Value) -> Result<String> {
    Condition::parse(condition).map(|condition| condition.render(field))
}
