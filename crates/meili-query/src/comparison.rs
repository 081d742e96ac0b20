//! Comparison predicates.
//!
//! A [`Comparison`] is an operator paired with an operand that has already
//! passed the operator's type checks. A [`Predicate`] attaches it to a field
//! and renders the atomic filter expression.

use std::fmt;

use crate::error::{QueryError, Result};
use crate::literal::{write_list, Literal};
use crate::op::Op;
use crate::value::Value;

const BETWEEN_LEN: &str = "$between must have two elements";
const BETWEEN_TYPES: &str = "$between must be an array of numbers, dates or strings";

/// A validated operator and operand.
///
/// # Example
///
/// ```
/// use meili_query::{Comparison, Op, Value};
///
/// let cmp = Comparison::new(Op::Gt, &Value::from(18)).unwrap();
/// assert_eq!(cmp.render("age"), "age > 18");
///
/// assert!(Comparison::new(Op::Gt, &Value::from("18")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `field = v`, or `field IS NULL`.
    Eq(Literal),
    /// `field != v`, or `field IS NOT NULL`.
    Ne(Literal),
    /// `field > v`.
    Gt(Literal),
    /// `field >= v`.
    Gte(Literal),
    /// `field < v`.
    Lt(Literal),
    /// `field <= v`.
    Lte(Literal),
    /// `field IN [..]`.
    In(Vec<Literal>),
    /// `field NOT IN [..]`.
    Nin(Vec<Literal>),
    /// `field EXISTS` / `field NOT EXISTS`.
    Exists(bool),
    /// `field IS EMPTY` / `field IS NOT EMPTY`.
    Empty(bool),
    /// `field lo TO hi`.
    Between(Literal, Literal),
    /// `field CONTAINS "v"`.
    Contains(String),
    /// `field NOT CONTAINS "v"`.
    NotContains(String),
    /// `field STARTS WITH "v"`.
    StartsWith(String),
    /// `field NOT STARTS WITH "v"`.
    NotStartsWith(String),
}

impl Comparison {
    /// Validates `value` against the requirements of `op`.
    pub fn new(op: Op, value: &Value) -> Result<Comparison> {
        let cmp = match op {
            Op::Eq => Comparison::Eq(scalar(op, value)?),
            Op::Ne => Comparison::Ne(scalar(op, value)?),
            Op::Gt => Comparison::Gt(ordered(op, value)?),
            Op::Gte => Comparison::Gte(ordered(op, value)?),
            Op::Lt => Comparison::Lt(ordered(op, value)?),
            Op::Lte => Comparison::Lte(ordered(op, value)?),
            Op::In => Comparison::In(list(op, value)?),
            Op::Nin => Comparison::Nin(list(op, value)?),
            Op::Exists => Comparison::Exists(flag(op, value)?),
            Op::Empty => Comparison::Empty(flag(op, value)?),
            Op::Between => {
                let (lo, hi) = range(value)?;
                Comparison::Between(lo, hi)
            }
            Op::Contains => Comparison::Contains(text(op, value)?),
            Op::NotContains => Comparison::NotContains(text(op, value)?),
            Op::StartsWith => Comparison::StartsWith(text(op, value)?),
            Op::NotStartsWith => Comparison::NotStartsWith(text(op, value)?),
        };
        Ok(cmp)
    }

    /// Returns the operator of this comparison.
    pub fn op(&self) -> Op {
        match self {
            Comparison::Eq(_) => Op::Eq,
            Comparison::Ne(_) => Op::Ne,
            Comparison::Gt(_) => Op::Gt,
            Comparison::Gte(_) => Op::Gte,
            Comparison::Lt(_) => Op::Lt,
            Comparison::Lte(_) => Op::Lte,
            Comparison::In(_) => Op::In,
            Comparison::Nin(_) => Op::Nin,
            Comparison::Exists(_) => Op::Exists,
            Comparison::Empty(_) => Op::Empty,
            Comparison::Between(_, _) => Op::Between,
            Comparison::Contains(_) => Op::Contains,
            Comparison::NotContains(_) => Op::NotContains,
            Comparison::StartsWith(_) => Op::StartsWith,
            Comparison::NotStartsWith(_) => Op::NotStartsWith,
        }
    }

    /// Writes the predicate for `field`. The field name is emitted verbatim.
    pub fn write_to(&self, field: &str, f: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Comparison::Eq(v) if v.is_null() => write!(f, "{field} IS NULL"),
            Comparison::Eq(v) => write!(f, "{field} = {v}"),
            Comparison::Ne(v) if v.is_null() => write!(f, "{field} IS NOT NULL"),
            Comparison::Ne(v) => write!(f, "{field} != {v}"),
            Comparison::Gt(v) => write!(f, "{field} > {v}"),
            Comparison::Gte(v) => write!(f, "{field} >= {v}"),
            Comparison::Lt(v) => write!(f, "{field} < {v}"),
            Comparison::Lte(v) => write!(f, "{field} <= {v}"),
            Comparison::In(items) => {
                write!(f, "{field} IN ")?;
                write_list(f, items)
            }
            Comparison::Nin(items) => {
                write!(f, "{field} NOT IN ")?;
                write_list(f, items)
            }
            Comparison::Exists(true) => write!(f, "{field} EXISTS"),
            Comparison::Exists(false) => write!(f, "{field} NOT EXISTS"),
            Comparison::Empty(true) => write!(f, "{field} IS EMPTY"),
            Comparison::Empty(false) => write!(f, "{field} IS NOT EMPTY"),
            Comparison::Between(lo, hi) => write!(f, "{field} {lo} TO {hi}"),
            Comparison::Contains(s) => write!(f, "{field} CONTAINS {}", quoted(s)),
            Comparison::NotContains(s) => write!(f, "{field} NOT CONTAINS {}", quoted(s)),
            Comparison::StartsWith(s) => write!(f, "{field} STARTS WITH {}", quoted(s)),
            Comparison::NotStartsWith(s) => {
                write!(f, "{field} NOT STARTS WITH {}", quoted(s))
            }
        }
    }

    /// Renders the predicate for `field` into a new string.
    pub fn render(&self, field: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(field, &mut out);
        out
    }
}

/// A field name paired with a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// The field name, emitted verbatim.
    pub field: String,
    /// The comparison applied to the field.
    pub comparison: Comparison,
}

impl Predicate {
    /// Creates a predicate from an operator token in either spelling.
    pub fn new(field: impl Into<String>, op: &str, value: &Value) -> Result<Self> {
        let op = Op::parse(op)?;
        Ok(Predicate {
            field: field.into(),
            comparison: Comparison::new(op, value)?,
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.comparison.write_to(&self.field, f)
    }
}

/// Compiles one atomic predicate from a field, an operator token and an operand.
///
/// ```
/// use meili_query::{compile_comparison, Value};
///
/// let out = compile_comparison("name", "in", &Value::from(vec!["John", "Doe"])).unwrap();
/// assert_eq!(out, r#"name IN ["John", "Doe"]"#);
/// ```
pub fn compile_comparison(field: &str, op: &str, value: &Value) -> Result<String> {
    Predicate::new(field, op, value).map(|predicate| predicate.to_string())
}

fn quoted(s: &str) -> Literal {
    Literal::String(s.to_string())
}

fn scalar(op: Op, value: &Value) -> Result<Literal> {
    Literal::from_value(value).ok_or_else(|| QueryError::type_mismatch(op, "a scalar value"))
}

fn ordered(op: Op, value: &Value) -> Result<Literal> {
    match value {
        Value::Number(_) | Value::Date(_) => scalar(op, value),
        _ => Err(QueryError::type_mismatch(op, "a number or a date")),
    }
}

fn list(op: Op, value: &Value) -> Result<Vec<Literal>> {
    let items = value
        .as_array()
        .ok_or_else(|| QueryError::type_mismatch(op, "an array"))?;
    items
        .iter()
        .map(|item| {
            Literal::from_value(item)
                .ok_or_else(|| QueryError::type_mismatch(op, "an array of scalar values"))
        })
        .collect()
}

fn flag(op: Op, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| QueryError::type_mismatch(op, "a boolean"))
}

fn text(op: Op, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| QueryError::type_mismatch(op, "a string"))
}

fn range(value: &Value) -> Result<(Literal, Literal)> {
    let bounds = value
        .as_array()
        .ok_or_else(|| QueryError::type_mismatch(Op::Between, "an array"))?;
    let [lo, hi] = bounds else {
        return Err(QueryError::InvalidRange(BETWEEN_LEN));
    };
    match (lo, hi) {
        (Value::Number(_), Value::Number(_))
        | (Value::Date(_), Value::Date(_))
        | (Value::String(_), Value::String(_)) => Ok((scalar(Op::Between, lo)?, scalar(Op::Between, hi)?)),
        _ => Err(QueryError::InvalidRange(BETWEEN_TYPES)),
    }
}
