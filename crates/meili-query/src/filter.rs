//! Filter document compiler.
//!
//! A filter document is an object or an array of objects. Object entries are
//! dispatched by key:
//!
//! | key | meaning |
//! |---|---|
//! | `$or` | array of sub-documents, joined with ` OR ` and parenthesized |
//! | `$and` | array of sub-documents, joined with ` AND ` |
//! | `$geoRadius` | [`GeoRadius`] |
//! | `$geoRoundingBox` / `$geoBoundingBox` | [`GeoBoundingBox`] |
//! | anything else | field name with a [`Condition`] |
//!
//! All fragments of one level are joined with ` AND `, in document order.
//! A group with no members, or an operator object whose entries are all
//! absent, produces no output at all: an empty `$or` is dropped rather than
//! rendered as `()`.
//! `$and` groups are never parenthesized: inside an `$or` they rely on the
//! enclosing parentheses, since `AND` binds tighter than `OR`.

use std::fmt;

use tracing::{debug, trace};

use crate::condition::Condition;
use crate::error::{QueryError, Result};
use crate::geo::{GeoBoundingBox, GeoRadius};
use crate::value::Value;

/// Logical OR group key.
pub const OR_KEY: &str = "$or";
/// Logical AND group key.
pub const AND_KEY: &str = "$and";
/// Bounding box key, as spelled in the document grammar.
pub const GEO_BOUNDING_BOX_KEY: &str = "$geoRoundingBox";
/// Bounding box key, alternate spelling.
pub const GEO_BOUNDING_BOX_ALIAS: &str = "$geoBoundingBox";

pub(crate) const AND: &str = " AND ";
pub(crate) const OR: &str = " OR ";

/// A parsed filter document.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Array document: every member must match.
    All(Vec<Filter>),
    /// Object document: clauses in insertion order, implicitly AND-ed.
    Clauses(Vec<Clause>),
}

/// One entry of an object document.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `$or` group.
    Or(Vec<Filter>),
    /// `$and` group.
    And(Vec<Filter>),
    /// `$geoRadius` predicate.
    GeoRadius(GeoRadius),
    /// Bounding box predicate.
    GeoBoundingBox(GeoBoundingBox),
    /// Field condition.
    Field { field: String, condition: Condition },
}

impl Filter {
    /// Parses and validates a filter document.
    ///
    /// Absent entries are skipped. Nothing is rendered until the whole tree
    /// has been validated.
    pub fn parse(document: &Value) -> Result<Filter> {
        match document {
            Value::Array(members) => members
                .iter()
                .map(Filter::parse)
                .collect::<Result<Vec<_>>>()
                .map(Filter::All),
            Value::Object(map) => map
                .present()
                .map(|(key, value)| Clause::parse(key, value))
                .collect::<Result<Vec<_>>>()
                .map(Filter::Clauses),
            _ => Err(QueryError::invalid_document("Expected an object")),
        }
    }

    /// Renders the filter expression.
    pub fn render(&self) -> String {
        match self {
            Filter::All(members) => join(members.iter().map(Filter::render), AND),
            Filter::Clauses(clauses) => join(clauses.iter().map(Clause::render), AND),
        }
    }
}

impl Clause {
    /// Parses one document entry.
    pub fn parse(key: &str, value: &Value) -> Result<Clause> {
        match key {
            OR_KEY => group(key, value).map(Clause::Or),
            AND_KEY => group(key, value).map(Clause::And),
            GeoRadius::KEY => GeoRadius::from_value(value).map(Clause::GeoRadius),
            GEO_BOUNDING_BOX_KEY | GEO_BOUNDING_BOX_ALIAS => {
                GeoBoundingBox::from_value(value).map(Clause::GeoBoundingBox)
            }
            field => Condition::parse(value).map(|condition| Clause::Field {
                field: field.to_string(),
                condition,
            }),
        }
    }

    /// Renders this clause.
    pub fn render(&self) -> String {
        let out = match self {
            Clause::Or(members) => {
                let inner = join(members.iter().map(Filter::render), OR);
                if inner.is_empty() {
                    inner
                } else {
                    format!("({inner})")
                }
            }
            Clause::And(members) => join(members.iter().map(Filter::render), AND),
            Clause::GeoRadius(radius) => radius.to_string(),
            Clause::GeoBoundingBox(bbox) => bbox.to_string(),
            Clause::Field { field, condition } => condition.render(field),
        };
        trace!(clause = %out, "rendered clause");
        out
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Compiles a filter document into a filter expression.
///
/// # Example
///
/// ```
/// use meili_query::{compile_filter, Value};
/// use serde_json::json;
///
/// let doc = Value::from_json(json!({
///     "$or": [{ "name": "John" }, { "name": "Doe" }],
///     "age": { "$gte": 18 },
/// }))
/// .unwrap();
///
/// assert_eq!(
///     compile_filter(&doc).unwrap(),
///     r#"(name = "John" OR name = "Doe") AND age >= 18"#
/// );
/// ```
pub fn compile_filter(document: &Value) -> Result<String> {
    debug!(shape = document.type_name(), "compiling filter");
    let filter = Filter::parse(document)?;
    let out = filter.render();
    debug!(len = out.len(), "compiled filter");
    Ok(out)
}

fn group(key: &str, value: &Value) -> Result<Vec<Filter>> {
    value
        .as_array()
        .ok_or_else(|| QueryError::invalid_document(format!("{key} must be an array")))?
        .iter()
        .map(Filter::parse)
        .collect()
}

/// Joins non-empty fragments. Empty fragments come from groups or operator
/// objects whose entries were all absent.
pub(crate) fn join<S: AsRef<str>>(fragments: impl IntoIterator<Item = S>, sep: &str) -> String {
    let mut out = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(sep);
        }
        out.push_str(fragment);
    }
    out
}
