//! Sort document compiler.
//!
//! A sort document maps field names to directions:
//!
//! ```text
//! { "name": 1, "age": "desc", "$geoPoint": { "lat": 48.8, "lng": 2.3 } }
//!   -> ["name:asc", "age:desc", "_geoPoint(48.8, 2.3):asc"]
//! ```
//!
//! Directions are `1`, `-1`, `asc`, `desc`, `ascending` or `descending`,
//! matched case-insensitively. Output order follows the document.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::geo::GeoPoint;
use crate::value::{Number, Value};

/// Reserved sort key for sorting by distance to a point.
pub const GEO_POINT_KEY: &str = "$geoPoint";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Normalizes a direction token.
    ///
    /// The value is stringified first, so `1`, `1.0` and `"1"` are all
    /// ascending.
    pub fn parse(value: &Value) -> Result<Dir> {
        let token = direction_text(value);
        match token.to_lowercase().as_str() {
            "1" | "asc" | "ascending" => Ok(Dir::Asc),
            "-1" | "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(QueryError::InvalidDirection { direction: token }),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.dir)
    }
}

/// One entry of a sort document.
#[derive(Debug, Clone, PartialEq)]
pub enum SortTerm {
    /// `field:dir`.
    Field(OrderBy),
    /// `_geoPoint(lat, lng):dir`.
    GeoPoint { point: GeoPoint, dir: Dir },
}

impl fmt::Display for SortTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortTerm::Field(order) => write!(f, "{order}"),
            SortTerm::GeoPoint { point, dir } => write!(
                f,
                "_geoPoint({}, {}):{dir}",
                Number::F64(point.lat),
                Number::F64(point.lng)
            ),
        }
    }
}

/// An ordered list of sort terms.
///
/// # Example
///
/// ```
/// use meili_query::{GeoPoint, Sort};
///
/// let sort = Sort::new()
///     .asc("name")
///     .desc("age")
///     .geo_point(GeoPoint::new(48.8, 2.3), Default::default());
///
/// assert_eq!(sort.to_tokens(), ["name:asc", "age:desc", "_geoPoint(48.8, 2.3):asc"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort {
    terms: Vec<SortTerm>,
}

impl Sort {
    /// Creates an empty sort.
    pub fn new() -> Self {
        Sort::default()
    }

    /// Parses a sort document. `Null` yields an empty sort.
    pub fn parse(document: &Value) -> Result<Sort> {
        let map = match document {
            Value::Null => return Ok(Sort::new()),
            Value::Object(map) => map,
            _ => return Err(QueryError::invalid_document("Expected an object")),
        };

        let terms = map
            .present()
            .map(|(key, value)| match key {
                GEO_POINT_KEY => geo_term(value),
                field => Dir::parse(value).map(|dir| SortTerm::Field(OrderBy::new(field, dir))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Sort { terms })
    }

    /// Adds an ordering clause.
    pub fn order_by(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.terms.push(SortTerm::Field(OrderBy::new(field, dir)));
        self
    }

    /// Adds an ascending ordering clause.
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Adds a descending ordering clause.
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Adds a distance-to-point ordering clause.
    pub fn geo_point(mut self, point: impl Into<GeoPoint>, dir: Dir) -> Self {
        self.terms.push(SortTerm::GeoPoint {
            point: point.into(),
            dir,
        });
        self
    }

    /// Returns the sort terms.
    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    /// Returns `true` if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Renders each term as a sort token.
    pub fn to_tokens(&self) -> Vec<String> {
        self.terms.iter().map(ToString::to_string).collect()
    }
}

/// Compiles a sort document into sort tokens.
///
/// `None` and `Null` yield an empty list.
///
/// ```
/// use meili_query::{compile_sort, Map, Value};
///
/// let doc = Value::Object(Map::new().insert("name", 1).insert("age", -1));
/// assert_eq!(compile_sort(Some(&doc)).unwrap(), ["name:asc", "age:desc"]);
/// assert!(compile_sort(None).unwrap().is_empty());
/// ```
pub fn compile_sort(document: Option<&Value>) -> Result<Vec<String>> {
    let Some(document) = document else {
        return Ok(Vec::new());
    };
    debug!(shape = document.type_name(), "compiling sort");
    let tokens = Sort::parse(document)?.to_tokens();
    debug!(terms = tokens.len(), "compiled sort");
    Ok(tokens)
}

fn geo_term(value: &Value) -> Result<SortTerm> {
    let point = GeoPoint::from_value(value, GEO_POINT_KEY)?;
    let dir = match value.as_object().and_then(|map| map.get("direction")) {
        None | Some(Value::Null) => Dir::Asc,
        Some(direction) => Dir::parse(direction)?,
    };
    Ok(SortTerm::GeoPoint { point, dir })
}

fn direction_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Date(ts) => ts.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    fn sort(map: Map) -> Result<Vec<String>> {
        compile_sort(Some(&Value::Object(map)))
    }

    #[test]
    fn dir_parse() {
        for token in ["asc", "ASC", "Ascending", "1"] {
            assert_eq!(Dir::parse(&Value::from(token)).unwrap(), Dir::Asc);
        }
        for token in ["desc", "DESC", "descending", "-1"] {
            assert_eq!(Dir::parse(&Value::from(token)).unwrap(), Dir::Desc);
        }
        assert_eq!(Dir::parse(&Value::from(1)).unwrap(), Dir::Asc);
        assert_eq!(Dir::parse(&Value::from(-1)).unwrap(), Dir::Desc);
        assert_eq!(Dir::parse(&Value::from(1.0)).unwrap(), Dir::Asc);
    }

    #[test]
    fn dir_parse_errors_keep_the_literal() {
        assert_eq!(
            Dir::parse(&Value::from("invalid")).unwrap_err(),
            QueryError::InvalidDirection {
                direction: "invalid".to_string()
            }
        );
        assert_eq!(
            Dir::parse(&Value::from(2)).unwrap_err().to_string(),
            "Invalid direction: 2"
        );
        assert_eq!(
            Dir::parse(&Value::from("Sideways")).unwrap_err().to_string(),
            "Invalid direction: Sideways"
        );
    }

    #[test]
    fn fields_keep_document_order() {
        assert_eq!(
            sort(Map::new().insert("name", 1).insert("age", -1)).unwrap(),
            ["name:asc", "age:desc"]
        );
        assert_eq!(
            sort(Map::new().insert("age", -1).insert("name", 1)).unwrap(),
            ["age:desc", "name:asc"]
        );
    }

    #[test]
    fn absent_entries_are_skipped() {
        let map = Map::new()
            .insert("name", "asc")
            .insert_opt("age", None::<i64>);
        assert_eq!(sort(map).unwrap(), ["name:asc"]);
    }

    #[test]
    fn geo_point() {
        let map = Map::new().insert(
            GEO_POINT_KEY,
            Map::new().insert("lat", 48.870798).insert("lng", 2.316733),
        );
        assert_eq!(sort(map).unwrap(), ["_geoPoint(48.870798, 2.316733):asc"]);

        let map = Map::new().insert("rank", "desc").insert(
            GEO_POINT_KEY,
            Map::new()
                .insert("lat", 1)
                .insert("lng", 2)
                .insert("direction", "descending"),
        );
        assert_eq!(sort(map).unwrap(), ["rank:desc", "_geoPoint(1, 2):desc"]);
    }

    #[test]
    fn geo_point_errors() {
        let map = Map::new().insert(GEO_POINT_KEY, "here");
        assert_eq!(
            sort(map).unwrap_err().to_string(),
            "$geoPoint must be an object"
        );

        let map = Map::new().insert(GEO_POINT_KEY, Map::new().insert("lat", 1));
        assert_eq!(
            sort(map).unwrap_err().to_string(),
            "$geoPoint.lng must be a number"
        );

        let map = Map::new().insert(
            GEO_POINT_KEY,
            Map::new().insert("lat", 1).insert("lng", 2).insert("direction", "up"),
        );
        assert_eq!(sort(map).unwrap_err().to_string(), "Invalid direction: up");
    }

    #[test]
    fn null_and_missing_documents_are_empty() {
        assert!(compile_sort(None).unwrap().is_empty());
        assert!(compile_sort(Some(&Value::Null)).unwrap().is_empty());
        assert!(sort(Map::new()).unwrap().is_empty());
    }

    #[test]
    fn non_objects_are_rejected() {
        for doc in [Value::from("name"), Value::from(vec!["name"]), Value::from(1)] {
            assert_eq!(
                compile_sort(Some(&doc)).unwrap_err(),
                QueryError::invalid_document("Expected an object")
            );
        }
    }

    #[test]
    fn typed_sort() {
        let sort = Sort::new()
            .order_by("a", Dir::Desc)
            .asc("b")
            .geo_point((1.5, -2.0), Dir::Desc);
        assert_eq!(sort.terms().len(), 3);
        assert!(!sort.is_empty());
        assert_eq!(sort.to_tokens(), ["a:desc", "b:asc", "_geoPoint(1.5, -2):desc"]);
    }

    #[test]
    fn dir_serde() {
        let dir: Dir = serde_json::from_str(r#""desc""#).unwrap();
        assert_eq!(dir, Dir::Desc);
        assert_eq!(serde_json::to_string(&Dir::Asc).unwrap(), r#""asc""#);
    }
}
