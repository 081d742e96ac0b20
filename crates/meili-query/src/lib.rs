//! meili-query - Compile MongoDB-style filter and sort documents into
//! Meilisearch filter syntax.
//!
//! Documents are nested key/value trees. The crate lowers them into the
//! strings Meilisearch expects in its `filter` and `sort` search parameters:
//!
//! - Field conditions: equality, ordering, membership, ranges, existence,
//!   emptiness, substring and prefix matching
//! - Logical groups: `$or` (parenthesized) and `$and`, to any depth
//! - Geo predicates: `$geoRadius` and `$geoRoundingBox` / `$geoBoundingBox`
//! - Sort terms, including distance to a `$geoPoint`
//!
//! # Quick Start
//!
//! ```rust
//! use meili_query::{compile_filter, compile_sort, Value};
//! use serde_json::json;
//!
//! let filter = Value::from_json(json!({
//!     "$or": [
//!         { "$or": [{ "name": "John" }, { "name": "Doe" }] },
//!         { "$and": [{ "age": { "$gt": 18 } }, { "isStudent": true }] },
//!     ],
//!     "age": { "$lt": 30 },
//!     "$geoRadius": { "lat": 45.472735, "lng": 9.184019, "distanceInMeters": 2000 },
//! }))?;
//!
//! assert_eq!(
//!     compile_filter(&filter)?,
//!     r#"((name = "John" OR name = "Doe") OR age > 18 AND isStudent = true) AND age < 30 AND _geoRadius(45.472735, 9.184019, 2000)"#
//! );
//!
//! let sort = Value::from_json(json!({ "name": 1, "age": "desc" }))?;
//! assert_eq!(compile_sort(Some(&sort))?, ["name:asc", "age:desc"]);
//! # Ok::<(), meili_query::QueryError>(())
//! ```
//!
//! # Operators
//!
//! Every operator has a document token and a builder token; both are
//! accepted everywhere.
//!
//! | Document | Builder | Operand | Output |
//! |---|---|---|---|
//! | `$eq` | `=` | scalar | `f = v`, `f IS NULL` |
//! | `$ne` | `!=` | scalar | `f != v`, `f IS NOT NULL` |
//! | `$gt` `$gte` `$lt` `$lte` | `>` `>=` `<` `<=` | number or date | `f > v` |
//! | `$in` `$nin` | `in` `nin` | array of scalars | `f IN [..]`, `f NOT IN [..]` |
//! | `$exists` | `exists` | boolean | `f EXISTS`, `f NOT EXISTS` |
//! | `$empty` | `empty` | boolean | `f IS EMPTY`, `f IS NOT EMPTY` |
//! | `$between` | `between` | two numbers, dates or strings | `f a TO b` |
//! | `$contains` `$notContains` | `contains` `notContains` | string | `f CONTAINS "v"` |
//! | `$startsWith` `$notStartsWith` | `startsWith` `notStartsWith` | string | `f STARTS WITH "v"` |
//!
//! A bare scalar is shorthand for `$eq` and a bare array for `$in`.
//!
//! # Absent values
//!
//! [`Map`] entries may be absent. Absent entries are skipped, while an
//! explicit [`Value::Null`] is an operand. See [`Map::insert_opt`].
//!
//! # Fluent construction
//!
//! [`FilterBuilder`] produces the same grammar without going through a
//! document.

mod builder;
mod comparison;
mod condition;
mod error;
mod filter;
mod geo;
mod literal;
mod op;
mod sort;
mod value;

// Re-export public API
pub use builder::{ExpressionBuilder, FilterBuilder};
pub use comparison::{compile_comparison, Comparison, Predicate};
pub use condition::{compile_selector, Condition};
pub use error::{QueryError, Result};
pub use filter::{
    compile_filter, Clause, Filter, AND_KEY, GEO_BOUNDING_BOX_ALIAS, GEO_BOUNDING_BOX_KEY, OR_KEY,
};
pub use geo::{compile_geo_bounding_box, compile_geo_radius, GeoBoundingBox, GeoPoint, GeoRadius};
pub use literal::Literal;
pub use op::Op;
pub use sort::{compile_sort, Dir, OrderBy, Sort, SortTerm, GEO_POINT_KEY};
pub use value::{Map, Number, Timestamp, Value, DATE_KEY};
