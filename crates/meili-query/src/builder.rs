//! Fluent filter construction.
//!
//! [`FilterBuilder`] is an alternative to filter documents. Each call returns
//! a new builder holding one more fragment; the receiver is left untouched,
//! so a partially built filter can be shared and extended in several
//! directions.
//!
//! # Example
//!
//! ```
//! use meili_query::FilterBuilder;
//!
//! let adults = FilterBuilder::new().where_("age", ">=", 18)?;
//!
//! let students = adults.where_("isStudent", "=", true)?;
//! let nearby = adults.where_with(|eb| Ok(eb.geo_radius(45.472735, 9.184019, 2000.0)))?;
//!
//! assert_eq!(adults.build(), "age >= 18");
//! assert_eq!(students.build(), "age >= 18 AND isStudent = true");
//! assert_eq!(nearby.build(), "age >= 18 AND _geoRadius(45.472735, 9.184019, 2000)");
//! # Ok::<(), meili_query::QueryError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::comparison::compile_comparison;
use crate::error::{QueryError, Result};
use crate::filter::{join, AND, OR};
use crate::geo::{GeoBoundingBox, GeoPoint, GeoRadius};
use crate::value::Value;

struct Fragment {
    text: String,
    prev: Option<Arc<Fragment>>,
}

// Unlinks the chain iteratively so long builders drop in constant stack.
impl Drop for Fragment {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(node) = prev {
            match Arc::try_unwrap(node) {
                Ok(mut fragment) => prev = fragment.prev.take(),
                // Still shared by another builder, which owns the rest.
                Err(_) => break,
            }
        }
    }
}

/// Immutable accumulator of filter fragments, implicitly AND-ed.
///
/// Fragments live in a shared singly linked list, newest first. Cloning a
/// builder or extending it never copies existing fragments.
#[derive(Clone, Default)]
pub struct FilterBuilder {
    head: Option<Arc<Fragment>>,
    len: usize,
}

impl FilterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        FilterBuilder::default()
    }

    /// Adds one comparison. `op` accepts both operator spellings.
    pub fn where_(&self, field: &str, op: &str, value: impl Into<Value>) -> Result<FilterBuilder> {
        let text = compile_comparison(field, op, &value.into())?;
        Ok(self.push(text))
    }

    /// Adds a fragment produced by a callback.
    ///
    /// The callback receives an [`ExpressionBuilder`] for composing OR/AND
    /// groups and geo predicates.
    ///
    /// ```
    /// use meili_query::FilterBuilder;
    ///
    /// let filter = FilterBuilder::new()
    ///     .where_with(|eb| {
    ///         Ok(eb.or([eb.compare("name", "=", "John")?, eb.compare("name", "=", "Doe")?]))
    ///     })?
    ///     .build();
    ///
    /// assert_eq!(filter, r#"(name = "John" OR name = "Doe")"#);
    /// # Ok::<(), meili_query::QueryError>(())
    /// ```
    pub fn where_with<F>(&self, build: F) -> Result<FilterBuilder>
    where
        F: FnOnce(&ExpressionBuilder) -> Result<String>,
    {
        let text = build(&ExpressionBuilder)?;
        Ok(self.push(text))
    }

    /// Adds one comparison from a dynamic argument list.
    ///
    /// The list must be exactly `[field, op, value]` with string `field`
    /// and `op`.
    pub fn where_args(&self, args: &[Value]) -> Result<FilterBuilder> {
        match args {
            [Value::String(field), Value::String(op), value] => {
                let text = compile_comparison(field, op, value)?;
                Ok(self.push(text))
            }
            _ => Err(QueryError::InvalidArguments),
        }
    }

    /// Joins the accumulated fragments with ` AND `, oldest first.
    pub fn build(&self) -> String {
        join(self.fragments(), AND)
    }

    /// Returns the fragments, oldest first.
    pub fn fragments(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.len);
        let mut node = self.head.as_deref();
        while let Some(fragment) = node {
            out.push(fragment.text.as_str());
            node = fragment.prev.as_deref();
        }
        out.reverse();
        out
    }

    /// Returns the number of fragments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&self, text: String) -> FilterBuilder {
        trace!(fragment = %text, depth = self.len + 1, "added filter fragment");
        FilterBuilder {
            head: Some(Arc::new(Fragment {
                text,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }
}

impl fmt::Debug for FilterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBuilder")
            .field("fragments", &self.fragments())
            .finish()
    }
}

impl fmt::Display for FilterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Helpers handed to [`FilterBuilder::where_with`] callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionBuilder;

impl ExpressionBuilder {
    /// Compiles one comparison, like [`FilterBuilder::where_`].
    pub fn compare(&self, field: &str, op: &str, value: impl Into<Value>) -> Result<String> {
        compile_comparison(field, op, &value.into())
    }

    /// Joins fragments with ` AND `, without parentheses.
    pub fn and<I, S>(&self, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        join(fragments, AND)
    }

    /// Joins fragments with ` OR ` and wraps the result in parentheses.
    ///
    /// No fragments yield an empty string.
    pub fn or<I, S>(&self, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inner = join(fragments, OR);
        if inner.is_empty() {
            inner
        } else {
            format!("({inner})")
        }
    }

    /// Renders `_geoRadius(lat, lng, distance)`.
    pub fn geo_radius(&self, lat: f64, lng: f64, distance_in_meters: f64) -> String {
        GeoRadius::new(lat, lng, distance_in_meters).to_string()
    }

    /// Renders `_geoBoundingBox([..], [..])`.
    pub fn geo_bounding_box(
        &self,
        top_right: impl Into<GeoPoint>,
        bottom_left: impl Into<GeoPoint>,
    ) -> String {
        GeoBoundingBox::new(top_right, bottom_left).to_string()
    }
}
