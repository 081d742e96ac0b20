//! Document values accepted by the compilers.
//!
//! A [`Value`] is one node of a filter or sort document. Documents are built
//! either programmatically (with [`Map`] and the `From` conversions) or from
//! JSON with [`Value::from_json`].
//!
//! Objects distinguish an *absent* entry (`None`, what JavaScript calls
//! `undefined`) from an explicit [`Value::Null`]. Absent entries are skipped by
//! every compiler; `null` is a real operand.

use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{QueryError, Result};

/// Key of the extended-JSON date marker: `{"$date": 946684800000}`.
pub const DATE_KEY: &str = "$date";

/// A node in a filter or sort document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Date value, serialized as epoch milliseconds.
    Date(Timestamp),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Ordered key/value entries.
    Object(Map),
}

impl Value {
    /// Converts a JSON value into a document value.
    ///
    /// Object key order is preserved. An object whose only key is `$date` is
    /// read as a date: its payload is either integer epoch milliseconds or an
    /// RFC 3339 string.
    ///
    /// ```
    /// use meili_query::{Timestamp, Value};
    /// use serde_json::json;
    ///
    /// let value = Value::from_json(json!({ "$date": "2000-01-01T00:00:00Z" })).unwrap();
    /// assert_eq!(value, Value::Date(Timestamp(946_684_800_000)));
    /// ```
    pub fn from_json(json: serde_json::Value) -> Result<Value> {
        use serde_json::Value as Json;

        let value = match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(Number::from_json(&n)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_>>()?,
            ),
            Json::Object(object) => {
                if object.len() == 1 {
                    if let Some(marker) = object.get(DATE_KEY) {
                        return Timestamp::from_json(marker).map(Value::Date);
                    }
                }
                let mut map = Map::new();
                for (key, value) in object {
                    map.push(key, Some(Value::from_json(value)?));
                }
                Value::Object(map)
            }
        };
        Ok(value)
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the number value as `f64`, if present.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::to_f64)
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the array items, if present.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the object entries, if present.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the name of this value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = QueryError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Value::from_json(json)
    }
}

/// Insertion-ordered object entries.
///
/// Each entry is either present (`Some`) or absent (`None`). Absent entries
/// keep their position but are ignored by the compilers, which lets callers
/// pass optional parameters straight through:
///
/// ```
/// use meili_query::{compile_filter, Map, Value};
///
/// let min_age: Option<i64> = None;
/// let doc = Map::new()
///     .insert("name", "John")
///     .insert_opt("age", min_age);
///
/// assert_eq!(compile_filter(&Value::Object(doc)).unwrap(), r#"name = "John""#);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: Vec<(String, Option<Value>)>,
}

impl Map {
    /// Creates an empty map.
    pub fn new() -> Self {
        Map::default()
    }

    /// Sets a present entry.
    ///
    /// Setting an existing key replaces its value in place.
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, Some(value.into()));
        self
    }

    /// Sets an entry that is absent when `value` is `None`.
    pub fn insert_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.push(key, value.map(Into::into));
        self
    }

    /// Sets an entry in place, replacing an existing value for the same key.
    pub fn push(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the present value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Iterates all entries, absent ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Iterates the present entries in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Returns the number of entries, absent ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.push(key, Some(value.into()));
        }
        map
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// `Display` renders numbers the way JavaScript prints them: integral floats
/// have no fractional part, magnitudes from `1e21` up or below `1e-6` use
/// exponent form (`1e+21`, `1.5e-7`) and non-finite floats become `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    fn from_json(n: &serde_json::Number) -> Number {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) if !n.is_finite() => f.write_str("null"),
            // -0 prints as 0
            Number::F64(n) if n == 0.0 => f.write_str("0"),
            Number::F64(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => write_exponent(f, n),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

/// Writes `n` as `1.5e+21` / `1.5e-7`.
fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let plain = format!("{n:e}");
    match plain.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&plain),
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// This is the date-like value of a document. It serializes to its
/// millisecond count, never to an ISO string.
///
/// ```
/// use meili_query::Timestamp;
///
/// let ts = Timestamp::from_rfc3339("2000-01-01T00:00:00Z").unwrap();
/// assert_eq!(ts.as_millis(), 946_684_800_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Parses an RFC 3339 date-time string.
    pub fn from_rfc3339(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &Rfc3339).map_err(|err| {
            QueryError::invalid_document(format!("{DATE_KEY} is not a valid RFC 3339 date: {err}"))
        })?;
        Timestamp::try_from(datetime)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    fn from_json(marker: &serde_json::Value) -> Result<Self> {
        if let Some(millis) = marker.as_i64() {
            return Ok(Timestamp(millis));
        }
        match marker.as_str() {
            Some(s) => Timestamp::from_rfc3339(s),
            None => Err(QueryError::invalid_document(format!(
                "{DATE_KEY} must be epoch milliseconds or an RFC 3339 string"
            ))),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl TryFrom<OffsetDateTime> for Timestamp {
    type Error = QueryError;

    fn try_from(datetime: OffsetDateTime) -> Result<Self> {
        let millis = datetime.unix_timestamp_nanos() / 1_000_000;
        i64::try_from(millis)
            .map(Timestamp)
            .map_err(|_| QueryError::invalid_document(format!("{DATE_KEY} is out of range")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Conversions into Value

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Date(t)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// `None` converts to an explicit `Null`; use [`Map::insert_opt`] for absence.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
