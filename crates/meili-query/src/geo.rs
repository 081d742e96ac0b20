//! Geo predicates.
//!
//! [`GeoRadius`] and [`GeoBoundingBox`] render the `_geoRadius(..)` and
//! `_geoBoundingBox(..)` filter functions. Both can be built directly or read
//! from a filter document, in which case every coordinate is checked and the
//! error names the exact missing field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::value::{Map, Number, Value};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point.
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// Reads `{lat, lng}` from an object. `path` prefixes error messages.
    pub(crate) fn from_map(map: &Map, path: &str) -> Result<Self> {
        Ok(GeoPoint {
            lat: number_field(map, path, "lat")?,
            lng: number_field(map, path, "lng")?,
        })
    }

    pub(crate) fn from_value(value: &Value, path: &str) -> Result<Self> {
        let map = object(value, path)?;
        GeoPoint::from_map(map, path)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        GeoPoint { lat, lng }
    }
}

/// `_geoRadius(lat, lng, distanceInMeters)`.
///
/// ```
/// use meili_query::GeoRadius;
///
/// let radius = GeoRadius::new(45.472735, 9.184019, 2000.0);
/// assert_eq!(radius.to_string(), "_geoRadius(45.472735, 9.184019, 2000)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRadius {
    /// Latitude of the center.
    pub lat: f64,
    /// Longitude of the center.
    pub lng: f64,
    /// Radius in meters.
    pub distance_in_meters: f64,
}

impl GeoRadius {
    /// Document key of the radius predicate.
    pub const KEY: &'static str = "$geoRadius";

    /// Creates a new radius predicate.
    pub fn new(lat: f64, lng: f64, distance_in_meters: f64) -> Self {
        GeoRadius {
            lat,
            lng,
            distance_in_meters,
        }
    }

    /// Reads `{lat, lng, distanceInMeters}` from a document value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = object(value, Self::KEY)?;
        Ok(GeoRadius {
            lat: number_field(map, Self::KEY, "lat")?,
            lng: number_field(map, Self::KEY, "lng")?,
            distance_in_meters: number_field(map, Self::KEY, "distanceInMeters")?,
        })
    }
}

impl fmt::Display for GeoRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "_geoRadius({}, {}, {})",
            Number::F64(self.lat),
            Number::F64(self.lng),
            Number::F64(self.distance_in_meters)
        )
    }
}

/// `_geoBoundingBox([topRight.lat, topRight.lng], [bottomLeft.lat, bottomLeft.lng])`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBoundingBox {
    /// North-east corner.
    pub top_right: GeoPoint,
    /// South-west corner.
    pub bottom_left: GeoPoint,
}

impl GeoBoundingBox {
    /// Name used in error messages.
    pub const NAME: &'static str = "$geoBoundingBox";

    /// Creates a new bounding box predicate.
    pub fn new(top_right: impl Into<GeoPoint>, bottom_left: impl Into<GeoPoint>) -> Self {
        GeoBoundingBox {
            top_right: top_right.into(),
            bottom_left: bottom_left.into(),
        }
    }

    /// Reads `{topRight: {lat, lng}, bottomLeft: {lat, lng}}` from a document value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = object(value, Self::NAME)?;
        let top_right = format!("{}.topRight", Self::NAME);
        let bottom_left = format!("{}.bottomLeft", Self::NAME);

        // Both corners must be objects before any coordinate is checked.
        let top_right_map = object_field(map, "topRight", &top_right)?;
        let bottom_left_map = object_field(map, "bottomLeft", &bottom_left)?;

        Ok(GeoBoundingBox {
            top_right: GeoPoint::from_map(top_right_map, &top_right)?,
            bottom_left: GeoPoint::from_map(bottom_left_map, &bottom_left)?,
        })
    }
}

impl fmt::Display for GeoBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "_geoBoundingBox([{}, {}], [{}, {}])",
            Number::F64(self.top_right.lat),
            Number::F64(self.top_right.lng),
            Number::F64(self.bottom_left.lat),
            Number::F64(self.bottom_left.lng)
        )
    }
}

/// Compiles a `$geoRadius` document value.
pub fn compile_geo_radius(value: &Value) -> Result<String> {
    GeoRadius::from_value(value).map(|radius| radius.to_string())
}

/// Compiles a bounding box document value.
pub fn compile_geo_bounding_box(value: &Value) -> Result<String> {
    GeoBoundingBox::from_value(value).map(|bbox| bbox.to_string())
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map> {
    value
        .as_object()
        .ok_or_else(|| QueryError::geo(format!("{path} must be an object")))
}

fn object_field<'a>(map: &'a Map, key: &str, path: &str) -> Result<&'a Map> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| QueryError::geo(format!("{path} must be an object")))
}

fn number_field(map: &Map, path: &str, key: &str) -> Result<f64> {
    map.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| QueryError::geo(format!("{path}.{key} must be a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Value {
        Value::Object(Map::new().insert("lat", lat).insert("lng", lng))
    }

    #[test]
    fn radius_from_document() {
        let value = Value::Object(
            Map::new()
                .insert("lat", 45.472735)
                .insert("lng", 9.184019)
                .insert("distanceInMeters", 2000),
        );
        assert_eq!(
            compile_geo_radius(&value).unwrap(),
            "_geoRadius(45.472735, 9.184019, 2000)"
        );
    }

    #[test]
    fn radius_errors_name_the_field() {
        assert_eq!(
            compile_geo_radius(&Value::from("a")).unwrap_err().to_string(),
            "$geoRadius must be an object"
        );

        let value = Value::Object(Map::new().insert("lat", "a"));
        assert_eq!(
            compile_geo_radius(&value).unwrap_err().to_string(),
            "$geoRadius.lat must be a number"
        );

        let value = Value::Object(Map::new().insert("lat", 1).insert("lng", 2));
        assert_eq!(
            compile_geo_radius(&value).unwrap_err(),
            QueryError::geo("$geoRadius.distanceInMeters must be a number")
        );

        // Absent counts as missing
        let value = Value::Object(
            Map::new()
                .insert_opt("lat", None::<f64>)
                .insert("lng", 2)
                .insert("distanceInMeters", 3),
        );
        assert_eq!(
            compile_geo_radius(&value).unwrap_err().to_string(),
            "$geoRadius.lat must be a number"
        );
    }

    #[test]
    fn bounding_box_from_document() {
        let value = Value::Object(
            Map::new()
                .insert("topRight", point(45.494181, 9.214024))
                .insert("bottomLeft", point(45.449484, 9.179175)),
        );
        assert_eq!(
            compile_geo_bounding_box(&value).unwrap(),
            "_geoBoundingBox([45.494181, 9.214024], [45.449484, 9.179175])"
        );
    }

    #[test]
    fn bounding_box_errors_name_the_field() {
        assert_eq!(
            compile_geo_bounding_box(&Value::from(1)).unwrap_err().to_string(),
            "$geoBoundingBox must be an object"
        );

        let value = Value::Object(Map::new().insert("topRight", point(1.0, 2.0)));
        assert_eq!(
            compile_geo_bounding_box(&value).unwrap_err().to_string(),
            "$geoBoundingBox.bottomLeft must be an object"
        );

        let value = Value::Object(
            Map::new()
                .insert("topRight", Map::new().insert("lat", 1))
                .insert("bottomLeft", point(1.0, 2.0)),
        );
        assert_eq!(
            compile_geo_bounding_box(&value).unwrap_err().to_string(),
            "$geoBoundingBox.topRight.lng must be a number"
        );
    }

    #[test]
    fn typed_construction() {
        let bbox = GeoBoundingBox::new((45.494181, 9.214024), GeoPoint::new(45.449484, 9.179175));
        assert_eq!(
            bbox.to_string(),
            "_geoBoundingBox([45.494181, 9.214024], [45.449484, 9.179175])"
        );
    }

    #[test]
    fn deserializes_from_request_json() {
        let radius: GeoRadius = serde_json::from_str(
            r#"{"lat": 48.870798, "lng": 2.316733, "distanceInMeters": 1000}"#,
        )
        .unwrap();
        assert_eq!(radius, GeoRadius::new(48.870798, 2.316733, 1000.0));
        assert_eq!(radius.to_string(), "_geoRadius(48.870798, 2.316733, 1000)");
    }
}
